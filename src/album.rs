// Tag a whole album directory from its directory and file names
//
// Directory: "<artist> - <YYYY> - <album>"
// Tracks:    "<NN> - <anything> - <title>.mp3"

use std::path::{Path, PathBuf};

use glob::glob;
use log::info;

use crate::error::TagError;
use crate::id3::Id3v1Tag;
use crate::retag::{retag_file, RetagSummary, TagOptions};

/// Genre byte written for album tracks ("unset").
pub const ALBUM_GENRE: u8 = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDirectory {
    pub path: PathBuf,
    pub artist: String,
    pub year: String,
    pub album: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumTrack {
    pub path: PathBuf,
    pub number: u8,
    pub title: String,
}

impl AlbumDirectory {
    pub fn parse(path: &Path) -> Result<Self, TagError> {
        let name = file_name(path);
        let (artist, year, album) =
            split_album_name(&name).ok_or_else(|| TagError::DirectoryName(name.clone()))?;

        Ok(AlbumDirectory {
            path: path.to_path_buf(),
            artist: artist.to_string(),
            year: year.to_string(),
            album: album.to_string(),
        })
    }

    /// The `.mp3` files of the directory, sorted by file name. Other entries
    /// are skipped with a log line.
    pub fn tracks(&self) -> Result<Vec<AlbumTrack>, TagError> {
        let pattern = glob::Pattern::escape(&self.path.to_string_lossy());
        let pattern = format!("{}/*", pattern);

        let mut tracks = Vec::new();
        for entry in glob(&pattern)? {
            let path = entry?;
            if is_track_file(&path) {
                tracks.push(AlbumTrack::parse(&path)?);
            } else {
                info!("skipping {}", file_name(&path));
            }
        }
        tracks.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(tracks)
    }

    pub fn tag_for(&self, track: &AlbumTrack) -> Id3v1Tag {
        Id3v1Tag::new(
            track.title.clone(),
            self.artist.clone(),
            self.album.clone(),
            self.year.clone(),
            "",
            track.number,
            ALBUM_GENRE,
        )
    }
}

impl AlbumTrack {
    pub fn parse(path: &Path) -> Result<Self, TagError> {
        let name = file_name(path);
        let (number, title) =
            split_track_name(&name).ok_or_else(|| TagError::FileName(name.clone()))?;

        Ok(AlbumTrack {
            path: path.to_path_buf(),
            number,
            title: title.to_string(),
        })
    }
}

/// Retag every track of the album in `dir`.
pub fn tag_album(dir: &Path, options: &TagOptions) -> Result<Vec<(AlbumTrack, RetagSummary)>, TagError> {
    let album = AlbumDirectory::parse(dir)?;
    let tracks = album.tracks()?;
    info!(
        "{}: {} tracks by {} ({})",
        album.album,
        tracks.len(),
        album.artist,
        album.year
    );

    let mut results = Vec::with_capacity(tracks.len());
    for track in tracks {
        let summary = retag_file(&track.path, &album.tag_for(&track), options)?;
        results.push((track, summary));
    }
    Ok(results)
}

fn is_track_file(path: &Path) -> bool {
    path.is_file() && path.extension().map_or(false, |ext| ext == "mp3")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Split "<artist> - <YYYY> - <album>", taking the last year-shaped separator.
fn split_album_name(name: &str) -> Option<(&str, &str, &str)> {
    name.rmatch_indices(" - ").find_map(|(index, sep)| {
        let rest = &name[index + sep.len()..];
        let year = rest.get(..4)?;
        let album = rest.get(4..)?.strip_prefix(" - ")?;
        year.bytes()
            .all(|b| b.is_ascii_digit())
            .then_some((&name[..index], year, album))
    })
}

/// Split "<NN> - <anything without '-'> - <title>.mp3".
fn split_track_name(name: &str) -> Option<(u8, &str)> {
    let stem = name.strip_suffix(".mp3")?;
    let number = stem.get(..2)?;
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let rest = stem.get(2..)?.strip_prefix(" - ")?;

    let dash = rest.find('-')?;
    let middle = rest[..dash].strip_suffix(' ')?;
    let title = rest[dash + 1..].strip_prefix(' ')?;
    if middle.is_empty() {
        return None;
    }

    Some((number.parse().ok()?, title))
}
