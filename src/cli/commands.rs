// CLI command implementations
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tagsweep::{
    retag_file, scan_stream, tag_album, AlbumDirectory, Charset, Id3v1Tag, OutputFormat,
    ScanStats, ShowHandler, TagError,
};

use super::config::{TagFields, WriteArgs};
use super::output::OutputFormatter;

/// Show the segments of each file, or of standard input when none is given
pub fn command_show(
    files: &[PathBuf],
    raw: bool,
    encoding: &str,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let charset = Charset::from_name(encoding).with_context(|| format!("--encoding {}", encoding))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if files.is_empty() {
        let stdin = io::stdin();
        show_stream(stdin.lock(), &mut out, formatter.format, raw, charset)
            .context("standard input")?;
        return Ok(());
    }

    let mut failed = 0;
    for (index, path) in files.iter().enumerate() {
        if formatter.format == OutputFormat::Text {
            if index > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}:", path.display())?;
        }

        let result = File::open(path)
            .with_context(|| format!("unable to open {}", path.display()))
            .and_then(|file| show_stream(BufReader::new(file), &mut out, formatter.format, raw, charset));
        if let Err(e) = result {
            formatter.print_error(&format!("{}: {:#}", path.display(), e));
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} files could not be scanned", failed, files.len());
    }
    Ok(())
}

fn show_stream<R: Read>(
    input: R,
    out: &mut impl Write,
    format: OutputFormat,
    raw: bool,
    charset: Charset,
) -> anyhow::Result<ScanStats> {
    let mut handler = ShowHandler::new(out, format)
        .with_charset(charset)
        .with_raw(raw);
    let stats = scan_stream(input, &mut handler)?;
    handler.write_total(&stats)?;
    Ok(stats)
}

/// Replace the tags of one file
pub fn command_tag(
    file: &Path,
    fields: &TagFields,
    write: &WriteArgs,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let options = write.to_options()?;
    let tag = Id3v1Tag::new(
        fields.title.as_str(),
        fields.artist.as_str(),
        fields.album.as_str(),
        fields.year.as_str(),
        fields.comment.as_str(),
        fields.track,
        fields.genre,
    );

    let summary = retag_file(file, &tag, &options).map_err(|e| describe(file, e))?;
    formatter.output_summary(file, &summary, options.dry_run, &mut io::stdout())
}

/// Tag every track of each album directory
pub fn command_tag_album(
    directories: &[PathBuf],
    write: &WriteArgs,
    formatter: &OutputFormatter,
) -> anyhow::Result<()> {
    let options = write.to_options()?;
    let mut failed = 0;

    for directory in directories {
        if let Ok(album) = AlbumDirectory::parse(directory) {
            formatter.print_info(&format!(
                "{} - {} - {}",
                album.artist, album.year, album.album
            ));
        }

        match tag_album(directory, &options) {
            Ok(results) => {
                for (track, summary) in &results {
                    formatter.output_summary(&track.path, summary, options.dry_run, &mut io::stdout())?;
                }
            }
            Err(e) => {
                formatter.print_error(&format!("{:#}", describe(directory, e)));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} directories failed", failed, directories.len());
    }
    Ok(())
}

fn describe(path: &Path, error: TagError) -> anyhow::Error {
    let truncated = matches!(&error, TagError::Scan(failure) if failure.is_truncated());
    let error = anyhow::Error::new(error);
    if truncated {
        error.context(format!("{}: encountered truncated segment", path.display()))
    } else {
        error.context(path.display().to_string())
    }
}
