// CLI configuration
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use anyhow::{bail, Context};
use tagsweep::{Charset, OutputFormat, TagOptions, UnrecognizedPolicy};

/// tagsweep - MP3 segment inspector and ID3v1 retagger
#[derive(Parser, Debug)]
#[command(name = "tagsweep")]
#[command(about = "Inspect the tags and frames of MP3 files and rewrite their ID3v1 tags", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: FormatArg,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every segment of MP3 file(s), or of standard input
    Show {
        /// MP3 file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Include the raw bytes of ID3v2 and APE tags (base64)
        #[arg(long)]
        raw: bool,

        /// Character set of ID3v1 text
        #[arg(short, long, default_value = "iso8859-1")]
        encoding: String,
    },

    /// Replace all tags of an MP3 file with one new ID3v1 tag
    Tag {
        /// MP3 file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        fields: TagFields,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Tag the tracks of "<artist> - <YYYY> - <album>" directories
    TagAlbum {
        /// Album directory path(s)
        #[arg(value_name = "DIRECTORY", required = true)]
        directories: Vec<PathBuf>,

        #[command(flatten)]
        write: WriteArgs,
    },
}

/// ID3v1 field values
#[derive(Args, Debug)]
pub struct TagFields {
    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub artist: String,

    #[arg(long, default_value = "")]
    pub album: String,

    #[arg(long, default_value = "")]
    pub year: String,

    #[arg(long, default_value = "")]
    pub comment: String,

    #[arg(long, default_value_t = 0)]
    pub track: u8,

    /// Genre byte (255 = unset)
    #[arg(long, default_value_t = 255)]
    pub genre: u8,
}

/// Options shared by the commands that rewrite files
#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Character set for tag text (iso8859-1 .. iso8859-16)
    #[arg(short, long, default_value = "iso8859-1")]
    pub encoding: String,

    /// Character written in place of characters the character set lacks
    #[arg(long, default_value_t = '?')]
    pub replacement: char,

    /// Dry run: scan files but do not change them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Leave unrecognized bytes out instead of writing a note about them
    #[arg(long)]
    pub drop_unrecognized: bool,
}

impl WriteArgs {
    pub fn to_options(&self) -> anyhow::Result<TagOptions> {
        let charset = Charset::from_name(&self.encoding)
            .with_context(|| format!("--encoding {}", self.encoding))?;
        if !self.replacement.is_ascii() {
            bail!("replacement {:?} must be an ASCII character", self.replacement);
        }

        Ok(TagOptions {
            charset,
            replacement: self.replacement as u8,
            dry_run: self.dry_run,
            unrecognized: if self.drop_unrecognized {
                UnrecognizedPolicy::Drop
            } else {
                UnrecognizedPolicy::Annotate
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_command() {
        let config = Config::parse_from([
            "tagsweep", "tag", "song.mp3", "--title", "Song", "--track", "4", "-e", "iso8859-15", "-n",
        ]);
        match config.command {
            Commands::Tag { file, fields, write } => {
                assert_eq!(file, PathBuf::from("song.mp3"));
                assert_eq!(fields.title, "Song");
                assert_eq!(fields.track, 4);
                assert_eq!(fields.genre, 255);
                let options = write.to_options().unwrap();
                assert_eq!(options.charset.name(), "iso8859-15");
                assert!(options.dry_run);
                assert_eq!(options.replacement, b'?');
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_encoding() {
        let config = Config::parse_from(["tagsweep", "tag-album", "dir", "-e", "iso8859-9"]);
        match config.command {
            Commands::TagAlbum { write, .. } => assert!(write.to_options().is_err()),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_format_flag() {
        let config = Config::parse_from(["tagsweep", "show", "-f", "json", "-vv"]);
        assert_eq!(config.format, FormatArg::Json);
        assert_eq!(config.verbose, 2);
    }
}
