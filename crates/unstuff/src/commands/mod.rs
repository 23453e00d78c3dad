pub mod extract;
pub mod list;

use std::path::PathBuf;

use bw2_stuff::{ReadOptions, StuffArchive, Validation};
use clap::{Args, ValueEnum};
use miette::{miette, Context, Result};
use std::fs::File;

/// How strictly the table of contents is checked
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// The directory must be made of whole records that stay inside the content region
    #[default]
    Strict,
    /// Only the bound checked by the game's own tools
    Legacy,
}

impl From<Mode> for Validation {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Strict => Validation::Strict,
            Mode::Legacy => Validation::Legacy,
        }
    }
}

/// Exit code for an argument parsing failure.
///
/// Usage errors exit with 1 like every other failure, help and version output with 0.
pub fn usage_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

#[derive(Args)]
pub struct UnstuffArgs {
    /// An input STUFF archive
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// A target directory, defaults to the name of the archive without its extension
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Print the file dictionary instead of extracting
    #[arg(short, long, default_value_t = false)]
    pub list: bool,

    /// Fail instead of overwriting files that already exist
    #[arg(long, default_value_t = false)]
    pub keep_existing: bool,

    /// Table of contents validation
    #[arg(long, value_enum, default_value_t = Mode::Strict)]
    pub validation: Mode,
}

impl UnstuffArgs {
    pub fn handle(&self) -> Result<()> {
        if self.list {
            list::handle(self)
        } else {
            extract::handle(self)
        }
    }

    /// The directory entries are written to
    pub fn output_directory(&self) -> Result<PathBuf> {
        if let Some(directory) = &self.directory {
            return Ok(directory.clone());
        }

        self.file
            .file_stem()
            .map(PathBuf::from)
            .ok_or(miette!(
                "unable to derive a directory name from {}",
                self.file.display()
            ))
    }

    pub(crate) fn open(&self) -> Result<StuffArchive<File>> {
        let options = ReadOptions::builder()
            .validation(self.validation.into())
            .build();

        StuffArchive::open_with_options(&self.file, options)
            .context(format!("reading {}", self.file.display()))
    }
}
