//! Writing archive entries to disk

use bon::Builder;
use std::{
    fs::{self, File},
    io::{Read, Seek, Write},
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

use crate::{
    error::{FileNotFoundError, Result},
    path::{enclosed_name, resolves_within},
    read::StuffArchive,
};

/// Options for how entries are written to disk
#[derive(Debug, Clone, Copy, Builder)]
pub struct ExtractOptions {
    /// Replace files that already exist in the target directory
    #[builder(default = true)]
    pub overwrite: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<R: Read + Seek> StuffArchive<R> {
    /// Extract every entry into `directory`, in directory order.
    ///
    /// All names are checked with [`enclosed_name`] before anything is written, so an archive
    /// holding a single escaping name leaves the filesystem untouched. Returns the number of
    /// files written.
    #[instrument(skip_all, fields(directory = %directory.as_ref().display()), err)]
    pub fn extract<P: AsRef<Path>>(&mut self, directory: P, options: &ExtractOptions) -> Result<usize> {
        let directory = directory.as_ref();

        let targets = self
            .entries()
            .iter()
            .map(|file| enclosed_name(&file.name))
            .collect::<Result<Vec<_>>>()?;

        fs::create_dir_all(directory)?;
        let root = directory.canonicalize()?;

        for (index, target) in targets.iter().enumerate() {
            self.write_entry(index, &root, &directory.join(target), options)?;
        }

        Ok(targets.len())
    }

    /// Extract a single entry into `directory`, returning the path that was written.
    pub fn extract_entry<P: AsRef<Path>>(
        &mut self,
        file_number: usize,
        directory: P,
        options: &ExtractOptions,
    ) -> Result<PathBuf> {
        let file = self
            .entries()
            .get(file_number)
            .ok_or(FileNotFoundError::Index(file_number))?;

        let directory = directory.as_ref();
        let path = directory.join(enclosed_name(&file.name)?);

        fs::create_dir_all(directory)?;
        let root = directory.canonicalize()?;
        self.write_entry(file_number, &root, &path, options)?;

        Ok(path)
    }

    fn write_entry(
        &mut self,
        file_number: usize,
        root: &Path,
        path: &Path,
        options: &ExtractOptions,
    ) -> Result<()> {
        info!("writing {}", path.display());

        // Read first so a truncated entry leaves neither a file nor its directories behind.
        let contents = self.read_entry(file_number)?;

        resolves_within(root, path, &self.entries()[file_number].name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = if options.overwrite {
            File::create(path)?
        } else {
            File::create_new(path)?
        };
        out.write_all(&contents)?;

        Ok(())
    }
}
