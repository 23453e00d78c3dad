//! Mapping of archive entry names onto the local filesystem.
//!
//! Names inside a STUFF archive are relative paths written on Windows, so they usually use `\`
//! as the separator. Both `\` and `/` are accepted and converted to the host's separator.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use crate::error::{Error, Result};

/// Convert an entry name into a relative path that stays inside the output directory.
///
/// The check is purely lexical, so it works before anything has been created on disk. Empty
/// segments (`a//b`) are dropped. Absolute paths, drive prefixes and `.`/`..` segments are
/// rejected with [`Error::InvalidPath`]. Links already on disk are handled by
/// [`resolves_within`].
pub fn enclosed_name(name: &str) -> Result<PathBuf> {
    let invalid = |reason| Error::InvalidPath {
        name: name.to_owned(),
        reason,
    };

    if name.starts_with(['/', '\\']) {
        return Err(invalid("absolute path"));
    }

    let mut path = PathBuf::new();
    for segment in name.split(['/', '\\']).filter(|s| !s.is_empty()) {
        match segment {
            "." | ".." => return Err(invalid("relative segment")),
            s if s.contains(':') => return Err(invalid("drive or stream specifier")),
            s => path.push(s),
        }
    }

    // Catch anything the host still interprets specially, e.g. a verbatim prefix on Windows.
    if let Some(component) = path
        .components()
        .find(|c| !matches!(c, Component::Normal(_)))
    {
        let component: &Path = component.as_ref();
        tracing::debug!("rejecting component {}", component.display());
        return Err(invalid("unexpected path component"));
    }

    if path.as_os_str().is_empty() {
        return Err(invalid("empty name"));
    }

    Ok(path)
}

/// Check that `path` still lands inside `root` once existing symbolic links are followed.
///
/// `root` must be canonical. The nearest ancestor of `path` that already exists is resolved;
/// everything below it is created as plain directories. A symbolic link at `path` itself must
/// resolve inside `root` as well, since writing to it follows the link.
pub fn resolves_within(root: &Path, path: &Path, name: &str) -> Result<()> {
    let escaped = || Error::InvalidPath {
        name: name.to_owned(),
        reason: "resolves outside of the target directory",
    };

    if fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink()) {
        return match path.canonicalize() {
            Ok(target) if target.starts_with(root) => Ok(()),
            _ => Err(escaped()),
        };
    }

    match path.ancestors().skip(1).find(|p| p.exists()) {
        Some(existing) if existing.canonicalize()?.starts_with(root) => Ok(()),
        _ => Err(escaped()),
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::path::{enclosed_name, resolves_within};

    fn rejected(name: &str) -> bool {
        matches!(enclosed_name(name), Err(Error::InvalidPath { .. }))
    }

    #[test]
    fn plain_names() -> Result<()> {
        assert_eq!(enclosed_name("readme.txt")?, PathBuf::from("readme.txt"));
        assert_eq!(
            enclosed_name("data/landscape/land1.lnd")?,
            ["data", "landscape", "land1.lnd"].iter().collect::<PathBuf>()
        );

        Ok(())
    }

    #[test]
    fn backslash_separators() -> Result<()> {
        assert_eq!(
            enclosed_name("Data\\Sound\\music.wav")?,
            ["Data", "Sound", "music.wav"].iter().collect::<PathBuf>()
        );
        assert_eq!(
            enclosed_name("mixed/sep\\file")?,
            ["mixed", "sep", "file"].iter().collect::<PathBuf>()
        );

        Ok(())
    }

    #[test]
    fn empty_segments_are_dropped() -> Result<()> {
        assert_eq!(
            enclosed_name("a//b\\\\c/")?,
            ["a", "b", "c"].iter().collect::<PathBuf>()
        );

        Ok(())
    }

    #[test]
    fn traversal_is_rejected() {
        assert!(rejected("../../evil.txt"));
        assert!(rejected("..\\evil.txt"));
        assert!(rejected("data/../../evil.txt"));
        assert!(rejected("./file"));
    }

    #[test]
    fn absolute_paths_are_rejected() {
        assert!(rejected("/etc/passwd"));
        assert!(rejected("\\Windows\\win.ini"));
        assert!(rejected("C:\\Windows\\win.ini"));
        assert!(rejected("c:evil.txt"));
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(rejected(""));
        assert!(rejected("//"));
    }

    #[test]
    fn plain_directories_resolve_within() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().canonicalize()?;
        std::fs::create_dir(root.join("Data"))?;

        resolves_within(&root, &root.join("Data").join("new").join("file.txt"), "Data/new/file.txt")?;
        resolves_within(&root, &root.join("top.txt"), "top.txt")?;

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn linked_directory_outside_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let base = dir.path().canonicalize()?;
        let root = base.join("out");
        std::fs::create_dir_all(base.join("outside"))?;
        std::fs::create_dir(&root)?;
        std::os::unix::fs::symlink(base.join("outside"), root.join("Data"))?;

        let path = root.join("Data").join("evil.txt");
        assert!(matches!(
            resolves_within(&root, &path, "Data\\evil.txt"),
            Err(Error::InvalidPath { .. })
        ));

        let nested = root.join("Data").join("deeper").join("evil.txt");
        assert!(matches!(
            resolves_within(&root, &nested, "Data\\deeper\\evil.txt"),
            Err(Error::InvalidPath { .. })
        ));

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn linked_file_outside_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let base = dir.path().canonicalize()?;
        let root = base.join("out");
        std::fs::create_dir(&root)?;
        std::fs::write(base.join("victim.txt"), b"keep")?;
        std::os::unix::fs::symlink(base.join("victim.txt"), root.join("readme.txt"))?;
        std::os::unix::fs::symlink(base.join("missing.txt"), root.join("dangling.txt"))?;

        assert!(resolves_within(&root, &root.join("readme.txt"), "readme.txt").is_err());
        assert!(resolves_within(&root, &root.join("dangling.txt"), "dangling.txt").is_err());

        Ok(())
    }
}
