#![forbid(unsafe_code)]

//! Hierarchical directory listing.
//!
//! The listing is read once, at construction, and is a snapshot from then
//! on. Entry 0 is the root directory itself; every other entry is a
//! descendant down to `max_depth` levels, in depth-first order with
//! directories before files and each group sorted case-insensitively.
//! Scoping to a directory entry restricts the palette to what lies below it.

use std::io;
use std::path::{Path, PathBuf};

use crate::source::{Entries, Entry, IconRef, ItemSource, Payload, Scope, SourceError, SourceId};

/// Icon name for directories.
pub const FOLDER_ICON: &str = "folder";
/// Icon name for files.
pub const FILE_ICON: &str = "file";

/// A snapshot of a directory tree.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    id: SourceId,
    root: PathBuf,
    entries: Vec<Entry>,
    parents: Vec<Option<usize>>,
    dirs: Vec<bool>,
}

impl FileSystemSource {
    /// Read `root` and its descendants down to `max_depth` levels.
    ///
    /// `max_depth == 1` lists the root's direct children only. Unreadable
    /// subdirectories are listed but left empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` itself cannot be read.
    pub fn from_path(root: impl AsRef<Path>, max_depth: usize) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        let mut source = Self {
            id: SourceId::next(),
            root: root.clone(),
            entries: Vec::new(),
            parents: Vec::new(),
            dirs: Vec::new(),
        };
        source.push(name, root.clone(), true, None);
        source.walk(&root, 0, 1, max_depth)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            root = %source.root.display(),
            entries = source.entries.len(),
            "filesystem source loaded"
        );
        Ok(source)
    }

    fn walk(&mut self, dir: &Path, parent: usize, depth: usize, max_depth: usize) -> io::Result<()> {
        if depth > max_depth {
            return Ok(());
        }
        for item in read_directory(dir)? {
            let index = self.push(item.name, item.path.clone(), item.is_dir, Some(parent));
            if item.is_dir
                && let Err(_err) = self.walk(&item.path, index, depth + 1, max_depth)
            {
                #[cfg(feature = "tracing")]
                tracing::warn!(path = %item.path.display(), error = %_err, "skipping unreadable directory");
            }
        }
        Ok(())
    }

    fn push(&mut self, name: String, path: PathBuf, is_dir: bool, parent: Option<usize>) -> usize {
        let index = self.entries.len();
        let icon = IconRef::new(if is_dir { FOLDER_ICON } else { FILE_ICON });
        self.entries
            .push(Entry::new(index, name, Payload::Path(path)).with_icon(icon));
        self.parents.push(parent);
        self.dirs.push(is_dir);
        index
    }

    /// The directory this snapshot was read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scope covering everything below the root directory.
    #[must_use]
    pub const fn root_scope(&self) -> Scope {
        Scope::new(0)
    }

    /// Scope for a listed directory, or `None` if `path` is not one.
    #[must_use]
    pub fn scope_for(&self, path: impl AsRef<Path>) -> Option<Scope> {
        let path = path.as_ref();
        self.entries
            .iter()
            .zip(&self.dirs)
            .find(|(entry, is_dir)| **is_dir && entry.payload == Payload::Path(path.to_path_buf()))
            .map(|(entry, _)| Scope::new(entry.position))
    }

    /// Path of the entry at `index`.
    #[must_use]
    pub fn path(&self, index: usize) -> Option<&Path> {
        match &self.entries.get(index)?.payload {
            Payload::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Whether the entry at `index` is a directory.
    #[must_use]
    pub fn is_dir(&self, index: usize) -> bool {
        self.dirs.get(index).copied().unwrap_or(false)
    }
}

impl ItemSource for FileSystemSource {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn count(&self) -> usize {
        self.entries.len()
    }

    fn entry_at(&self, index: usize) -> Result<&Entry, SourceError> {
        self.entries.get(index).ok_or(SourceError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    fn enumerate(&self) -> Entries<'_> {
        Box::new(self.entries.iter())
    }

    fn is_hierarchical(&self) -> bool {
        true
    }

    fn parent_of(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }
}

struct DirItem {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Read a directory, directories first, then files, each sorted by
/// lowercase name. Entries that cannot be inspected are skipped.
fn read_directory(path: &Path) -> io::Result<Vec<DirItem>> {
    let items = std::fs::read_dir(path)?.map(|entry| -> io::Result<DirItem> {
        let entry = entry?;
        Ok(DirItem {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir: entry.file_type()?.is_dir(),
        })
    });
    Ok(sort_items(path, items))
}

fn sort_items(_dir: &Path, items: impl IntoIterator<Item = io::Result<DirItem>>) -> Vec<DirItem> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for item in items {
        match item {
            Ok(item) if item.is_dir => dirs.push(item),
            Ok(item) => files.push(item),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(dir = %_dir.display(), error = %_err, "skipping unreadable entry");
            }
        }
    }

    dirs.sort_by_key(|d| d.name.to_lowercase());
    files.sort_by_key(|f| f.name.to_lowercase());
    dirs.extend(files);
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::write(dir.path().join("build.rs"), "").unwrap();
        dir
    }

    fn texts(src: &FileSystemSource) -> Vec<&str> {
        src.enumerate().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn depth_one_lists_direct_children_dirs_first() {
        let dir = fixture();
        let src = FileSystemSource::from_path(dir.path(), 1).unwrap();
        assert_eq!(&texts(&src)[1..], ["src", "build.rs", "README.md"]);
        assert!(src.is_dir(0));
        assert!(src.is_dir(1));
        assert!(!src.is_dir(2));
    }

    #[test]
    fn depth_two_nests_in_depth_first_order() {
        let dir = fixture();
        let src = FileSystemSource::from_path(dir.path(), 2).unwrap();
        assert_eq!(&texts(&src)[1..], ["src", "main.rs", "build.rs", "README.md"]);
        assert_eq!(src.parent_of(2), Some(1));
        assert_eq!(src.parent_of(1), Some(0));
        assert_eq!(src.parent_of(0), None);
    }

    #[test]
    fn scope_for_directory() {
        let dir = fixture();
        let src = FileSystemSource::from_path(dir.path(), 2).unwrap();
        let scope = src.scope_for(dir.path().join("src")).expect("src is listed");
        assert_eq!(scope, Scope::new(1));
        assert!(src.in_scope(2, scope));
        assert!(!src.in_scope(3, scope));
        assert_eq!(src.scope_for(dir.path()), Some(src.root_scope()));
        assert_eq!(src.scope_for(dir.path().join("build.rs")), None);
    }

    #[test]
    fn payloads_and_icons() {
        let dir = fixture();
        let src = FileSystemSource::from_path(dir.path(), 1).unwrap();
        let readme = src.entry_at(3).unwrap();
        assert_eq!(readme.payload, Payload::Path(dir.path().join("README.md")));
        assert_eq!(readme.icon.as_ref().map(IconRef::name), Some(FILE_ICON));
        assert_eq!(src.path(1), Some(dir.path().join("src").as_path()));
        assert_eq!(src.root(), dir.path());
    }

    #[test]
    fn unreadable_entry_is_skipped() {
        let item = |name: &str, is_dir: bool| -> io::Result<DirItem> {
            Ok(DirItem {
                name: name.to_string(),
                path: PathBuf::from(name),
                is_dir,
            })
        };
        let items = vec![
            item("zeta.txt", false),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            item("Alpha", true),
            item("beta.txt", false),
        ];
        let sorted = sort_items(Path::new("."), items);
        let names: Vec<&str> = sorted.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "beta.txt", "zeta.txt"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = fixture();
        assert!(FileSystemSource::from_path(dir.path().join("nope"), 1).is_err());
    }
}
