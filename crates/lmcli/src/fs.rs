//! File-system helpers used by the commands.

use std::io;
use std::path::{Path, PathBuf};

use tokio::task::spawn_blocking;

/// Directories that are never shown in a directory tree.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// The kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file, or anything that is not a directory.
    File,
    /// A directory. Symbolic links are not followed.
    Directory,
}

/// An entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirEntry {
    /// File name of the entry.
    pub name: String,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl DirEntry {
    /// Returns the name, with a trailing `/` for directories.
    #[inline]
    pub fn display_name(&self) -> String {
        match self.kind {
            EntryKind::File => self.name.clone(),
            EntryKind::Directory => format!("{}/", self.name),
        }
    }
}

/// Resolves `input` against `base`, absolute paths are kept as they are.
#[inline]
pub fn resolve_path(base: &Path, input: &Path) -> PathBuf {
    if input.is_absolute() {
        input.to_owned()
    } else {
        base.join(input)
    }
}

/// Reads a whole file as UTF-8 text.
#[inline]
pub async fn read_to_string(path: &Path) -> io::Result<String> {
    tokio::fs::read_to_string(path).await
}

/// Writes a whole file, creating or truncating it.
#[inline]
pub async fn write(path: &Path, contents: &str) -> io::Result<()> {
    tokio::fs::write(path, contents).await
}

/// Checks whether a file or directory exists at `path`.
#[inline]
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Lists the visible entries of a directory, sorted by name.
///
/// Hidden entries (names starting with `.`) are left out.
pub async fn list_dir(path: &Path) -> io::Result<Vec<DirEntry>> {
    let path = path.to_owned();
    spawn_blocking(move || read_entries(&path))
        .await
        .map_err(io::Error::other)?
}

/// Renders the tree below `path`, one entry per line, indented by two spaces
/// per level.
///
/// Hidden entries and `node_modules` are skipped, and so are directories that
/// can't be read. An unreadable or empty `path` gives an empty string.
pub async fn directory_tree(path: &Path) -> String {
    let path = path.to_owned();
    spawn_blocking(move || {
        let mut tree = String::new();
        write_tree(&path, "", &mut tree);
        tree
    })
    .await
    .unwrap_or_default()
}

fn write_tree(dir: &Path, indent: &str, out: &mut String) {
    let entries = match read_entries(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("skipping {}: {err}", dir.display());
            return;
        }
    };

    for entry in entries {
        if SKIPPED_DIRS.contains(&entry.name.as_str()) {
            continue;
        }
        out.push_str(indent);
        out.push_str(&entry.display_name());
        out.push('\n');

        if entry.kind == EntryKind::Directory {
            let child_indent = format!("{indent}  ");
            write_tree(&dir.join(&entry.name), &child_indent, out);
        }
    }
}

fn read_entries(dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let kind = if entry.file_type()?.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(DirEntry { name, kind });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
