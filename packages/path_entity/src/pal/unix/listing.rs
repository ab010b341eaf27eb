use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::path::Path;

use crate::pal::{ListedEntry, ListedType};

/// An open `opendir()` stream. The stream is closed when this is dropped.
#[derive(Debug)]
pub(crate) struct DirListingImpl {
    inner: ReadDir,
}

impl DirListingImpl {
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            inner: fs::read_dir(path)?,
        })
    }
}

impl Iterator for DirListingImpl {
    type Item = io::Result<ListedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        // The standard library already skips the "." and ".." pseudo-entries.
        self.inner.next().map(|entry| entry.map(|entry| to_listed_entry(&entry)))
    }
}

fn to_listed_entry(entry: &DirEntry) -> ListedEntry {
    // `d_type` when the filesystem fills it in, otherwise an `lstat`. Links are never followed.
    let listed_type = entry.file_type().ok().map(|file_type| {
        if file_type.is_symlink() {
            ListedType::Symlink
        } else if file_type.is_dir() {
            ListedType::Directory
        } else {
            ListedType::Other
        }
    });

    ListedEntry {
        name: entry.file_name(),
        listed_type,
        attributes: None,
    }
}
