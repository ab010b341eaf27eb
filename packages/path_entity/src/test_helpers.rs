// Shared building blocks for unit tests that run against `MockPlatform`.

use std::io;
use std::path::{Path, PathBuf};

use crate::PathEntity;
use crate::pal::{
    DirListingFacade, FileAttributes, FileKind, ListedEntry, ListedType, MockPlatform,
    PlatformFacade,
};

pub(crate) fn attributes(kind: FileKind) -> FileAttributes {
    FileAttributes {
        kind,
        is_symlink: false,
        is_hidden: false,
        readable: true,
        writable: true,
        modified_millis: 1_700_000_000_000,
        created_millis: 1_600_000_000_000,
        length: 0,
    }
}

pub(crate) fn file_attributes() -> FileAttributes {
    FileAttributes {
        length: 42,
        ..attributes(FileKind::Regular)
    }
}

pub(crate) fn dir_attributes() -> FileAttributes {
    attributes(FileKind::Directory)
}

/// A mock platform that resolves every path to itself, as if all test paths were already
/// absolute and canonical.
pub(crate) fn identity_platform() -> MockPlatform {
    let mut platform = MockPlatform::new();

    platform
        .expect_absolute_path()
        .returning(|path| Ok(path.to_path_buf()));
    platform
        .expect_canonical_path()
        .returning(|path| Ok(path.to_path_buf()));

    platform
}

pub(crate) fn entity(path: impl Into<PathBuf>, platform: MockPlatform) -> PathEntity {
    PathEntity::with_platform(path, PlatformFacade::from_mock(platform))
}

pub(crate) fn not_found() -> io::Error {
    io::Error::from(io::ErrorKind::NotFound)
}

pub(crate) fn listed_file(name: &str) -> io::Result<ListedEntry> {
    Ok(ListedEntry {
        name: name.into(),
        listed_type: Some(ListedType::Other),
        attributes: Some(file_attributes()),
    })
}

pub(crate) fn listed_dir(name: &str) -> io::Result<ListedEntry> {
    Ok(ListedEntry {
        name: name.into(),
        listed_type: Some(ListedType::Directory),
        attributes: Some(dir_attributes()),
    })
}

pub(crate) fn listing(entries: Vec<io::Result<ListedEntry>>) -> io::Result<DirListingFacade> {
    Ok(DirListingFacade::fake(entries))
}

pub(crate) fn is(expected: &'static str) -> impl Fn(&Path) -> bool + Send + 'static {
    move |path| path == Path::new(expected)
}
