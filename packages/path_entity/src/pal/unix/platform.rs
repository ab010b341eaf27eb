use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::{self, Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::pal::unix::{DirListingImpl, RawStat, decode_stat};
use crate::pal::{DirListingFacade, FileAttributes, FileKind, HiddenConvention, Platform};

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

/// The real operating system that the build is targeting.
///
/// You would only use a different platform in unit tests that need to simulate OS failures.
/// Even then, whenever possible, tests should use the real platform for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetPlatform;

// Real OS bindings are excluded from coverage measurement because:
// 1. They are tested via integration tests running against a real filesystem.
// 2. Error paths require OS-level failures that are impractical to trigger in tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Platform for BuildTargetPlatform {
    fn stat(&self, path: &Path) -> io::Result<FileAttributes> {
        // lstat first so that symbolic links are observable, then stat through the link.
        let link_metadata = fs::symlink_metadata(path)?;
        let is_symlink = link_metadata.file_type().is_symlink();

        let metadata = if is_symlink {
            // A dangling link still exists as an entry, described by its own metadata.
            fs::metadata(path).unwrap_or(link_metadata)
        } else {
            link_metadata
        };

        Ok(decode_stat(&RawStat::from(&metadata), is_symlink, path))
    }

    fn absolute_path(&self, path: &Path) -> io::Result<PathBuf> {
        path::absolute(path)
    }

    fn canonical_path(&self, absolute: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(absolute)
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListingFacade> {
        DirListingImpl::open(path).map(DirListingFacade::from)
    }

    fn delete(&self, path: &Path, attributes: Option<FileAttributes>) -> io::Result<()> {
        // A symbolic link to a directory is unlinked, never rmdir-ed.
        let is_real_directory = attributes.is_some_and(|attributes| {
            attributes.kind == FileKind::Directory && !attributes.is_symlink
        });

        if is_real_directory {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        // rename(2) atomically replaces an existing destination.
        fs::rename(from, to)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        DirBuilder::new().mode(0o700).create(path)
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }

    fn hidden_convention(&self) -> HiddenConvention {
        HiddenConvention::LeadingDot
    }
}
