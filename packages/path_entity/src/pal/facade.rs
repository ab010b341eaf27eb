// Facades that dispatch to either the real platform or a mock in tests.
//
// The same entity and walker code runs against both; the mock variants only exist in test builds.

use std::fmt::{self, Debug};
use std::io;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Arc;
use std::time::Duration;
#[cfg(test)]
use std::vec;

#[cfg(test)]
use crate::pal::MockPlatform;
use crate::pal::{
    BUILD_TARGET_PLATFORM, BuildTargetPlatform, DirListingImpl, FileAttributes, HiddenConvention,
    ListedEntry, Platform,
};

/// Facade over the operating system, dispatching to the real or the mock implementation.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Target(&'static BuildTargetPlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

// Facade types are trivial pass-through layers - not worth testing.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl PlatformFacade {
    pub(crate) const fn target() -> Self {
        Self::Target(&BUILD_TARGET_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

// Facade types are trivial pass-through layers - not worth testing.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Platform for PlatformFacade {
    fn stat(&self, path: &Path) -> io::Result<FileAttributes> {
        match self {
            Self::Target(p) => p.stat(path),
            #[cfg(test)]
            Self::Mock(p) => p.stat(path),
        }
    }

    fn absolute_path(&self, path: &Path) -> io::Result<PathBuf> {
        match self {
            Self::Target(p) => p.absolute_path(path),
            #[cfg(test)]
            Self::Mock(p) => p.absolute_path(path),
        }
    }

    fn canonical_path(&self, absolute: &Path) -> io::Result<PathBuf> {
        match self {
            Self::Target(p) => p.canonical_path(absolute),
            #[cfg(test)]
            Self::Mock(p) => p.canonical_path(absolute),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListingFacade> {
        match self {
            Self::Target(p) => p.read_dir(path),
            #[cfg(test)]
            Self::Mock(p) => p.read_dir(path),
        }
    }

    fn delete(&self, path: &Path, attributes: Option<FileAttributes>) -> io::Result<()> {
        match self {
            Self::Target(p) => p.delete(path, attributes),
            #[cfg(test)]
            Self::Mock(p) => p.delete(path, attributes),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        match self {
            Self::Target(p) => p.rename(from, to),
            #[cfg(test)]
            Self::Mock(p) => p.rename(from, to),
        }
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        match self {
            Self::Target(p) => p.create_dir(path),
            #[cfg(test)]
            Self::Mock(p) => p.create_dir(path),
        }
    }

    fn sleep(&self, duration: Duration) {
        match self {
            Self::Target(p) => p.sleep(duration),
            #[cfg(test)]
            Self::Mock(p) => p.sleep(duration),
        }
    }

    fn hidden_convention(&self) -> HiddenConvention {
        match self {
            Self::Target(p) => p.hidden_convention(),
            #[cfg(test)]
            Self::Mock(p) => p.hidden_convention(),
        }
    }
}

// Debug implementations have no API contract to test.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(p) => p.fmt(f),
            #[cfg(test)]
            Self::Mock(p) => p.fmt(f),
        }
    }
}

/// An open directory listing. Dropping it releases the OS directory handle, which covers every
/// exit path out of a directory visit.
pub(crate) enum DirListingFacade {
    Target(DirListingImpl),

    #[cfg(test)]
    Fake(vec::IntoIter<io::Result<ListedEntry>>),
}

impl DirListingFacade {
    /// A listing that yields the given results in order, for unit tests with a mock platform.
    #[cfg(test)]
    pub(crate) fn fake(entries: Vec<io::Result<ListedEntry>>) -> Self {
        Self::Fake(entries.into_iter())
    }
}

impl From<DirListingImpl> for DirListingFacade {
    fn from(listing: DirListingImpl) -> Self {
        Self::Target(listing)
    }
}

// Facade types are trivial pass-through layers - not worth testing.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Iterator for DirListingFacade {
    type Item = io::Result<ListedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Target(listing) => listing.next(),
            #[cfg(test)]
            Self::Fake(entries) => entries.next(),
        }
    }
}

// Debug implementations have no API contract to test.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Debug for DirListingFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(listing) => listing.fmt(f),
            #[cfg(test)]
            Self::Fake(_) => f.debug_struct("DirListingFacade::Fake").finish(),
        }
    }
}
