use std::ffi::OsString;
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::pal::DirListingFacade;

/// How an entry is classified once the platform-specific metadata has been decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FileKind {
    Regular,
    Directory,
    Device,

    /// FIFOs, sockets and anything else that is neither of the above.
    #[cfg_attr(
        all(windows, not(test)),
        allow(dead_code, reason = "Windows reports such entries as regular files")
    )]
    Other,
}

/// Normalized metadata for one path, decoded from the raw per-platform layout
/// (`stat` mode bits on Unix, `FILE_ATTRIBUTE_*` flags and `FILETIME` on Windows).
///
/// Immutable once fetched. Timestamps are milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FileAttributes {
    pub(crate) kind: FileKind,
    pub(crate) is_symlink: bool,

    /// Only meaningful on platforms with [`HiddenConvention::Attribute`].
    pub(crate) is_hidden: bool,

    pub(crate) readable: bool,
    pub(crate) writable: bool,

    pub(crate) modified_millis: i64,

    /// Native creation time on Windows, inode change time on Unix.
    pub(crate) created_millis: i64,

    pub(crate) length: u64,
}

/// What a directory listing says about a child before anyone asks for its metadata.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ListedType {
    Directory,
    Symlink,
    Other,
}

/// One child yielded by a directory listing.
#[derive(Debug)]
pub(crate) struct ListedEntry {
    pub(crate) name: OsString,

    /// Cheap type hint from the listing API, if it offers one.
    pub(crate) listed_type: Option<ListedType>,

    /// Complete metadata, if the listing API returns it alongside the name (Windows does).
    pub(crate) attributes: Option<FileAttributes>,
}

/// Decides what "hidden" means on a platform. The two conventions are intentionally different.
#[cfg_attr(
    not(test),
    allow(dead_code, reason = "each platform only constructs its own convention")
)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum HiddenConvention {
    /// The final path component starts with a dot. No metadata is consulted.
    LeadingDot,

    /// The filesystem carries a dedicated hidden attribute.
    Attribute,
}

/// Every operating system call made by this crate goes through this trait, enabling them to be
/// mocked in unit tests.
///
/// All paths handed to the platform are absolute. Implementations translate them to whatever
/// native form the OS wants (e.g. extended-length paths on Windows).
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Fetches and decodes the metadata of `path`, following a final symbolic link if possible.
    fn stat(&self, path: &Path) -> io::Result<FileAttributes>;

    /// Makes a (possibly relative) path absolute without requiring it to exist.
    fn absolute_path(&self, path: &Path) -> io::Result<PathBuf>;

    /// Converts an absolute path into the canonical form of the platform.
    fn canonical_path(&self, absolute: &Path) -> io::Result<PathBuf>;

    /// Opens a listing of the directory. The OS handle is released when the listing is dropped.
    fn read_dir(&self, path: &Path) -> io::Result<DirListingFacade>;

    /// Removes one directory (must be empty) or one non-directory entry. The attributes, when
    /// known, tell the platform which removal primitive applies.
    fn delete(&self, path: &Path, attributes: Option<FileAttributes>) -> io::Result<()>;

    /// Moves `from` to `to`, replacing an existing destination where the OS allows it.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Creates a single directory, with owner-only permissions on Unix.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Blocks the current thread, used for backoff between retries.
    fn sleep(&self, duration: Duration);

    fn hidden_convention(&self) -> HiddenConvention;
}
