use std::cell::OnceCell;
use std::env;
use std::ffi::OsStr;
use std::fmt::{self, Display};
use std::io;
use std::path::{self, Path, PathBuf};

use tracing::debug;

use crate::PathNaming;
use crate::pal::{FileAttributes, FileKind, HiddenConvention, Platform, PlatformFacade};

/// The path separator preferred by the platform the build targets.
///
/// Paths created by this crate (e.g. children discovered during a walk) are joined with it.
pub const SEPARATOR: char = path::MAIN_SEPARATOR;

/// How many random names `create_temp_directory()` tries before giving up.
const TEMP_DIRECTORY_ATTEMPTS: usize = 16;

/// One filesystem path plus lazily fetched, cached knowledge about it.
///
/// The path is kept exactly as supplied, relative or absolute. Metadata is fetched from the
/// operating system on the first query that needs it and is then reused for the lifetime of the
/// entity, so repeated queries are consistent with each other even if the filesystem changes
/// underneath. Use [`refresh()`][Self::refresh] to forget what is cached.
///
/// Queries never fail: a path that does not exist, cannot be examined or is invalid (see
/// [`PathNaming::is_invalid`]) answers `false`, `0` or an empty path.
///
/// # Thread safety
///
/// The type is [`Send`] but not [`Sync`]. The cache is filled through `&self`, so a single
/// instance cannot be queried from multiple threads at once. Clone it instead.
///
/// # Example
///
/// ```
/// use path_entity::PathEntity;
///
/// let temp = PathEntity::new(std::env::temp_dir());
///
/// assert!(temp.exists());
/// assert!(temp.is_directory());
/// assert!(!temp.is_file());
/// ```
#[derive(Clone, Debug)]
pub struct PathEntity {
    path: PathBuf,

    absolute: OnceCell<PathBuf>,
    canonical: OnceCell<PathBuf>,

    /// `None` inside the cell means the fetch was attempted and failed.
    attributes: OnceCell<Option<FileAttributes>>,

    platform: PlatformFacade,
}

impl PathEntity {
    /// Creates an entity for `path`. Nothing is read from the filesystem yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_platform(path, PlatformFacade::target())
    }

    pub(crate) fn with_platform(path: impl Into<PathBuf>, platform: PlatformFacade) -> Self {
        Self {
            path: path.into(),
            absolute: OnceCell::new(),
            canonical: OnceCell::new(),
            attributes: OnceCell::new(),
            platform,
        }
    }

    /// Creates a new, uniquely named directory in the system temporary directory and returns an
    /// entity for it.
    ///
    /// The directory name is `prefix` followed by a random number. On Unix the directory is only
    /// accessible to its owner.
    ///
    /// # Errors
    ///
    /// Returns the operating system error if the directory could not be created, or
    /// [`io::ErrorKind::InvalidInput`] if `prefix` would produce an invalid path.
    pub fn create_temp_directory(prefix: &str) -> io::Result<Self> {
        Self::create_temp_directory_with(prefix, &PlatformFacade::target())
    }

    pub(crate) fn create_temp_directory_with(
        prefix: &str,
        platform: &PlatformFacade,
    ) -> io::Result<Self> {
        let parent = env::temp_dir();
        let mut collision = None;

        for _ in 0..TEMP_DIRECTORY_ATTEMPTS {
            let name = format!("{prefix}{}", rand::random::<u32>());
            let candidate = Self::with_platform(parent.join(name), platform.clone());

            if candidate.is_invalid() || candidate.absolute_path().as_os_str().is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "temporary directory prefix produces an invalid path",
                ));
            }

            match platform.create_dir(candidate.absolute_path()) {
                Ok(()) => return Ok(candidate),
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                    collision = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        Err(collision.unwrap_or_else(|| io::Error::from(io::ErrorKind::AlreadyExists)))
    }

    /// The path exactly as it was supplied.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path separator of the platform, same as [`SEPARATOR`].
    #[must_use]
    pub const fn separator() -> char {
        SEPARATOR
    }

    /// Whether the path names an existing filesystem entry.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.attributes().is_some()
    }

    /// Whether the path exists and is neither a directory nor a device.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.attributes().is_some_and(|attributes| {
            !matches!(attributes.kind, FileKind::Directory | FileKind::Device)
        })
    }

    /// Whether the path exists and is a directory (or a symbolic link to one).
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.has_kind(FileKind::Directory)
    }

    /// Whether the path exists and is a device.
    ///
    /// On Unix, block and character special files are devices. Other special files are only
    /// reported as devices if their path looks like a conventional device path, which is a
    /// best-effort guess. On Windows, the dedicated device attribute is used.
    #[must_use]
    pub fn is_device(&self) -> bool {
        self.has_kind(FileKind::Device)
    }

    /// Whether the path itself is a symbolic link (a reparse point on Windows).
    #[must_use]
    pub fn is_symbolic_link(&self) -> bool {
        self.attributes()
            .is_some_and(|attributes| attributes.is_symlink)
    }

    /// Whether the path is hidden by the conventions of the platform.
    ///
    /// On Unix a path is hidden if its name starts with a dot, whether it exists or not. On
    /// Windows the hidden attribute of an existing entry decides.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        if self.is_invalid() {
            return false;
        }

        match self.platform.hidden_convention() {
            HiddenConvention::LeadingDot => self.name().starts_with('.'),
            HiddenConvention::Attribute => self
                .attributes()
                .is_some_and(|attributes| attributes.is_hidden),
        }
    }

    /// Whether the owner may read the entry.
    #[must_use]
    pub fn can_read(&self) -> bool {
        self.attributes()
            .is_some_and(|attributes| attributes.readable)
    }

    /// Whether the owner may write the entry.
    #[must_use]
    pub fn can_write(&self) -> bool {
        self.attributes()
            .is_some_and(|attributes| attributes.writable)
    }

    /// Last modification time in milliseconds since the Unix epoch, or 0 if unknown.
    #[must_use]
    pub fn last_modified(&self) -> i64 {
        self.attributes()
            .map_or(0, |attributes| attributes.modified_millis)
    }

    /// Creation time in milliseconds since the Unix epoch, or 0 if unknown.
    ///
    /// Windows records this natively. On Unix the inode change time is the closest available
    /// approximation.
    #[must_use]
    pub fn creation_time(&self) -> i64 {
        self.attributes()
            .map_or(0, |attributes| attributes.created_millis)
    }

    /// Size in bytes, or 0 if unknown.
    #[must_use]
    pub fn length(&self) -> u64 {
        self.attributes().map_or(0, |attributes| attributes.length)
    }

    /// The path made absolute against the current working directory, without resolving symbolic
    /// links. Empty if the path is invalid or cannot be made absolute.
    #[must_use]
    pub fn absolute_path(&self) -> &Path {
        self.absolute.get_or_init(|| {
            if self.is_invalid() {
                return PathBuf::new();
            }

            self.platform
                .absolute_path(&self.path)
                .unwrap_or_else(|error| {
                    debug!(
                        path = %self.path.display(),
                        error = %error,
                        "cannot make path absolute"
                    );
                    PathBuf::new()
                })
        })
    }

    /// The canonical form of the path.
    ///
    /// On Unix this is the real path with symbolic links and `.`/`..` resolved, falling back to
    /// the absolute path if the entry does not exist. On Windows it is the extended-length form
    /// (`\\?\C:\...`, `\\?\UNC\...`) of the absolute path, which lifts the classic length limit.
    #[must_use]
    pub fn canonical_path(&self) -> &Path {
        self.canonical.get_or_init(|| {
            let absolute = self.absolute_path();

            if absolute.as_os_str().is_empty() {
                return PathBuf::new();
            }

            self.platform
                .canonical_path(absolute)
                .unwrap_or_else(|_| absolute.to_path_buf())
        })
    }

    /// A new entity for [`absolute_path()`][Self::absolute_path].
    #[must_use]
    pub fn absolute_file(&self) -> Self {
        let absolute = self.absolute_path().to_path_buf();

        let mut entity = Self::with_platform(absolute.clone(), self.platform.clone());
        entity.absolute = OnceCell::from(absolute);
        entity
    }

    /// A new entity for [`canonical_path()`][Self::canonical_path].
    #[must_use]
    pub fn canonical_file(&self) -> Self {
        let canonical = self.canonical_path().to_path_buf();

        let mut entity = Self::with_platform(canonical.clone(), self.platform.clone());
        entity.absolute = OnceCell::from(canonical.clone());
        entity.canonical = OnceCell::from(canonical);
        entity
    }

    /// Forgets the cached metadata and canonical path, so the next query asks the operating
    /// system again.
    pub fn refresh(&mut self) {
        self.attributes.take();
        self.canonical.take();
    }

    /// The cached metadata, fetched on first use.
    pub(crate) fn attributes(&self) -> Option<FileAttributes> {
        *self.attributes.get_or_init(|| self.fetch_attributes())
    }

    fn fetch_attributes(&self) -> Option<FileAttributes> {
        let absolute = self.absolute_path();

        if absolute.as_os_str().is_empty() {
            return None;
        }

        match self.platform.stat(absolute) {
            Ok(attributes) => Some(attributes),
            Err(error) => {
                debug!(path = %absolute.display(), error = %error, "cannot read metadata");
                None
            }
        }
    }

    fn has_kind(&self, kind: FileKind) -> bool {
        self.attributes()
            .is_some_and(|attributes| attributes.kind == kind)
    }

    pub(crate) fn platform(&self) -> &PlatformFacade {
        &self.platform
    }

    /// Drops the cached metadata after the entry was removed or replaced.
    pub(crate) fn forget_attributes(&mut self) {
        self.attributes.take();
    }

    /// Points this entity at the location of `target` after a successful move.
    pub(crate) fn adopt_location(&mut self, target: &Self) {
        self.path.clone_from(&target.path);
        self.absolute = OnceCell::from(target.absolute_path().to_path_buf());
        self.canonical = OnceCell::new();
        self.attributes = OnceCell::new();
    }

    /// An entity for a child discovered in a listing of this directory.
    ///
    /// The derived paths are extended from the parent instead of being resolved again. The
    /// canonical path is only carried over if the child is not a symbolic link, because resolving
    /// a link may lead anywhere.
    pub(crate) fn child(
        &self,
        name: &OsStr,
        attributes: Option<FileAttributes>,
        is_symlink: bool,
    ) -> Self {
        let mut child = Self::with_platform(self.path.join(name), self.platform.clone());

        let absolute = self.absolute_path();
        if !absolute.as_os_str().is_empty() {
            child.absolute = OnceCell::from(absolute.join(name));

            if !is_symlink {
                child.canonical = OnceCell::from(self.canonical_path().join(name));
            }
        }

        if let Some(attributes) = attributes {
            child.attributes = OnceCell::from(Some(attributes));
        }

        child
    }
}

impl PathNaming for PathEntity {
    fn as_path(&self) -> &Path {
        &self.path
    }
}

impl Display for PathEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for PathEntity {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for PathEntity {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}
