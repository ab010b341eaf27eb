use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::pal::unix::looks_like_device_path;
use crate::pal::{FileAttributes, FileKind};

// `mode_t` is narrower than `u32` on some Unix flavors, so the constants are widened once here.
#[allow(
    clippy::unnecessary_cast,
    reason = "the cast is only a no-op on targets where mode_t is u32"
)]
mod mode {
    pub(super) const S_IFMT: u32 = libc::S_IFMT as u32;
    pub(super) const S_IFDIR: u32 = libc::S_IFDIR as u32;
    pub(super) const S_IFREG: u32 = libc::S_IFREG as u32;
    pub(super) const S_IFBLK: u32 = libc::S_IFBLK as u32;
    pub(super) const S_IFCHR: u32 = libc::S_IFCHR as u32;
    pub(super) const S_IFIFO: u32 = libc::S_IFIFO as u32;
    pub(super) const S_IFSOCK: u32 = libc::S_IFSOCK as u32;
    pub(super) const S_IRUSR: u32 = libc::S_IRUSR as u32;
    pub(super) const S_IWUSR: u32 = libc::S_IWUSR as u32;
}

use mode::*;

/// The fields of a `struct stat` this crate cares about, exactly as the OS reports them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct RawStat {
    pub(crate) mode: u32,
    pub(crate) mtime: i64,
    pub(crate) mtime_nsec: i64,
    pub(crate) ctime: i64,
    pub(crate) ctime_nsec: i64,
    pub(crate) size: u64,
}

impl From<&Metadata> for RawStat {
    fn from(metadata: &Metadata) -> Self {
        Self {
            mode: metadata.mode(),
            mtime: metadata.mtime(),
            mtime_nsec: metadata.mtime_nsec(),
            ctime: metadata.ctime(),
            ctime_nsec: metadata.ctime_nsec(),
            size: metadata.size(),
        }
    }
}

/// Decodes the mode bits and timestamps of a `stat` result.
///
/// `path` is only used for the device-name heuristic applied to FIFOs and sockets.
pub(crate) fn decode_stat(raw: &RawStat, is_symlink: bool, path: &Path) -> FileAttributes {
    let kind = match raw.mode & S_IFMT {
        S_IFDIR => FileKind::Directory,
        S_IFREG => FileKind::Regular,
        S_IFBLK | S_IFCHR => FileKind::Device,
        S_IFIFO | S_IFSOCK if looks_like_device_path(path) => FileKind::Device,
        _ => FileKind::Other,
    };

    FileAttributes {
        kind,
        is_symlink,
        is_hidden: false,
        readable: raw.mode & S_IRUSR != 0,
        writable: raw.mode & S_IWUSR != 0,
        modified_millis: to_millis(raw.mtime, raw.mtime_nsec),
        created_millis: to_millis(raw.ctime, raw.ctime_nsec),
        length: raw.size,
    }
}

#[expect(
    clippy::integer_division,
    reason = "sub-millisecond precision is intentionally dropped"
)]
fn to_millis(secs: i64, nanos: i64) -> i64 {
    secs.saturating_mul(1_000).saturating_add(nanos / 1_000_000)
}
