use std::ffi::OsString;
use std::fs::DirBuilder;
use std::io;
use std::os::windows::ffi::OsStringExt;
use std::path::{Path, PathBuf};
use std::ptr;
use std::thread;
use std::time::Duration;

use windows::Win32::Storage::FileSystem::{
    DeleteFileW, GetFileAttributesExW, GetFileExInfoStandard, GetFullPathNameW,
    MOVEFILE_COPY_ALLOWED, MOVEFILE_REPLACE_EXISTING, MoveFileExW, RemoveDirectoryW,
    WIN32_FILE_ATTRIBUTE_DATA,
};
use windows::core::PCWSTR;

use crate::pal::windows::{
    RawFindData, decode_attributes, extended_length_path, to_io_error, to_native, to_wide_nul,
};
use crate::pal::{
    DirListingFacade, DirListingImpl, FileAttributes, FileKind, HiddenConvention, Platform,
};

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
        let native = to_native(path);
        let mut data = WIN32_FILE_ATTRIBUTE_DATA::default();

        // SAFETY: `native` is NUL-terminated and `data` is the out-buffer type that
        // `GetFileExInfoStandard` fills.
        unsafe {
            GetFileAttributesExW(
                PCWSTR::from_raw(native.as_ptr()),
                GetFileExInfoStandard,
                ptr::from_mut(&mut data).cast(),
            )
        }
        .map_err(to_io_error)?;

        Ok(decode_attributes(&RawFindData {
            attributes: data.dwFileAttributes,
            creation_time: data.ftCreationTime,
            last_write_time: data.ftLastWriteTime,
            size_high: data.nFileSizeHigh,
            size_low: data.nFileSizeLow,
        }))
    }

    fn absolute_path(&self, path: &Path) -> io::Result<PathBuf> {
        let wide = to_wide_nul(path);
        let mut buffer: Vec<u16> = Vec::new();

        // The first call reports the required size (including the NUL terminator). The current
        // directory can change between calls, so keep going until the result fits.
        loop {
            let buffer_arg = if buffer.is_empty() {
                None
            } else {
                Some(buffer.as_mut_slice())
            };

            // SAFETY: `wide` is NUL-terminated, the buffer slice carries its own length.
            let written =
                unsafe { GetFullPathNameW(PCWSTR::from_raw(wide.as_ptr()), buffer_arg, None) };
            let written = usize::try_from(written).map_err(io::Error::other)?;

            if written == 0 {
                return Err(io::Error::last_os_error());
            }

            if let Some(resolved) = buffer.get(..written).filter(|_| written < buffer.len()) {
                return Ok(PathBuf::from(OsString::from_wide(resolved)));
            }

            buffer = vec![0; written];
        }
    }

    fn canonical_path(&self, absolute: &Path) -> io::Result<PathBuf> {
        Ok(extended_length_path(absolute))
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirListingFacade> {
        DirListingImpl::open(path).map(DirListingFacade::from)
    }

    fn delete(&self, path: &Path, attributes: Option<FileAttributes>) -> io::Result<()> {
        let native = to_native(path);
        let target = PCWSTR::from_raw(native.as_ptr());

        // Junctions and directory symbolic links carry the directory flag and need
        // `RemoveDirectoryW` too.
        let is_directory =
            attributes.is_some_and(|attributes| attributes.kind == FileKind::Directory);

        if is_directory {
            // SAFETY: `native` is NUL-terminated and outlives the call.
            unsafe { RemoveDirectoryW(target) }.map_err(to_io_error)
        } else {
            // SAFETY: `native` is NUL-terminated and outlives the call.
            unsafe { DeleteFileW(target) }.map_err(to_io_error)
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = to_native(from);
        let to = to_native(to);

        // Without REPLACE_EXISTING the move fails if the destination exists, unlike rename(2).
        // SAFETY: Both buffers are NUL-terminated and outlive the call.
        unsafe {
            MoveFileExW(
                PCWSTR::from_raw(from.as_ptr()),
                PCWSTR::from_raw(to.as_ptr()),
                MOVEFILE_COPY_ALLOWED | MOVEFILE_REPLACE_EXISTING,
            )
        }
        .map_err(to_io_error)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        DirBuilder::new().create(extended_length_path(path))
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }

    fn hidden_convention(&self) -> HiddenConvention {
        HiddenConvention::Attribute
    }
}
