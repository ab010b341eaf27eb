// Conversions between Rust values and the raw Win32 representations.

use std::ffi::OsString;
use std::io;
use std::iter;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use windows::Win32::Foundation::FILETIME;
use windows::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_DEVICE, FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_HIDDEN,
    FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_REPARSE_POINT, FILE_FLAGS_AND_ATTRIBUTES,
};

use crate::pal::{FileAttributes, FileKind};

/// A `FILETIME` counts 100-nanosecond ticks since 1601-01-01 UTC. This is the distance to the
/// Unix epoch in milliseconds.
pub(crate) const WIN_TO_UNIX_EPOCH_MILLIS: i64 = 11_644_473_600_000;

const TICKS_PER_MILLI: u64 = 10_000;

/// HRESULTs that wrap a plain Win32 error code use this facility.
const WIN32_FACILITY_MASK: u32 = 0xFFFF_0000;
const WIN32_FACILITY_BITS: u32 = 0x8007_0000;

const BACKSLASH: u16 = b'\\' as u16;

/// The raw fields shared by `WIN32_FILE_ATTRIBUTE_DATA` and `WIN32_FIND_DATAW`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawFindData {
    pub(crate) attributes: u32,
    pub(crate) creation_time: FILETIME,
    pub(crate) last_write_time: FILETIME,
    pub(crate) size_high: u32,
    pub(crate) size_low: u32,
}

pub(crate) fn decode_attributes(raw: &RawFindData) -> FileAttributes {
    let has = |flag: FILE_FLAGS_AND_ATTRIBUTES| raw.attributes & flag.0 != 0;

    // There is no "device" mode bit here; Windows reports a dedicated attribute instead.
    let kind = if has(FILE_ATTRIBUTE_DIRECTORY) {
        FileKind::Directory
    } else if has(FILE_ATTRIBUTE_DEVICE) {
        FileKind::Device
    } else {
        FileKind::Regular
    };

    let is_file = kind == FileKind::Regular;

    FileAttributes {
        kind,
        is_symlink: has(FILE_ATTRIBUTE_REPARSE_POINT),
        is_hidden: has(FILE_ATTRIBUTE_HIDDEN),
        readable: is_file,
        writable: is_file && !has(FILE_ATTRIBUTE_READONLY),
        modified_millis: filetime_to_unix_millis(raw.last_write_time),
        created_millis: filetime_to_unix_millis(raw.creation_time),
        length: (u64::from(raw.size_high) << 32) | u64::from(raw.size_low),
    }
}

#[expect(
    clippy::integer_division,
    reason = "sub-millisecond precision is intentionally dropped"
)]
pub(crate) fn filetime_to_unix_millis(time: FILETIME) -> i64 {
    let ticks = (u64::from(time.dwHighDateTime) << 32) | u64::from(time.dwLowDateTime);
    let millis_since_1601 = i64::try_from(ticks / TICKS_PER_MILLI).unwrap_or(i64::MAX);

    millis_since_1601.saturating_sub(WIN_TO_UNIX_EPOCH_MILLIS)
}

/// Applies the extended-length prefix so that paths longer than `MAX_PATH` work:
/// `C:\x` becomes `\\?\C:\x` and `\\server\share` becomes `\\?\UNC\server\share`.
/// Paths that already carry the prefix are returned unchanged.
pub(crate) fn extended_length_path(absolute: &Path) -> PathBuf {
    let units: Vec<u16> = absolute.as_os_str().encode_wide().collect();

    let prefixed: Vec<u16> = if units.is_empty() || units.starts_with(&wide(r"\\?")) {
        units
    } else if units.starts_with(&[BACKSLASH, BACKSLASH]) {
        // Keep one of the two leading backslashes: `\\server` -> `\\?\UNC\server`.
        wide(r"\\?\UNC")
            .into_iter()
            .chain(units.into_iter().skip(1))
            .collect()
    } else {
        wide(r"\\?\").into_iter().chain(units).collect()
    };

    PathBuf::from(OsString::from_wide(&prefixed))
}

/// The NUL-terminated UTF-16 form of an absolute path, ready to be passed to a `...W` function.
pub(crate) fn to_native(absolute: &Path) -> Vec<u16> {
    to_wide_nul(&extended_length_path(absolute))
}

/// The NUL-terminated UTF-16 form of a path, without any prefixing.
pub(crate) fn to_wide_nul(path: &Path) -> Vec<u16> {
    path.as_os_str()
        .encode_wide()
        .chain(iter::once(0))
        .collect()
}

/// Converts a fixed-size, NUL-terminated UTF-16 buffer (e.g. `cFileName`) to an `OsString`.
pub(crate) fn from_wide_buffer(buffer: &[u16]) -> OsString {
    let len = buffer.iter().position(|&unit| unit == 0).unwrap_or(buffer.len());

    OsString::from_wide(buffer.get(..len).unwrap_or_default())
}

/// Maps a `windows` crate error back to the Win32 error code, so that `io::ErrorKind` matching
/// (e.g. `NotFound`) behaves exactly as it does on Unix.
pub(crate) fn to_io_error(error: windows::core::Error) -> io::Error {
    let bits = u32::from_ne_bytes(error.code().0.to_ne_bytes());

    if bits & WIN32_FACILITY_MASK == WIN32_FACILITY_BITS {
        if let Ok(code) = i32::try_from(bits & !WIN32_FACILITY_MASK) {
            return io::Error::from_raw_os_error(code);
        }
    }

    io::Error::other(error)
}

fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}
