use std::ffi::{OsStr, OsString};
use std::fmt::{self, Debug};
use std::io;
use std::path::Path;
use std::ptr;

use tracing::debug;
use windows::Win32::Foundation::{ERROR_NO_MORE_FILES, HANDLE};
use windows::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_DIRECTORY, FILE_ATTRIBUTE_REPARSE_POINT, FIND_FIRST_EX_FLAGS, FindClose,
    FindExInfoBasic, FindExSearchNameMatch, FindFirstFileExW, FindNextFileW, WIN32_FIND_DATAW,
};
use windows::core::PCWSTR;

use crate::pal::windows::{
    RawFindData, decode_attributes, from_wide_buffer, to_io_error, to_native,
};
use crate::pal::{ListedEntry, ListedType};

/// An open `FindFirstFileExW` search over one directory. The search handle is closed on drop.
pub(crate) struct DirListingImpl {
    handle: HANDLE,

    /// `FindFirstFileExW` already returns the first entry, so it is parked here until asked for.
    pending: Option<WIN32_FIND_DATAW>,

    exhausted: bool,
}

impl DirListingImpl {
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        let pattern = to_native(&path.join("*"));
        let mut data = WIN32_FIND_DATAW::default();

        // SAFETY: `pattern` is NUL-terminated and outlives the call, `data` is a valid out-buffer
        // of the type that `FindExInfoBasic` fills.
        let handle = unsafe {
            FindFirstFileExW(
                PCWSTR::from_raw(pattern.as_ptr()),
                FindExInfoBasic,
                ptr::from_mut(&mut data).cast(),
                FindExSearchNameMatch,
                None,
                FIND_FIRST_EX_FLAGS(0),
            )
        }
        .map_err(to_io_error)?;

        Ok(Self {
            handle,
            pending: Some(data),
            exhausted: false,
        })
    }

    fn next_raw(&mut self) -> Option<io::Result<WIN32_FIND_DATAW>> {
        if let Some(data) = self.pending.take() {
            return Some(Ok(data));
        }

        if self.exhausted {
            return None;
        }

        let mut data = WIN32_FIND_DATAW::default();

        // SAFETY: The handle stays open until drop and `data` is a valid out-buffer.
        match unsafe { FindNextFileW(self.handle, &mut data) } {
            Ok(()) => Some(Ok(data)),
            Err(error) => {
                self.exhausted = true;

                if error.code() == ERROR_NO_MORE_FILES.to_hresult() {
                    None
                } else {
                    Some(Err(to_io_error(error)))
                }
            }
        }
    }
}

impl Iterator for DirListingImpl {
    type Item = io::Result<ListedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let data = match self.next_raw()? {
                Ok(data) => data,
                Err(error) => return Some(Err(error)),
            };

            let name = from_wide_buffer(&data.cFileName);

            if name == OsStr::new(".") || name == OsStr::new("..") {
                continue;
            }

            return Some(Ok(to_listed_entry(name, &data)));
        }
    }
}

fn to_listed_entry(name: OsString, data: &WIN32_FIND_DATAW) -> ListedEntry {
    let flags = data.dwFileAttributes;

    // A reparse point is reported before the directory flag so that junctions are not entered.
    let listed_type = if flags & FILE_ATTRIBUTE_REPARSE_POINT.0 != 0 {
        ListedType::Symlink
    } else if flags & FILE_ATTRIBUTE_DIRECTORY.0 != 0 {
        ListedType::Directory
    } else {
        ListedType::Other
    };

    let attributes = decode_attributes(&RawFindData {
        attributes: flags,
        creation_time: data.ftCreationTime,
        last_write_time: data.ftLastWriteTime,
        size_high: data.nFileSizeHigh,
        size_low: data.nFileSizeLow,
    });

    ListedEntry {
        name,
        listed_type: Some(listed_type),
        attributes: Some(attributes),
    }
}

impl Drop for DirListingImpl {
    fn drop(&mut self) {
        // SAFETY: The handle came from a successful `FindFirstFileExW` and is closed only here.
        if let Err(error) = unsafe { FindClose(self.handle) } {
            debug!(error = %error, "failed to close directory search handle");
        }
    }
}

// Debug implementations have no API contract to test.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Debug for DirListingImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirListingImpl")
            .field("handle", &self.handle)
            .field("pending", &self.pending.is_some())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
