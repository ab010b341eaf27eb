use std::io;

use thiserror::Error;

/// An operating system failure, reduced to the numeric OS error code and the text the OS
/// provides for it.
///
/// Handed to walk callbacks alongside [`WalkEvent::LeaveDir`][crate::WalkEvent::LeaveDir] when a
/// directory could not be listed. Displays as `<code>:<message>`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{code}:{message}")]
pub struct OsError {
    code: i32,
    message: String,
}

impl OsError {
    /// The raw OS error code (`errno` on Unix, the Win32 error code on Windows).
    ///
    /// Zero if the failure did not originate from a numbered OS error.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&io::Error> for OsError {
    fn from(error: &io::Error) -> Self {
        let code = error.raw_os_error().unwrap_or_default();
        let text = error.to_string();

        // The standard library appends " (os error N)", which the code field already carries.
        let suffix = format!(" (os error {code})");
        let message = text.strip_suffix(&suffix).unwrap_or(&text).to_owned();

        Self { code, message }
    }
}

impl From<io::Error> for OsError {
    fn from(error: io::Error) -> Self {
        Self::from(&error)
    }
}
