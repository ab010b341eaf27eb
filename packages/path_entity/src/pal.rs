//! Platform abstraction layer (PAL). Private API: everything above this layer only sees the
//! [`Platform`] trait and the normalized [`FileAttributes`] it returns.

mod abstractions;
pub(crate) use abstractions::*;

mod facade;
pub(crate) use facade::*;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub(crate) use windows::*;

#[cfg(not(any(unix, windows)))]
compile_error!("path_entity supports only Unix-like and Windows targets");
