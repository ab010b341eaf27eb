mod listing;
mod native;
mod platform;

pub(crate) use listing::*;
use native::*;
pub(crate) use platform::*;
