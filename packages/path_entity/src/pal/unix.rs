mod device;
mod listing;
mod platform;
mod stat;

use device::*;
pub(crate) use listing::*;
pub(crate) use platform::*;
use stat::*;
