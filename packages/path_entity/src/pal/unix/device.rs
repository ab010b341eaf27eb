// Best-effort recognition of device paths by their name alone.
//
// Only consulted for special files whose mode bits do not already say "block or character
// device". This is a heuristic and will misclassify unusual layouts.

use std::path::Path;

use crate::PathNaming;

const DEVICE_ROOTS: [&str; 3] = ["/dev/", r"\device\", r"\dosdevices\"];

const RESERVED_NAMES: [&str; 22] = [
    "NUL", "CON", "PRN", "AUX", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

pub(crate) fn looks_like_device_path(path: &Path) -> bool {
    let text = path.to_string_lossy().to_lowercase();

    if DEVICE_ROOTS.iter().any(|root| text.starts_with(root)) {
        return true;
    }

    let name = path.name();
    let name = name.trim_end_matches(':').to_uppercase();

    RESERVED_NAMES.contains(&name.as_str())
}
