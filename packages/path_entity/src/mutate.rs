use std::io;
use std::time::Duration;

use tracing::{debug, warn};

use crate::pal::{FileKind, Platform};
use crate::{PathEntity, PathNaming};

/// Retries granted to removing the destination in `try_rename_to()`.
const DESTINATION_DELETE_RETRIES: u32 = 1;

impl PathEntity {
    /// Removes the entry: an empty directory, or any non-directory (a symbolic link is removed
    /// itself, never its target).
    ///
    /// A failed attempt is retried up to `retries` more times. Before retry `n` (counting from 1)
    /// the calling thread sleeps `n - 1` seconds, which gives transient locks held by other
    /// processes time to go away.
    ///
    /// Returns `true` if the entry was removed. A real directory that turns out to be gone already
    /// also counts as removed. A non-directory that does not exist is reported as `false` without
    /// retrying. The cached metadata is forgotten either way.
    pub fn delete(&mut self, retries: u32) -> bool {
        if self.is_invalid() {
            return false;
        }

        let absolute = self.absolute_path().to_path_buf();
        if absolute.as_os_str().is_empty() {
            return false;
        }

        let attributes = self.attributes();
        let is_directory = attributes.is_some_and(|attributes| {
            attributes.kind == FileKind::Directory && !attributes.is_symlink
        });

        for attempt in 0..=retries {
            let error = match self.platform().delete(&absolute, attributes) {
                Ok(()) => {
                    self.forget_attributes();
                    return true;
                }
                Err(error) => error,
            };

            if error.kind() == io::ErrorKind::NotFound {
                self.forget_attributes();

                debug!(path = %absolute.display(), is_directory, "nothing to delete");
                return is_directory;
            }

            if attempt == retries {
                warn!(
                    path = %absolute.display(),
                    retries,
                    error = %error,
                    "cannot delete"
                );
                break;
            }

            debug!(
                path = %absolute.display(),
                attempt,
                error = %error,
                "delete failed, will retry"
            );
            self.platform().sleep(Duration::from_secs(u64::from(attempt)));
        }

        false
    }

    /// Moves the entry to the location of `target`.
    ///
    /// Where the platform allows it, an existing destination is replaced. Nothing happens if
    /// either path is invalid or both resolve to the same canonical path.
    ///
    /// On success this entity takes over the path of `target` and forgets its cached metadata.
    /// The cache of `target` is left as it was; call [`refresh()`][Self::refresh] on it before
    /// querying it again. On failure this entity is unchanged.
    pub fn rename_to(&mut self, target: &Self) -> bool {
        if !self.can_rename_to(target) {
            return false;
        }

        let from = self.absolute_path().to_path_buf();
        let to = target.absolute_path().to_path_buf();

        match self.platform().rename(&from, &to) {
            Ok(()) => {
                self.adopt_location(target);
                true
            }
            Err(error) => {
                warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %error,
                    "cannot rename"
                );
                false
            }
        }
    }

    /// Moves the entry to the location of `target`, optionally removing an existing destination
    /// first.
    ///
    /// With `remove_dest_first`, an existing `target` is deleted (one retry allowed) and the move
    /// is only attempted if that succeeded. Every failure along the way is reported as `false`.
    ///
    /// The destination is never touched if the move would be refused anyway, in particular when
    /// `target` is just another name for this entry.
    pub fn try_rename_to(&mut self, target: &mut Self, remove_dest_first: bool) -> bool {
        if !self.can_rename_to(target) {
            return false;
        }

        if remove_dest_first && target.exists() && !target.delete(DESTINATION_DELETE_RETRIES) {
            return false;
        }

        self.rename_to(target)
    }

    fn can_rename_to(&self, target: &Self) -> bool {
        !self.is_invalid()
            && !target.is_invalid()
            && !self.absolute_path().as_os_str().is_empty()
            && !target.absolute_path().as_os_str().is_empty()
            && self.canonical_path() != target.canonical_path()
    }
}
