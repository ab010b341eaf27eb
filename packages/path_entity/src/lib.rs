#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! One filesystem API on Unix and Windows: cached file metadata, callback-driven directory tree
//! walking and removal that tolerates transient failures.
//!
//! The central type is [`PathEntity`], a path plus lazily fetched metadata about it. Metadata is
//! read from the operating system once, on first use, and reused afterwards. Queries never fail:
//! a path that does not exist or cannot be examined simply answers `false` or `0`.
//!
//! # Key Features
//!
//! - **Metadata queries**: [`exists()`][PathEntity::exists], [`is_file()`][PathEntity::is_file],
//!   [`is_directory()`][PathEntity::is_directory], [`is_device()`][PathEntity::is_device],
//!   [`is_symbolic_link()`][PathEntity::is_symbolic_link], [`is_hidden()`][PathEntity::is_hidden],
//!   permissions, timestamps and size
//! - **Path forms**: [`absolute_path()`][PathEntity::absolute_path] and
//!   [`canonical_path()`][PathEntity::canonical_path]
//! - **Tree walking**: [`walk_dir()`][PathEntity::walk_dir] reports every entry to a callback
//!   whose [`WalkDirective`] decides how the walk continues
//! - **Retrying mutation**: [`delete()`][PathEntity::delete] backs off and retries,
//!   [`rename_to()`][PathEntity::rename_to] replaces existing destinations where the platform
//!   allows it
//! - **Recursive removal**: [`delete_dir()`][PathEntity::delete_dir] removes a whole tree or only
//!   the files in it
//!
//! # Platform differences
//!
//! Some answers intentionally follow the conventions of the platform instead of being unified:
//!
//! - On Unix a name starting with `.` is hidden. On Windows the hidden attribute decides.
//! - On Unix the canonical path has symbolic links resolved. On Windows it is the extended-length
//!   (`\\?\`) form of the absolute path.
//! - On Unix the creation time is the inode change time, the closest thing available.
//!
//! # Logging
//!
//! Operating system failures are reported as [`tracing`](https://docs.rs/tracing) events: final
//! failures of deletions, moves and directory listings at `WARN`, expected or retried failures
//! at `DEBUG`. Install a subscriber to see them.
//!
//! # Example
//!
//! ```
//! use path_entity::{PathEntity, WalkDirective, WalkEvent};
//!
//! let root = PathEntity::create_temp_directory("example-").unwrap();
//! std::fs::write(root.path().join("a.txt"), b"hello").unwrap();
//! std::fs::create_dir(root.path().join("sub")).unwrap();
//! std::fs::write(root.path().join("sub").join("b.txt"), b"world").unwrap();
//!
//! let mut files = 0;
//! let mut root = root;
//! root.walk_dir(|event, _entity, _error| {
//!     if event == WalkEvent::File {
//!         files += 1;
//!     }
//!     WalkDirective::Enter
//! });
//! assert_eq!(files, 2);
//!
//! assert!(root.delete_dir(false, 2));
//! assert!(!PathEntity::new(root.path()).exists());
//! ```

mod pal;

mod delete_dir;
mod entity;
mod error;
mod mutate;
mod naming;
mod walk;

#[cfg(test)]
mod test_helpers;

pub use entity::*;
pub use error::*;
pub use naming::*;
pub use walk::*;
