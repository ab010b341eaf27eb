use std::io;

use tracing::warn;

use crate::pal::{DirListingFacade, FileKind, ListedEntry, ListedType, Platform};
use crate::{OsError, PathEntity};

/// What a walk callback is being told about.
#[expect(
    clippy::exhaustive_enums,
    reason = "the walk protocol is closed, callers are expected to match exhaustively"
)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WalkEvent {
    /// A directory is about to be entered. Answer [`WalkDirective::Enter`] to descend into it.
    EnterDir,

    /// A non-directory entry: regular file, symbolic link, device or other special file.
    File,

    /// Every child of a directory that was entered has been visited, or the visit was cut short.
    /// May carry the error that ended the listing early.
    LeaveDir,
}

/// How a walk continues after a callback returns.
#[expect(
    clippy::exhaustive_enums,
    reason = "the walk protocol is closed, callers are expected to match exhaustively"
)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WalkDirective {
    /// Carry on with the next sibling.
    Ok,

    /// The walk could not start. Returned when the root is neither a file nor a directory.
    /// Treated like [`Ok`][Self::Ok] when returned by a callback.
    Nok,

    /// Descend into the directory reported by [`WalkEvent::EnterDir`]. Treated like
    /// [`Ok`][Self::Ok] for other events.
    Enter,

    /// Do not descend into the directory reported by [`WalkEvent::EnterDir`]. Treated like
    /// [`Ok`][Self::Ok] for other events.
    Skip,

    /// Skip the remaining siblings and leave the current directory. The directory still gets its
    /// [`WalkEvent::LeaveDir`].
    Leave,

    /// Stop the whole walk. Enclosing directories get a final [`WalkEvent::LeaveDir`]
    /// notification and the walk returns this directive.
    Terminate,

    /// Same as [`Terminate`][Self::Terminate], for callers that want to tell a failure apart
    /// from an early success.
    Abort,
}

impl PathEntity {
    /// Walks the tree rooted at this entity depth-first, reporting every entry to `callback`.
    ///
    /// * A file root is reported once as [`WalkEvent::File`] and the callback result is returned.
    /// * A root that is neither a file nor a directory (including one that does not exist)
    ///   returns [`WalkDirective::Nok`] without calling the callback.
    /// * A directory is reported as [`WalkEvent::EnterDir`]. Unless the callback answers
    ///   [`WalkDirective::Enter`], that answer is returned immediately and no
    ///   [`WalkEvent::LeaveDir`] follows. Otherwise its children are visited (directories
    ///   recursively) and the result of the final [`WalkEvent::LeaveDir`] is returned.
    ///
    /// Children are visited in whatever order the operating system lists them. Symbolic links
    /// are reported as files and never followed, except when the root itself is a link. If a
    /// directory cannot be listed, its [`WalkEvent::LeaveDir`] carries the error.
    ///
    /// The callback receives each entity mutably so that it may delete or rename it.
    ///
    /// # Example
    ///
    /// ```
    /// use path_entity::{PathEntity, WalkDirective, WalkEvent};
    ///
    /// let root = tempfile::tempdir().unwrap();
    /// std::fs::write(root.path().join("a.txt"), b"hello").unwrap();
    ///
    /// let mut total_bytes = 0;
    ///
    /// PathEntity::new(root.path()).walk_dir(|event, entity, _error| match event {
    ///     WalkEvent::EnterDir => WalkDirective::Enter,
    ///     WalkEvent::File => {
    ///         total_bytes += entity.length();
    ///         WalkDirective::Ok
    ///     }
    ///     WalkEvent::LeaveDir => WalkDirective::Ok,
    /// });
    ///
    /// assert_eq!(total_bytes, 5);
    /// ```
    pub fn walk_dir<F>(&mut self, mut callback: F) -> WalkDirective
    where
        F: FnMut(WalkEvent, &mut Self, Option<&OsError>) -> WalkDirective,
    {
        walk(self, &mut callback)
    }
}

fn walk<F>(entity: &mut PathEntity, callback: &mut F) -> WalkDirective
where
    F: FnMut(WalkEvent, &mut PathEntity, Option<&OsError>) -> WalkDirective,
{
    if entity.is_file() {
        return callback(WalkEvent::File, entity, None);
    }

    if !entity.is_directory() {
        return WalkDirective::Nok;
    }

    let directive = callback(WalkEvent::EnterDir, entity, None);
    if directive != WalkDirective::Enter {
        return directive;
    }

    let listing = match entity.platform().read_dir(entity.absolute_path()) {
        Ok(listing) => listing,
        Err(error) => return leave_with_error(entity, callback, &error),
    };

    // The listing is consumed (and its OS handle released) before the directory is left.
    match visit_children(entity, listing, callback) {
        Ok(None) => callback(WalkEvent::LeaveDir, entity, None),
        Ok(Some(directive)) => {
            // The walk is over. This is a notification, whatever it returns is ignored.
            callback(WalkEvent::LeaveDir, entity, None);
            directive
        }
        Err(error) => leave_with_error(entity, callback, &error),
    }
}

/// Visits the children of one directory until the listing ends or a child asks to leave.
///
/// Returns the directive that ends the whole walk, if a child returned one.
fn visit_children<F>(
    parent: &PathEntity,
    listing: DirListingFacade,
    callback: &mut F,
) -> io::Result<Option<WalkDirective>>
where
    F: FnMut(WalkEvent, &mut PathEntity, Option<&OsError>) -> WalkDirective,
{
    for item in listing {
        let listed = item?;

        let is_symlink = listed.listed_type == Some(ListedType::Symlink);
        let mut child = parent.child(&listed.name, listed.attributes, is_symlink);

        let directive = if is_directory_child(&listed, &child) {
            walk(&mut child, callback)
        } else {
            callback(WalkEvent::File, &mut child, None)
        };

        match directive {
            WalkDirective::Terminate | WalkDirective::Abort => return Ok(Some(directive)),
            WalkDirective::Leave => return Ok(None),
            WalkDirective::Ok
            | WalkDirective::Nok
            | WalkDirective::Enter
            | WalkDirective::Skip => {}
        }
    }

    Ok(None)
}

/// Whether a listed child is a real directory to descend into. Links to directories are not.
fn is_directory_child(listed: &ListedEntry, child: &PathEntity) -> bool {
    match listed.listed_type {
        Some(ListedType::Directory) => true,
        Some(ListedType::Symlink | ListedType::Other) => false,
        None => child.attributes().is_some_and(|attributes| {
            attributes.kind == FileKind::Directory && !attributes.is_symlink
        }),
    }
}

fn leave_with_error<F>(
    entity: &mut PathEntity,
    callback: &mut F,
    error: &io::Error,
) -> WalkDirective
where
    F: FnMut(WalkEvent, &mut PathEntity, Option<&OsError>) -> WalkDirective,
{
    warn!(
        path = %entity.absolute_path().display(),
        error = %error,
        "cannot list directory"
    );

    let error = OsError::from(error);
    callback(WalkEvent::LeaveDir, entity, Some(&error))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::ffi::OsString;

    use super::*;
    use crate::PathNaming;
    use crate::pal::{FileAttributes, MockPlatform};
    use crate::test_helpers::{
        dir_attributes, entity, file_attributes, identity_platform, is, listed_dir, listed_file,
        listing, not_found,
    };

    type Recorded = Vec<(WalkEvent, String)>;

    /// Walks `root`, recording every event, answering `Enter` for directories and `answer(name)`
    /// for everything else.
    fn record(
        root: &mut PathEntity,
        answer: impl Fn(WalkEvent, &str) -> WalkDirective,
    ) -> (WalkDirective, Recorded) {
        let mut events = Vec::new();

        let result = root.walk_dir(|event, entity, _| {
            let name = entity.name();
            let directive = answer(event, &name);
            events.push((event, name));
            directive
        });

        (result, events)
    }

    fn enter_all(event: WalkEvent, _: &str) -> WalkDirective {
        match event {
            WalkEvent::EnterDir => WalkDirective::Enter,
            WalkEvent::File | WalkEvent::LeaveDir => WalkDirective::Ok,
        }
    }

    fn ev(event: WalkEvent, name: &str) -> (WalkEvent, String) {
        (event, name.to_owned())
    }

    /// `/t` containing `a.txt`, `sub/` and `z.txt`, with `sub/` containing `b.txt`.
    fn tree_platform() -> MockPlatform {
        let mut platform = identity_platform();
        platform
            .expect_stat()
            .withf(is("/t"))
            .returning(|_| Ok(dir_attributes()));
        platform
            .expect_read_dir()
            .withf(is("/t"))
            .returning(|_| {
                listing(vec![
                    listed_file("a.txt"),
                    listed_dir("sub"),
                    listed_file("z.txt"),
                ])
            });
        platform
            .expect_read_dir()
            .withf(is("/t/sub"))
            .returning(|_| listing(vec![listed_file("b.txt")]));
        platform
    }

    #[test]
    fn file_root_is_reported_once() {
        let mut platform = identity_platform();
        platform.expect_stat().returning(|_| Ok(file_attributes()));

        let (result, events) =
            record(&mut entity("/t/a.txt", platform), |_, _| WalkDirective::Skip);

        assert_eq!(result, WalkDirective::Skip);
        assert_eq!(events, vec![ev(WalkEvent::File, "a.txt")]);
    }

    #[test]
    fn missing_root_is_nok_without_callback() {
        let mut platform = identity_platform();
        platform.expect_stat().returning(|_| Err(not_found()));

        let (result, events) = record(&mut entity("/missing", platform), enter_all);

        assert_eq!(result, WalkDirective::Nok);
        assert!(events.is_empty());
    }

    #[test]
    fn invalid_root_is_nok_without_callback() {
        let (result, events) = record(&mut entity("", MockPlatform::new()), enter_all);

        assert_eq!(result, WalkDirective::Nok);
        assert!(events.is_empty());
    }

    #[test]
    fn device_root_is_nok_without_callback() {
        let mut platform = identity_platform();
        platform.expect_stat().returning(|_| {
            Ok(FileAttributes {
                kind: FileKind::Device,
                ..file_attributes()
            })
        });

        let (result, events) = record(&mut entity("/dev/sda", platform), enter_all);

        assert_eq!(result, WalkDirective::Nok);
        assert!(events.is_empty());
    }

    #[test]
    fn nested_tree_is_reported_in_nesting_order() {
        let (result, events) = record(&mut entity("/t", tree_platform()), enter_all);

        assert_eq!(result, WalkDirective::Ok);
        assert_eq!(
            events,
            vec![
                ev(WalkEvent::EnterDir, "t"),
                ev(WalkEvent::File, "a.txt"),
                ev(WalkEvent::EnterDir, "sub"),
                ev(WalkEvent::File, "b.txt"),
                ev(WalkEvent::LeaveDir, "sub"),
                ev(WalkEvent::File, "z.txt"),
                ev(WalkEvent::LeaveDir, "t"),
            ]
        );
    }

    #[test]
    fn result_is_final_leave_dir_answer() {
        let (result, _) = record(&mut entity("/t", tree_platform()), |event, name| {
            if event == WalkEvent::LeaveDir && name == "t" {
                WalkDirective::Abort
            } else {
                enter_all(event, name)
            }
        });

        assert_eq!(result, WalkDirective::Abort);
    }

    #[test]
    fn declined_directory_is_not_listed() {
        // No `read_dir` expectation for `/t/sub`: listing it would panic.
        let mut platform = identity_platform();
        platform
            .expect_stat()
            .withf(is("/t"))
            .returning(|_| Ok(dir_attributes()));
        platform
            .expect_read_dir()
            .withf(is("/t"))
            .returning(|_| listing(vec![listed_dir("sub"), listed_file("a.txt")]));

        let (result, events) = record(&mut entity("/t", platform), |event, name| {
            if name == "sub" {
                WalkDirective::Skip
            } else {
                enter_all(event, name)
            }
        });

        assert_eq!(result, WalkDirective::Ok);
        assert_eq!(
            events,
            vec![
                ev(WalkEvent::EnterDir, "t"),
                ev(WalkEvent::EnterDir, "sub"),
                ev(WalkEvent::File, "a.txt"),
                ev(WalkEvent::LeaveDir, "t"),
            ]
        );
    }

    #[test]
    fn declined_root_returns_answer_without_leave() {
        let mut platform = identity_platform();
        platform.expect_stat().returning(|_| Ok(dir_attributes()));

        let (result, events) = record(&mut entity("/t", platform), |_, _| WalkDirective::Ok);

        assert_eq!(result, WalkDirective::Ok);
        assert_eq!(events, vec![ev(WalkEvent::EnterDir, "t")]);
    }

    #[test]
    fn leave_skips_siblings_but_still_leaves() {
        let (result, events) = record(&mut entity("/t", tree_platform()), |event, name| {
            if name == "a.txt" {
                WalkDirective::Leave
            } else {
                enter_all(event, name)
            }
        });

        assert_eq!(result, WalkDirective::Ok);
        assert_eq!(
            events,
            vec![
                ev(WalkEvent::EnterDir, "t"),
                ev(WalkEvent::File, "a.txt"),
                ev(WalkEvent::LeaveDir, "t"),
            ]
        );
    }

    #[test]
    fn leave_in_subdirectory_resumes_with_parent_siblings() {
        let (result, events) = record(&mut entity("/t", tree_platform()), |event, name| {
            if name == "b.txt" {
                WalkDirective::Leave
            } else {
                enter_all(event, name)
            }
        });

        assert_eq!(result, WalkDirective::Ok);
        assert_eq!(
            events,
            vec![
                ev(WalkEvent::EnterDir, "t"),
                ev(WalkEvent::File, "a.txt"),
                ev(WalkEvent::EnterDir, "sub"),
                ev(WalkEvent::File, "b.txt"),
                ev(WalkEvent::LeaveDir, "sub"),
                ev(WalkEvent::File, "z.txt"),
                ev(WalkEvent::LeaveDir, "t"),
            ]
        );
    }

    #[test]
    fn terminate_stops_walk_and_notifies_enclosing_directories() {
        let (result, events) = record(&mut entity("/t", tree_platform()), |event, name| {
            if name == "b.txt" {
                WalkDirective::Terminate
            } else {
                enter_all(event, name)
            }
        });

        assert_eq!(result, WalkDirective::Terminate);
        assert_eq!(
            events,
            vec![
                ev(WalkEvent::EnterDir, "t"),
                ev(WalkEvent::File, "a.txt"),
                ev(WalkEvent::EnterDir, "sub"),
                ev(WalkEvent::File, "b.txt"),
                ev(WalkEvent::LeaveDir, "sub"),
                ev(WalkEvent::LeaveDir, "t"),
            ]
        );
    }

    #[test]
    fn abort_is_propagated_even_if_leave_dir_answers_otherwise() {
        let (result, events) = record(&mut entity("/t", tree_platform()), |event, name| {
            if name == "a.txt" {
                WalkDirective::Abort
            } else {
                enter_all(event, name)
            }
        });

        assert_eq!(result, WalkDirective::Abort);
        assert_eq!(events.len(), 3);
        assert_eq!(events.last(), Some(&ev(WalkEvent::LeaveDir, "t")));
    }

    #[test]
    fn unlistable_directory_leaves_with_error() {
        let mut platform = identity_platform();
        platform.expect_stat().returning(|_| Ok(dir_attributes()));
        platform
            .expect_read_dir()
            .returning(|_| Err(io::Error::from_raw_os_error(13)));

        let mut errors = Vec::new();
        let result = entity("/t", platform).walk_dir(|event, _, error| {
            errors.push(error.map(OsError::code));
            match event {
                WalkEvent::EnterDir => WalkDirective::Enter,
                WalkEvent::File | WalkEvent::LeaveDir => WalkDirective::Leave,
            }
        });

        assert_eq!(result, WalkDirective::Leave);
        assert_eq!(errors, vec![None, Some(13)]);
    }

    #[test]
    fn listing_failure_midway_leaves_with_error() {
        let mut platform = identity_platform();
        platform.expect_stat().returning(|_| Ok(dir_attributes()));
        platform.expect_read_dir().returning(|_| {
            listing(vec![
                listed_file("a.txt"),
                Err(io::Error::from_raw_os_error(5)),
                listed_file("never.txt"),
            ])
        });

        let mut names = Vec::new();
        let mut leave_error = None;
        let result = entity("/t", platform).walk_dir(|event, entity, error| {
            names.push(entity.name());
            if event == WalkEvent::LeaveDir {
                leave_error = error.cloned();
            }
            enter_all(event, "")
        });

        assert_eq!(result, WalkDirective::Ok);
        assert_eq!(names, vec!["t", "a.txt", "t"]);
        assert_eq!(leave_error.map(|error| error.code()), Some(5));
    }

    #[test]
    fn children_without_hints_are_classified_by_metadata() {
        let mut platform = identity_platform();
        platform
            .expect_stat()
            .withf(is("/t"))
            .returning(|_| Ok(dir_attributes()));
        platform
            .expect_stat()
            .withf(is("/t/real"))
            .returning(|_| Ok(dir_attributes()));
        platform.expect_stat().withf(is("/t/link")).returning(|_| {
            Ok(FileAttributes {
                is_symlink: true,
                ..dir_attributes()
            })
        });
        platform.expect_read_dir().withf(is("/t")).returning(|_| {
            let unhinted = |name: &str| {
                Ok(ListedEntry {
                    name: OsString::from(name),
                    listed_type: None,
                    attributes: None,
                })
            };

            listing(vec![unhinted("real"), unhinted("link")])
        });
        platform
            .expect_read_dir()
            .withf(is("/t/real"))
            .returning(|_| listing(Vec::new()));

        let (_, events) = record(&mut entity("/t", platform), enter_all);

        assert_eq!(
            events,
            vec![
                ev(WalkEvent::EnterDir, "t"),
                ev(WalkEvent::EnterDir, "real"),
                ev(WalkEvent::LeaveDir, "real"),
                ev(WalkEvent::File, "link"),
                ev(WalkEvent::LeaveDir, "t"),
            ]
        );
    }

    #[test]
    fn symlink_hint_is_never_entered() {
        let mut platform = identity_platform();
        platform
            .expect_stat()
            .withf(is("/t"))
            .returning(|_| Ok(dir_attributes()));
        platform.expect_read_dir().withf(is("/t")).returning(|_| {
            listing(vec![Ok(ListedEntry {
                name: OsString::from("link"),
                listed_type: Some(ListedType::Symlink),
                attributes: Some(dir_attributes()),
            })])
        });

        let (_, events) = record(&mut entity("/t", platform), enter_all);

        assert_eq!(
            events,
            vec![
                ev(WalkEvent::EnterDir, "t"),
                ev(WalkEvent::File, "link"),
                ev(WalkEvent::LeaveDir, "t"),
            ]
        );
    }
}
