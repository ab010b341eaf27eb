use crate::{PathEntity, PathNaming, WalkDirective, WalkEvent};

impl PathEntity {
    /// Removes the whole tree rooted at this directory, the directory itself included.
    ///
    /// With `files_only`, every directory is left standing and only the entries inside them are
    /// removed. Each removal gets the same `retries` budget as [`delete()`][Self::delete].
    ///
    /// Returns `false` right away if the entity is not a directory or its name is empty. Otherwise
    /// every entry is attempted even if some fail, and the result is `true` only if all of them
    /// were removed.
    ///
    /// # Example
    ///
    /// ```
    /// use path_entity::PathEntity;
    ///
    /// let root = tempfile::tempdir().unwrap();
    /// std::fs::create_dir(root.path().join("sub")).unwrap();
    /// std::fs::write(root.path().join("sub").join("b.txt"), b"b").unwrap();
    ///
    /// let mut tree = PathEntity::new(root.path().join("sub"));
    /// assert!(tree.delete_dir(false, 0));
    ///
    /// assert!(!root.path().join("sub").exists());
    /// ```
    pub fn delete_dir(&mut self, files_only: bool, retries: u32) -> bool {
        if self.name().is_empty() || !self.is_directory() {
            return false;
        }

        let mut all_deleted = true;

        let result = self.walk_dir(|event, entity, _error| {
            if event == WalkEvent::EnterDir {
                return WalkDirective::Enter;
            }

            let keep = files_only && entity.is_directory();

            if !keep && !entity.delete(retries) {
                all_deleted = false;
            }

            WalkDirective::Ok
        });

        all_deleted && result == WalkDirective::Ok
    }
}
