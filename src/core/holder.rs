//! Scoped detach of user strings.

use std::ops::Deref;

use super::{Object, UserStrings};

/// Guard that optionally moves an object's user strings out for the
/// duration of a write and moves them back when dropped.
///
/// The reattach runs on every exit path of the enclosing scope, so an
/// early `?` return or a panic during the write leaves the object as the
/// caller handed it over.
pub struct UserDataHolder<'a> {
    object: &'a mut Object,
    held: Option<UserStrings>,
}

impl<'a> UserDataHolder<'a> {
    /// Wrap `object`. When `detach` is true its user strings are moved
    /// into the holder until it is dropped.
    pub fn new(object: &'a mut Object, detach: bool) -> Self {
        let held = detach.then(|| object.take_user_strings());
        Self { object, held }
    }

    /// True when user strings are currently held outside the object.
    pub fn is_detached(&self) -> bool {
        self.held.is_some()
    }
}

impl Deref for UserDataHolder<'_> {
    type Target = Object;

    fn deref(&self) -> &Object {
        self.object
    }
}

impl Drop for UserDataHolder<'_> {
    fn drop(&mut self) {
        if let Some(held) = self.held.take() {
            self.object.restore_user_strings(held);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::util::DVec3;

    fn point_with_strings() -> Object {
        let mut obj = Object::new(Point::new(DVec3::ZERO));
        obj.user_strings_mut().set("a", "1");
        obj.user_strings_mut().set("b", "2");
        obj
    }

    #[test]
    fn test_detach_and_reattach() {
        let mut obj = point_with_strings();
        {
            let holder = UserDataHolder::new(&mut obj, true);
            assert!(holder.is_detached());
            assert!(holder.user_strings().is_empty());
        }
        assert_eq!(obj.user_strings().len(), 2);
        assert_eq!(obj.user_strings().get("b"), Some("2"));
    }

    #[test]
    fn test_keep_attached() {
        let mut obj = point_with_strings();
        let holder = UserDataHolder::new(&mut obj, false);
        assert!(!holder.is_detached());
        assert_eq!(holder.user_strings().len(), 2);
    }

    #[test]
    fn test_reattach_on_error_path() {
        fn failing_write(obj: &mut Object) -> Result<(), &'static str> {
            let _holder = UserDataHolder::new(obj, true);
            Err("write failed")
        }

        let mut obj = point_with_strings();
        assert!(failing_write(&mut obj).is_err());
        assert_eq!(obj.user_strings().len(), 2);
    }

    #[test]
    fn test_reattach_on_panic() {
        let mut obj = point_with_strings();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _holder = UserDataHolder::new(&mut obj, true);
            panic!("writer panicked");
        }));
        assert!(result.is_err());
        assert_eq!(obj.user_strings().len(), 2);
    }
}
