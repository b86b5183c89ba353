//! Ownership of the object behind a wrapper.

use crate::core::Object;
use crate::model::ComponentRef;
use crate::util::{Error, Result};

/// The object a wrapper operates on.
///
/// An owned handle drops its object with the wrapper. A borrowed handle
/// refers to an entry of a [`ComponentTable`](crate::model::ComponentTable)
/// and never drops it; once the entry is removed every access fails with
/// [`Error::Detached`].
///
/// Outside the crate a handle is read-only; mutation goes through the typed
/// wrapper methods so a dispatched wrapper always matches its object:
///
/// ```compile_fail
/// use rhino3dm::binding::ObjectHandle;
/// use rhino3dm::core::Object;
/// use rhino3dm::geom::{Mesh, Point};
/// use rhino3dm::util::DVec3;
///
/// let mut h = ObjectHandle::from(Object::new(Mesh::new()));
/// h.with_mut(|o| *o = Object::new(Point::new(DVec3::ZERO))).unwrap();
/// ```
#[derive(Debug)]
pub enum ObjectHandle {
    Owned(Object),
    Borrowed(ComponentRef),
}

impl ObjectHandle {
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// False only for a borrowed handle whose entry is gone.
    pub fn is_alive(&self) -> bool {
        match self {
            Self::Owned(_) => true,
            Self::Borrowed(r) => r.is_alive(),
        }
    }

    /// Run `f` with shared access to the object.
    pub fn with<R>(&self, f: impl FnOnce(&Object) -> R) -> Result<R> {
        match self {
            Self::Owned(obj) => Ok(f(obj)),
            Self::Borrowed(r) => {
                let entry = r.upgrade()?;
                let guard = entry.read();
                Ok(f(&guard))
            }
        }
    }

    /// Run `f` with exclusive access to the object.
    ///
    /// Crate-only: `f` may not change the object's kind, which wrappers
    /// rely on after dispatch.
    pub(crate) fn with_mut<R>(&mut self, f: impl FnOnce(&mut Object) -> R) -> Result<R> {
        match self {
            Self::Owned(obj) => Ok(f(obj)),
            Self::Borrowed(r) => {
                let entry = r.upgrade()?;
                let mut guard = entry.write();
                Ok(f(&mut guard))
            }
        }
    }

    /// Run `f` on a typed view of the object.
    ///
    /// Fails with [`Error::TypeMismatch`] when `cast` does not apply.
    pub fn view<T: ?Sized, R>(
        &self,
        cast: fn(&Object) -> Option<&T>,
        f: impl FnOnce(&T) -> R,
    ) -> Result<R> {
        self.with(|obj| match cast(obj) {
            Some(view) => Ok(f(view)),
            None => Err(Error::type_mismatch(short_type_name::<T>(), obj.class_name())),
        })?
    }

    /// Run `f` on a mutable typed view of the object.
    pub(crate) fn view_mut<T: ?Sized, R>(
        &mut self,
        cast: fn(&mut Object) -> Option<&mut T>,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R> {
        self.with_mut(|obj| {
            let class = obj.class_name();
            match cast(obj) {
                Some(view) => Ok(f(view)),
                None => Err(Error::type_mismatch(short_type_name::<T>(), class)),
            }
        })?
    }

    /// Copy of the object.
    pub fn to_object(&self) -> Result<Object> {
        self.with(Object::clone)
    }

    /// Take the object out of an owned handle, or copy a borrowed one.
    pub fn into_object(self) -> Result<Object> {
        match self {
            Self::Owned(obj) => Ok(obj),
            Self::Borrowed(r) => Ok(r.upgrade()?.read().clone()),
        }
    }
}

impl From<Object> for ObjectHandle {
    fn from(obj: Object) -> Self {
        Self::Owned(obj)
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
