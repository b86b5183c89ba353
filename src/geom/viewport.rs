//! Viewport (camera) data.

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, VIEWPORT_CLASS_ID};
use crate::util::{DVec3, Result};

/// View frustum in camera coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            left: -20.0,
            right: 20.0,
            bottom: -20.0,
            top: 20.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Frustum {
    pub fn is_valid(&self, perspective: bool) -> bool {
        let finite = [self.left, self.right, self.bottom, self.top, self.near, self.far]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.left < self.right
            && self.bottom < self.top
            && self.near < self.far
            && (!perspective || self.near > 0.0)
    }

    pub fn aspect(&self) -> f64 {
        (self.right - self.left) / (self.top - self.bottom)
    }
}

/// Camera location, orientation and projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    is_perspective: bool,
    camera_location: DVec3,
    camera_direction: DVec3,
    camera_up: DVec3,
    frustum: Frustum,
}

impl Default for Viewport {
    /// Parallel projection looking down the world Z axis.
    fn default() -> Self {
        Self {
            is_perspective: false,
            camera_location: DVec3::new(0.0, 0.0, 100.0),
            camera_direction: DVec3::NEG_Z,
            camera_up: DVec3::Y,
            frustum: Frustum::default(),
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_perspective_projection(&self) -> bool {
        self.is_perspective
    }

    pub fn is_parallel_projection(&self) -> bool {
        !self.is_perspective
    }

    /// Switch projection. Returns false when the current frustum does not
    /// allow it (perspective needs a positive near distance).
    pub fn set_perspective_projection(&mut self, perspective: bool) -> bool {
        if perspective && !self.frustum.is_valid(true) {
            return false;
        }
        self.is_perspective = perspective;
        true
    }

    pub fn camera_location(&self) -> DVec3 {
        self.camera_location
    }

    pub fn set_camera_location(&mut self, p: DVec3) {
        self.camera_location = p;
    }

    pub fn camera_direction(&self) -> DVec3 {
        self.camera_direction
    }

    /// Returns false for a zero direction.
    pub fn set_camera_direction(&mut self, d: DVec3) -> bool {
        if d.length_squared() == 0.0 {
            return false;
        }
        self.camera_direction = d;
        true
    }

    pub fn camera_up(&self) -> DVec3 {
        self.camera_up
    }

    /// Returns false for a zero up vector.
    pub fn set_camera_up(&mut self, up: DVec3) -> bool {
        if up.length_squared() == 0.0 {
            return false;
        }
        self.camera_up = up;
        true
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    /// Returns false when the frustum is invalid for the current projection.
    pub fn set_frustum(&mut self, frustum: Frustum) -> bool {
        if !frustum.is_valid(self.is_perspective) {
            return false;
        }
        self.frustum = frustum;
        true
    }

    pub fn is_valid(&self) -> bool {
        let d = self.camera_direction;
        let up = self.camera_up;
        self.camera_location.is_finite()
            && d.length_squared() > 0.0
            && up.length_squared() > 0.0
            && d.cross(up).length_squared() > 0.0
            && self.frustum.is_valid(self.is_perspective)
    }
}

impl Archivable for Viewport {
    const CLASS_ID: ClassId = VIEWPORT_CLASS_ID;
    const CLASS_NAME: &'static str = "ViewportInfo";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_bool(self.is_perspective)?;
        w.write_point3(self.camera_location)?;
        w.write_point3(self.camera_direction)?;
        w.write_point3(self.camera_up)?;
        let f = &self.frustum;
        for v in [f.left, f.right, f.bottom, f.top, f.near, f.far] {
            w.write_f64(v)?;
        }
        Ok(())
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        Ok(Self {
            is_perspective: r.read_bool()?,
            camera_location: r.read_point3()?,
            camera_direction: r.read_point3()?,
            camera_up: r.read_point3()?,
            frustum: Frustum {
                left: r.read_f64()?,
                right: r.read_f64()?,
                bottom: r.read_f64()?,
                top: r.read_f64()?,
                near: r.read_f64()?,
                far: r.read_f64()?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid_top_view() {
        let v = Viewport::new();
        assert!(v.is_valid());
        assert!(v.is_parallel_projection());
        assert_eq!(v.camera_direction(), DVec3::NEG_Z);
    }

    #[test]
    fn test_rejects_degenerate_camera() {
        let mut v = Viewport::new();
        assert!(!v.set_camera_direction(DVec3::ZERO));
        assert!(v.set_camera_up(DVec3::NEG_Z));
        // up parallel to direction
        assert!(!v.is_valid());
    }

    #[test]
    fn test_perspective_needs_positive_near() {
        let mut v = Viewport::new();
        assert!(v.set_frustum(Frustum {
            near: -1.0,
            ..Frustum::default()
        }));
        assert!(!v.set_perspective_projection(true));
        assert!(v.set_frustum(Frustum::default()));
        assert!(v.set_perspective_projection(true));
        assert!(v.is_perspective_projection());
    }
}
