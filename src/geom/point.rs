//! Single point object.

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, POINT_CLASS_ID};
use crate::util::{DVec3, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub location: DVec3,
}

impl Point {
    pub const fn new(location: DVec3) -> Self {
        Self { location }
    }
}

impl Archivable for Point {
    const CLASS_ID: ClassId = POINT_CLASS_ID;
    const CLASS_NAME: &'static str = "Point";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_point3(self.location)
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        Ok(Self::new(r.read_point3()?))
    }
}
