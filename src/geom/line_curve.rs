//! Line segment curve.

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, LINE_CURVE_CLASS_ID};
use crate::util::{BoundingBox, DVec3, Interval, Line, Result};

/// A curve that is a single line segment.
#[derive(Clone, Debug, PartialEq)]
pub struct LineCurve {
    pub line: Line,
    pub domain: Interval,
    pub dimension: u32,
}

impl LineCurve {
    /// Create a 3-D line curve parameterized by arc length.
    pub fn new(from: DVec3, to: DVec3) -> Self {
        let line = Line::new(from, to);
        Self {
            line,
            domain: Interval::new(0.0, line.length()),
            dimension: 3,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.line.length() > 0.0 && self.domain.is_increasing() && (2..=3).contains(&self.dimension)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points([&self.line.from, &self.line.to])
    }
}

impl Archivable for LineCurve {
    const CLASS_ID: ClassId = LINE_CURVE_CLASS_ID;
    const CLASS_NAME: &'static str = "LineCurve";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_point3(self.line.from)?;
        w.write_point3(self.line.to)?;
        w.write_interval(self.domain)?;
        w.write_u32(self.dimension)
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let from = r.read_point3()?;
        let to = r.read_point3()?;
        Ok(Self {
            line: Line::new(from, to),
            domain: r.read_interval()?,
            dimension: r.read_u32()?,
        })
    }
}
