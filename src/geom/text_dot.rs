//! Text dot: a text label pinned to a point.

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, TEXT_DOT_CLASS_ID};
use crate::util::{DVec3, Result};

/// First 3dm version that stores the secondary text.
pub const TEXT_DOT_SECONDARY_TEXT_VERSION: i32 = 60;

/// Default font height in points.
pub const DEFAULT_FONT_HEIGHT: i32 = 14;

#[derive(Clone, Debug, PartialEq)]
pub struct TextDot {
    pub center: DVec3,
    pub text: String,
    /// Text shown on hover. Dropped when writing 3dm versions before 60.
    pub secondary_text: String,
    pub font_height: i32,
}

impl TextDot {
    pub fn new(center: DVec3, text: impl Into<String>) -> Self {
        Self {
            center,
            text: text.into(),
            secondary_text: String::new(),
            font_height: DEFAULT_FONT_HEIGHT,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && !self.text.is_empty() && self.font_height > 0
    }
}

impl Archivable for TextDot {
    const CLASS_ID: ClassId = TEXT_DOT_CLASS_ID;
    const CLASS_NAME: &'static str = "TextDot";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>() + self.text.len() + self.secondary_text.len()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_point3(self.center)?;
        w.write_string(&self.text)?;
        w.write_i32(self.font_height)?;
        if w.archive_3dm_version() >= TEXT_DOT_SECONDARY_TEXT_VERSION {
            w.write_string(&self.secondary_text)?;
        }
        Ok(())
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let center = r.read_point3()?;
        let text = r.read_string()?;
        let font_height = r.read_i32()?;
        let secondary_text = if r.archive_3dm_version() >= TEXT_DOT_SECONDARY_TEXT_VERSION {
            r.read_string()?
        } else {
            String::new()
        };
        Ok(Self {
            center,
            text,
            secondary_text,
            font_height,
        })
    }
}
