//! Layer component.

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, LAYER_CLASS_ID};
use crate::util::Result;

/// Named drawing layer. Not geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    /// RGBA display color.
    pub color: [u8; 4],
    pub visible: bool,
    pub locked: bool,
    /// Index in the owning model, -1 when unassigned.
    pub index: i32,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: [0, 0, 0, 255],
            visible: true,
            locked: false,
            index: -1,
        }
    }
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Archivable for Layer {
    const CLASS_ID: ClassId = LAYER_CLASS_ID;
    const CLASS_NAME: &'static str = "Layer";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>() + self.name.len()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_string(&self.name)?;
        w.write_bytes(&self.color)?;
        w.write_bool(self.visible)?;
        w.write_bool(self.locked)?;
        w.write_i32(self.index)
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let name = r.read_string()?;
        let bytes = r.read_bytes(4)?;
        let color = [bytes[0], bytes[1], bytes[2], bytes[3]];
        Ok(Self {
            name,
            color,
            visible: r.read_bool()?,
            locked: r.read_bool()?,
            index: r.read_i32()?,
        })
    }
}
