//! Archivable dictionaries.
//!
//! A dictionary is an ordered list of named, typed values written as one
//! chunk:
//!
//! ```text
//! DICTIONARY {
//!     id: u128, version: u32, name: string
//!     DICTIONARY_ENTRY { item type: i32, key: string, value... }*
//!     DICTIONARY_END {}
//! }
//! ```
//!
//! Item type codes are shared with other readers of the format and never
//! change. A reader skips entries whose item type it does not know.

use super::format::*;
use super::object_io::{read_object, write_object};
use super::{BufferReader, BufferWriter};
use crate::core::Object;
use crate::util::{DVec2, DVec3, DVec4, Error, Result};

/// Version written into the dictionary header.
pub const DICTIONARY_VERSION: u32 = 0;

/// Item type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ItemType {
    Bool = 1,
    Int32 = 6,
    Double = 10,
    String = 12,
    Point2d = 31,
    Point3d = 32,
    Point4d = 33,
    Vector2d = 34,
    Vector3d = 35,
    OnGeometry = 47,
    ArrayGeometry = 50,
}

impl ItemType {
    /// Parse a stored item type. Returns None for types this reader skips.
    pub fn from_i32(value: i32) -> Option<Self> {
        Some(match value {
            1 => Self::Bool,
            6 => Self::Int32,
            10 => Self::Double,
            12 => Self::String,
            31 => Self::Point2d,
            32 => Self::Point3d,
            33 => Self::Point4d,
            34 => Self::Vector2d,
            35 => Self::Vector3d,
            47 => Self::OnGeometry,
            50 => Self::ArrayGeometry,
            _ => return None,
        })
    }
}

/// A dictionary value.
#[derive(Clone, Debug, PartialEq)]
pub enum DictValue {
    Bool(bool),
    Int32(i32),
    Double(f64),
    String(String),
    Point2d(DVec2),
    Point3d(DVec3),
    Point4d(DVec4),
    Vector2d(DVec2),
    Vector3d(DVec3),
    /// A geometry object.
    Geometry(Object),
    /// A list of geometry objects.
    GeometryArray(Vec<Object>),
}

impl DictValue {
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Bool(_) => ItemType::Bool,
            Self::Int32(_) => ItemType::Int32,
            Self::Double(_) => ItemType::Double,
            Self::String(_) => ItemType::String,
            Self::Point2d(_) => ItemType::Point2d,
            Self::Point3d(_) => ItemType::Point3d,
            Self::Point4d(_) => ItemType::Point4d,
            Self::Vector2d(_) => ItemType::Vector2d,
            Self::Vector3d(_) => ItemType::Vector3d,
            Self::Geometry(_) => ItemType::OnGeometry,
            Self::GeometryArray(_) => ItemType::ArrayGeometry,
        }
    }

    fn write(&self, key: &str, w: &mut BufferWriter) -> Result<()> {
        match self {
            Self::Bool(v) => w.write_bool(*v),
            Self::Int32(v) => w.write_i32(*v),
            Self::Double(v) => w.write_f64(*v),
            Self::String(v) => w.write_string(v),
            Self::Point2d(v) | Self::Vector2d(v) => w.write_point2(*v),
            Self::Point3d(v) | Self::Vector3d(v) => w.write_point3(*v),
            Self::Point4d(v) => w.write_point4(*v),
            Self::Geometry(obj) => {
                require_geometry(key, obj)?;
                write_object(w, obj)
            }
            Self::GeometryArray(objs) => {
                w.write_count(objs.len())?;
                for obj in objs {
                    require_geometry(key, obj)?;
                    write_object(w, obj)?;
                }
                Ok(())
            }
        }
    }

    fn read(item_type: ItemType, r: &mut BufferReader<'_>) -> Result<Self> {
        Ok(match item_type {
            ItemType::Bool => Self::Bool(r.read_bool()?),
            ItemType::Int32 => Self::Int32(r.read_i32()?),
            ItemType::Double => Self::Double(r.read_f64()?),
            ItemType::String => Self::String(r.read_string()?),
            ItemType::Point2d => Self::Point2d(r.read_point2()?),
            ItemType::Point3d => Self::Point3d(r.read_point3()?),
            ItemType::Point4d => Self::Point4d(r.read_point4()?),
            ItemType::Vector2d => Self::Vector2d(r.read_point2()?),
            ItemType::Vector3d => Self::Vector3d(r.read_point3()?),
            ItemType::OnGeometry => Self::Geometry(read_object(r)?),
            ItemType::ArrayGeometry => {
                // each object is at least one chunk header
                let count = r.read_count(TYPECODE_SIZE + 4)?;
                let mut objs = Vec::with_capacity(count);
                for _ in 0..count {
                    objs.push(read_object(r)?);
                }
                Self::GeometryArray(objs)
            }
        })
    }
}

fn require_geometry(key: &str, obj: &Object) -> Result<()> {
    if obj.is_geometry() {
        Ok(())
    } else {
        Err(Error::type_mismatch(
            "geometry",
            format!("{} in entry '{}'", obj.class_name(), key),
        ))
    }
}

macro_rules! dict_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DictValue {
                fn from(value: $ty) -> Self {
                    DictValue::$variant(value.into())
                }
            }
        )*
    };
}

dict_value_from! {
    bool => Bool,
    i32 => Int32,
    f64 => Double,
    String => String,
    &str => String,
    DVec2 => Point2d,
    DVec3 => Point3d,
    DVec4 => Point4d,
    Object => Geometry,
    Vec<Object> => GeometryArray,
}

/// Ordered map of named values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArchivableDictionary {
    entries: Vec<(String, DictValue)>,
}

impl ArchivableDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Returns the replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DictValue>) -> Option<DictValue> {
        let key = key.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&DictValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<DictValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DictValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Estimated size in bytes, used to pre-size write buffers.
    pub fn size_of(&self) -> usize {
        self.entries
            .iter()
            .map(|(k, v)| {
                k.len()
                    + match v {
                        DictValue::String(s) => s.len(),
                        DictValue::Geometry(obj) => obj.size_of(),
                        DictValue::GeometryArray(objs) => objs.iter().map(Object::size_of).sum(),
                        _ => 32,
                    }
            })
            .sum()
    }
}

/// Write a dictionary as one chunk.
pub fn write_dictionary(w: &mut BufferWriter, dict: &ArchivableDictionary) -> Result<()> {
    w.begin_chunk(TCODE_DICTIONARY)?;
    w.write_u128(DICTIONARY_ID.0)?;
    w.write_u32(DICTIONARY_VERSION)?;
    w.write_string("")?;

    for (key, value) in &dict.entries {
        w.begin_chunk(TCODE_DICTIONARY_ENTRY)?;
        w.write_i32(value.item_type() as i32)?;
        w.write_string(key)?;
        value.write(key, w)?;
        w.end_chunk()?;
    }

    w.write_empty_chunk(TCODE_DICTIONARY_END)?;
    w.end_chunk()
}

/// Read a dictionary chunk. Entries of unknown item type are skipped.
pub fn read_dictionary(r: &mut BufferReader<'_>) -> Result<ArchivableDictionary> {
    r.expect_chunk(TCODE_DICTIONARY)?;
    let id = ClassId(r.read_u128()?);
    if id != DICTIONARY_ID {
        return Err(Error::invalid(format!("foreign dictionary id {}", id)));
    }
    let version = r.read_u32()?;
    let name = r.read_string()?;
    tracing::trace!("reading dictionary '{}' version {}", name, version);

    let mut dict = ArchivableDictionary::new();
    loop {
        match r.begin_chunk()? {
            TCODE_DICTIONARY_ENTRY => {
                let raw_type = r.read_i32()?;
                let key = r.read_string()?;
                match ItemType::from_i32(raw_type) {
                    Some(item_type) => {
                        let value = DictValue::read(item_type, r)?;
                        dict.insert(key, value);
                    }
                    None => tracing::debug!("skipping entry '{}' of item type {}", key, raw_type),
                }
                r.end_chunk()?;
            }
            TCODE_DICTIONARY_END => {
                r.end_chunk()?;
                break;
            }
            other => return Err(Error::UnexpectedChunk {
                expected: TCODE_DICTIONARY_ENTRY,
                actual: other,
            }),
        }
    }
    r.end_chunk()?;
    Ok(dict)
}
