//! Class framing of objects.
//!
//! Every object is written as:
//!
//! ```text
//! CLASS {
//!     CLASS_UUID { class id: u128 }
//!     CLASS_DATA { major: u8, minor: u8, fields..., crc }
//!     [CLASS_USERDATA { count: u32, (key, value)..., crc }]
//!     CLASS_END {}
//! }
//! ```
//!
//! A reader accepts any minor version of a known major and skips fields it
//! does not know. A class id it does not know keeps its data body verbatim.

use super::format::*;
use super::{BufferReader, BufferWriter};
use crate::core::{Geometry, Object, ObjectData, UnknownObject, UserStrings};
use crate::geom::{
    ArcCurve, Brep, Curve, LineCurve, Mesh, NurbsCurve, Point, PolyCurve, PolylineCurve, TextDot,
    Viewport,
};
use crate::model::Layer;
use crate::util::{Error, Result};

/// A class whose fields can be written into a class data chunk.
pub trait Archivable: Sized {
    /// Identifier written into the class id chunk.
    const CLASS_ID: ClassId;
    /// Human readable class name.
    const CLASS_NAME: &'static str;
    /// Major version of the field layout. Readers reject other majors.
    const MAJOR_VERSION: u8 = 1;
    /// Minor version of the field layout. New fields go at the end.
    const MINOR_VERSION: u8 = 0;

    /// Estimated in-memory size in bytes.
    fn size_of(&self) -> usize;

    /// Write the fields, after the version bytes.
    fn write_fields(&self, w: &mut BufferWriter) -> Result<()>;

    /// Read fields written with `minor` of [`MAJOR_VERSION`](Self::MAJOR_VERSION).
    fn read_fields(r: &mut BufferReader<'_>, minor: u8) -> Result<Self>;
}

/// Write a class data chunk for `value`.
pub fn write_class_data<T: Archivable>(w: &mut BufferWriter, value: &T) -> Result<()> {
    w.begin_chunk(TCODE_OPENNURBS_CLASS_DATA)?;
    w.write_u8(T::MAJOR_VERSION)?;
    w.write_u8(T::MINOR_VERSION)?;
    value.write_fields(w)?;
    w.end_chunk()
}

/// Read a class data chunk for `T`.
pub fn read_class_data<T: Archivable>(r: &mut BufferReader<'_>) -> Result<T> {
    r.expect_chunk(TCODE_OPENNURBS_CLASS_DATA)?;
    let major = r.read_u8()?;
    let minor = r.read_u8()?;
    if major != T::MAJOR_VERSION {
        return Err(Error::UnsupportedClassVersion {
            class: T::CLASS_NAME,
            major,
            minor,
        });
    }
    let value = T::read_fields(r, minor)?;
    r.end_chunk()?;
    Ok(value)
}

/// Class id of an object's data.
pub fn class_id_of(data: &ObjectData) -> ClassId {
    match data {
        ObjectData::Geometry(g) => match g {
            Geometry::Mesh(_) => Mesh::CLASS_ID,
            Geometry::Brep(_) => Brep::CLASS_ID,
            Geometry::Curve(c) => curve_class_id(c),
            Geometry::Viewport(_) => Viewport::CLASS_ID,
            Geometry::Point(_) => Point::CLASS_ID,
            Geometry::TextDot(_) => TextDot::CLASS_ID,
        },
        ObjectData::Layer(_) => Layer::CLASS_ID,
        ObjectData::Unknown(u) => u.class_id,
    }
}

fn curve_class_id(curve: &Curve) -> ClassId {
    match curve {
        Curve::Nurbs(_) => NurbsCurve::CLASS_ID,
        Curve::Line(_) => LineCurve::CLASS_ID,
        Curve::Polyline(_) => PolylineCurve::CLASS_ID,
        Curve::Poly(_) => PolyCurve::CLASS_ID,
        Curve::Arc(_) => ArcCurve::CLASS_ID,
    }
}

fn write_curve_data(w: &mut BufferWriter, curve: &Curve) -> Result<()> {
    match curve {
        Curve::Nurbs(c) => write_class_data(w, c),
        Curve::Line(c) => write_class_data(w, c),
        Curve::Polyline(c) => write_class_data(w, c),
        Curve::Poly(c) => write_class_data(w, c),
        Curve::Arc(c) => write_class_data(w, c),
    }
}

fn write_data(w: &mut BufferWriter, data: &ObjectData) -> Result<()> {
    match data {
        ObjectData::Geometry(g) => match g {
            Geometry::Mesh(m) => write_class_data(w, m),
            Geometry::Brep(b) => write_class_data(w, b),
            Geometry::Curve(c) => write_curve_data(w, c),
            Geometry::Viewport(v) => write_class_data(w, v),
            Geometry::Point(p) => write_class_data(w, p),
            Geometry::TextDot(d) => write_class_data(w, d),
        },
        ObjectData::Layer(l) => write_class_data(w, l),
        ObjectData::Unknown(u) => {
            w.begin_chunk(TCODE_OPENNURBS_CLASS_DATA)?;
            w.write_bytes(&u.data)?;
            w.end_chunk()
        }
    }
}

fn write_class(
    w: &mut BufferWriter,
    class_id: ClassId,
    user_strings: Option<&UserStrings>,
    data: impl FnOnce(&mut BufferWriter) -> Result<()>,
) -> Result<()> {
    w.begin_chunk(TCODE_OPENNURBS_CLASS)?;

    w.begin_chunk(TCODE_OPENNURBS_CLASS_UUID)?;
    w.write_u128(class_id.0)?;
    w.end_chunk()?;

    data(w)?;

    if let Some(strings) = user_strings.filter(|s| !s.is_empty()) {
        w.begin_chunk(TCODE_OPENNURBS_CLASS_USERDATA)?;
        strings.write(w)?;
        w.end_chunk()?;
    }

    w.write_empty_chunk(TCODE_OPENNURBS_CLASS_END)?;
    w.end_chunk()
}

/// Write one object with its user strings.
///
/// Empty user strings produce no user data chunk.
pub fn write_object(w: &mut BufferWriter, object: &Object) -> Result<()> {
    write_class(
        w,
        class_id_of(object.data()),
        Some(object.user_strings()),
        |w| write_data(w, object.data()),
    )
}

/// Write a curve nested inside another class, e.g. a poly curve segment.
pub fn write_curve(w: &mut BufferWriter, curve: &Curve) -> Result<()> {
    write_class(w, curve_class_id(curve), None, |w| write_curve_data(w, curve))
}

fn read_class_header(r: &mut BufferReader<'_>) -> Result<ClassId> {
    r.expect_chunk(TCODE_OPENNURBS_CLASS)?;
    r.expect_chunk(TCODE_OPENNURBS_CLASS_UUID)?;
    let id = ClassId(r.read_u128()?);
    r.end_chunk()?;
    Ok(id)
}

/// Read the chunks after class data up to and including the class end.
fn read_class_trailer(r: &mut BufferReader<'_>) -> Result<UserStrings> {
    let mut user_strings = UserStrings::new();
    loop {
        match r.begin_chunk()? {
            TCODE_OPENNURBS_CLASS_USERDATA => {
                user_strings = UserStrings::read(r)?;
                r.end_chunk()?;
            }
            TCODE_OPENNURBS_CLASS_END => {
                r.end_chunk()?;
                break;
            }
            other => {
                tracing::debug!("skipping unknown chunk {:#010x} in class", other);
                r.end_chunk()?;
            }
        }
    }
    r.end_chunk()?;
    Ok(user_strings)
}

fn read_curve_data(r: &mut BufferReader<'_>, id: ClassId) -> Result<Option<Curve>> {
    let curve = match id {
        NURBS_CURVE_CLASS_ID => Curve::Nurbs(read_class_data(r)?),
        LINE_CURVE_CLASS_ID => Curve::Line(read_class_data(r)?),
        POLYLINE_CURVE_CLASS_ID => Curve::Polyline(read_class_data(r)?),
        POLY_CURVE_CLASS_ID => Curve::Poly(read_class_data(r)?),
        ARC_CURVE_CLASS_ID => Curve::Arc(read_class_data(r)?),
        _ => return Ok(None),
    };
    Ok(Some(curve))
}

/// Read one object with its user strings.
pub fn read_object(r: &mut BufferReader<'_>) -> Result<Object> {
    let id = read_class_header(r)?;

    let data = if let Some(curve) = read_curve_data(r, id)? {
        ObjectData::from(curve)
    } else {
        match id {
            MESH_CLASS_ID => ObjectData::from(read_class_data::<Mesh>(r)?),
            BREP_CLASS_ID => ObjectData::from(read_class_data::<Brep>(r)?),
            VIEWPORT_CLASS_ID => ObjectData::from(read_class_data::<Viewport>(r)?),
            POINT_CLASS_ID => ObjectData::from(read_class_data::<Point>(r)?),
            TEXT_DOT_CLASS_ID => ObjectData::from(read_class_data::<TextDot>(r)?),
            LAYER_CLASS_ID => ObjectData::from(read_class_data::<Layer>(r)?),
            _ => {
                tracing::debug!("keeping unknown class {} verbatim", id);
                r.expect_chunk(TCODE_OPENNURBS_CLASS_DATA)?;
                let data = r.read_remaining()?;
                r.end_chunk()?;
                ObjectData::Unknown(UnknownObject { class_id: id, data })
            }
        }
    };

    let user_strings = read_class_trailer(r)?;
    Ok(Object::with_user_strings(data, user_strings))
}

/// Read a curve nested inside another class.
pub fn read_curve(r: &mut BufferReader<'_>) -> Result<Curve> {
    let id = read_class_header(r)?;
    let curve = read_curve_data(r, id)?
        .ok_or_else(|| Error::invalid(format!("class {} is not a curve", id)))?;
    read_class_trailer(r)?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::DVec3;

    fn round_trip(object: &Object, version: i32) -> Object {
        let mut w = BufferWriter::new(0, version, 0).unwrap();
        write_object(&mut w, object).unwrap();
        let buf = w.into_buffer().unwrap();
        let mut r = BufferReader::new(&buf, version, 0);
        let back = read_object(&mut r).unwrap();
        assert!(r.at_end());
        back
    }

    #[test]
    fn test_object_with_user_strings() {
        let mut obj = Object::new(Point::new(DVec3::new(1.0, 2.0, 3.0)));
        obj.user_strings_mut().set("k", "v");
        for v in [4, 60] {
            assert_eq!(round_trip(&obj, v), obj);
        }
    }

    #[test]
    fn test_empty_user_strings_write_no_chunk() {
        let obj = Object::new(Point::new(DVec3::ZERO));
        let mut w = BufferWriter::new(0, 60, 0).unwrap();
        write_object(&mut w, &obj).unwrap();
        let buf = w.into_buffer().unwrap();

        let mut r = BufferReader::new(&buf, 60, 0);
        r.expect_chunk(TCODE_OPENNURBS_CLASS).unwrap();
        assert_eq!(r.begin_chunk().unwrap(), TCODE_OPENNURBS_CLASS_UUID);
        r.end_chunk().unwrap();
        assert_eq!(r.begin_chunk().unwrap(), TCODE_OPENNURBS_CLASS_DATA);
        r.end_chunk().unwrap();
        assert_eq!(r.peek_chunk_typecode().unwrap(), TCODE_OPENNURBS_CLASS_END);
    }

    #[test]
    fn test_unknown_class_kept_verbatim() {
        let obj = Object::new(UnknownObject {
            class_id: ClassId(0x1234),
            data: vec![1, 0, 0xAA, 0xBB],
        });
        let back = round_trip(&obj, 60);
        assert_eq!(back, obj);
        assert_eq!(class_id_of(back.data()), ClassId(0x1234));
    }

    #[test]
    fn test_newer_minor_version_is_read() {
        // A writer one minor ahead appends a field this reader does not know.
        let mut w = BufferWriter::new(0, 60, 0).unwrap();
        w.begin_chunk(TCODE_OPENNURBS_CLASS).unwrap();
        w.begin_chunk(TCODE_OPENNURBS_CLASS_UUID).unwrap();
        w.write_u128(POINT_CLASS_ID.0).unwrap();
        w.end_chunk().unwrap();
        w.begin_chunk(TCODE_OPENNURBS_CLASS_DATA).unwrap();
        w.write_u8(Point::MAJOR_VERSION).unwrap();
        w.write_u8(Point::MINOR_VERSION + 1).unwrap();
        w.write_point3(DVec3::new(5.0, 6.0, 7.0)).unwrap();
        w.write_string("future field").unwrap();
        w.end_chunk().unwrap();
        w.write_empty_chunk(TCODE_OPENNURBS_CLASS_END).unwrap();
        w.end_chunk().unwrap();
        let buf = w.into_buffer().unwrap();

        let mut r = BufferReader::new(&buf, 60, 0);
        let obj = read_object(&mut r).unwrap();
        assert_eq!(obj.as_point().unwrap().location, DVec3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_other_major_version_rejected() {
        let mut w = BufferWriter::new(0, 60, 0).unwrap();
        w.begin_chunk(TCODE_OPENNURBS_CLASS).unwrap();
        w.begin_chunk(TCODE_OPENNURBS_CLASS_UUID).unwrap();
        w.write_u128(POINT_CLASS_ID.0).unwrap();
        w.end_chunk().unwrap();
        w.begin_chunk(TCODE_OPENNURBS_CLASS_DATA).unwrap();
        w.write_u8(Point::MAJOR_VERSION + 1).unwrap();
        w.write_u8(0).unwrap();
        w.end_chunk().unwrap();
        w.write_empty_chunk(TCODE_OPENNURBS_CLASS_END).unwrap();
        w.end_chunk().unwrap();
        let buf = w.into_buffer().unwrap();

        let mut r = BufferReader::new(&buf, 60, 0);
        assert!(matches!(
            read_object(&mut r),
            Err(Error::UnsupportedClassVersion { class: "Point", .. })
        ));
    }

    #[test]
    fn test_nested_curve_must_be_a_curve() {
        let obj = Object::new(Point::new(DVec3::ZERO));
        let mut w = BufferWriter::new(0, 60, 0).unwrap();
        write_object(&mut w, &obj).unwrap();
        let buf = w.into_buffer().unwrap();
        let mut r = BufferReader::new(&buf, 60, 0);
        assert!(read_curve(&mut r).is_err());
    }
}
