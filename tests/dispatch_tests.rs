//! Integration tests for wrapper dispatch and borrowed table entries.

use rhino3dm::archive::ClassId;
use rhino3dm::binding::{classify, ObjectHandle, WrapperKind};
use rhino3dm::core::UnknownObject;
use rhino3dm::prelude::*;
use rhino3dm::util::{Interval, Plane};

#[test]
fn test_dispatch_picks_most_specific_wrapper() {
    let cases: Vec<(Object, WrapperKind, &str)> = vec![
        (Object::new(Mesh::new()), WrapperKind::Mesh, "Mesh"),
        (Object::new(Brep::new()), WrapperKind::Brep, "Brep"),
        (Object::new(NurbsCurve::new(3, true, 3, 5)), WrapperKind::NurbsCurve, "NurbsCurve"),
        (Object::new(LineCurve::new(DVec3::ZERO, DVec3::X)), WrapperKind::LineCurve, "LineCurve"),
        (Object::new(PolylineCurve::new(vec![DVec3::ZERO, DVec3::X])), WrapperKind::PolylineCurve, "PolylineCurve"),
        (Object::new(PolyCurve::new()), WrapperKind::PolyCurve, "PolyCurve"),
        (Object::new(ArcCurve::circle(Plane::WORLD_XY, 1.0)), WrapperKind::ArcCurve, "ArcCurve"),
        (Object::new(Point::new(DVec3::ZERO)), WrapperKind::Point, "Point"),
        (Object::new(Viewport::new()), WrapperKind::Viewport, "ViewportInfo"),
        (Object::new(TextDot::new(DVec3::ZERO, "x")), WrapperKind::Geometry, "GeometryBase"),
        (Object::new(Layer::new("L")), WrapperKind::Layer, "Layer"),
        (
            Object::new(UnknownObject { class_id: ClassId(7), data: Vec::new() }),
            WrapperKind::Common,
            "CommonObject",
        ),
    ];

    for (object, kind, name) in cases {
        assert_eq!(classify(&object), kind);
        let wrapper = create_wrapper(Some(ObjectHandle::Owned(object))).expect("never None for an object");
        assert_eq!(wrapper.kind(), kind);
        assert_eq!(wrapper.type_name(), name);
        assert_eq!(wrapper.as_geometry().is_some(), kind.is_geometry());
        assert_eq!(wrapper.as_curve().is_some(), kind.is_curve());
    }
}

#[test]
fn test_arc_wrapper_exposes_curve_operations() {
    let arc = ArcCurve::circle(Plane::WORLD_XY, 2.0);
    let expected = arc.domain;
    let wrapper = Wrapper::from(Object::new(arc));
    assert_eq!(wrapper.kind(), WrapperKind::ArcCurve);

    let curve = wrapper.as_curve().unwrap();
    assert_eq!(curve.domain().unwrap(), expected);
    assert_eq!(curve.dimension().unwrap(), 3);
    assert!(curve.is_valid().unwrap());

    let arc = wrapper.as_arc_curve().unwrap();
    assert_eq!(arc.radius().unwrap(), 2.0);
    assert!(arc.is_circle().unwrap());
    assert_eq!(arc.plane().unwrap(), Plane::WORLD_XY);
}

#[test]
fn test_decoded_arc_keeps_arc_wrapper() {
    let mut object = Object::new(ArcCurve::new(Plane::WORLD_XY, 1.5, Interval::new(0.0, 1.0)));
    let encoded = encode(Some(&mut object), &EncodeOptions::default()).unwrap();

    let wrapper = decode_wrapper(&encoded).unwrap();
    assert_eq!(wrapper.type_name(), "ArcCurve");
    let arc = wrapper.as_arc_curve().unwrap();
    assert_eq!(arc.radius().unwrap(), 1.5);
    assert_eq!(arc.angle().unwrap(), Interval::new(0.0, 1.0));
    assert!(!arc.is_circle().unwrap());
}

#[test]
fn test_table_wrappers_are_borrowed() {
    let mut table = ComponentTable::new();
    let layer = table.add(Object::new(Layer::new("Default")));
    let mesh = table.add(Object::new(Mesh::new()));

    let mut wrapper = table.wrapper(mesh).unwrap();
    assert_eq!(wrapper.kind(), WrapperKind::Mesh);
    assert!(!wrapper.as_common().is_owned());

    let mesh_wrapper = wrapper.as_mesh_mut().unwrap();
    mesh_wrapper.add_vertex(DVec3::ZERO).unwrap();
    mesh_wrapper.add_vertex(DVec3::X).unwrap();
    mesh_wrapper.add_vertex(DVec3::Y).unwrap();
    assert_eq!(mesh_wrapper.add_triangle(0, 1, 2).unwrap(), Some(0));

    // The edit landed in the table
    assert_eq!(table.with(mesh, |o| o.as_mesh().unwrap().face_count()).unwrap(), 1);

    // Dropping a borrowed wrapper leaves the entry alone
    drop(wrapper);
    assert_eq!(table.len(), 2);

    let names: Vec<&str> = table.wrappers().map(|w| w.type_name()).collect();
    assert_eq!(names, ["Layer", "Mesh"]);

    let layer_wrapper = table.wrapper(layer).unwrap();
    assert_eq!(layer_wrapper.as_layer().unwrap().name().unwrap(), "Default");
}

#[test]
fn test_removed_entry_detaches_wrappers() {
    let mut table = ComponentTable::new();
    let index = table.add(Object::new(Point::new(DVec3::ONE)));
    let mut wrapper = table.wrapper(index).unwrap();

    let removed = table.remove(index).unwrap();
    assert_eq!(removed.as_point().unwrap().location, DVec3::ONE);

    let point = wrapper.as_point_mut().unwrap();
    assert!(matches!(point.location(), Err(Error::Detached)));
    assert!(matches!(point.set_location(DVec3::ZERO), Err(Error::Detached)));
    assert!(wrapper.as_common_mut().encode().is_none());

    // The table no longer hands out wrappers for the hole
    assert!(table.wrapper(index).is_none());
    assert!(matches!(table.remove(index), Err(Error::ComponentNotFound(_))));

    // A detached handle gives no wrapper
    let handle = wrapper.into_handle();
    assert!(create_wrapper(Some(handle)).is_none());
}

#[test]
fn test_borrowed_encode_reads_current_table_state() {
    let mut table = ComponentTable::new();
    let index = table.add(Object::new(LineCurve::new(DVec3::ZERO, DVec3::X)));

    let mut wrapper = table.wrapper(index).unwrap();
    wrapper.as_common_mut().set_user_string("tag", "beam").unwrap();
    let encoded = wrapper.as_common_mut().encode().unwrap();

    let decoded = decode_wrapper(&encoded).unwrap();
    assert!(decoded.as_common().is_owned());
    assert_eq!(
        decoded.as_common().get_user_string("tag").unwrap().as_deref(),
        Some("beam")
    );
    assert_eq!(table.with(index, |o| o.user_strings().len()).unwrap(), 1);
}

#[test]
fn test_wrappers_on_one_entry_keep_their_kind_after_edits() {
    let mut table = ComponentTable::new();
    let index = table.add(Object::new(Mesh::new()));

    let mut editor = table.wrapper(index).unwrap();
    let reader = table.wrapper(index).unwrap();

    let mesh = editor.as_mesh_mut().unwrap();
    mesh.add_vertex(DVec3::ZERO).unwrap();
    mesh.add_vertex(DVec3::X).unwrap();
    mesh.set_user_string("k", "v").unwrap();

    // Edits go through typed methods only, so the entry is still a mesh
    assert_eq!(table.with(index, classify).unwrap(), WrapperKind::Mesh);
    assert_eq!(reader.kind(), WrapperKind::Mesh);
    assert_eq!(reader.as_mesh().unwrap().vertex_count().unwrap(), 2);
    assert_eq!(reader.as_common().user_string_count().unwrap(), 1);

    // A fresh dispatch over the shared entry agrees with the old wrappers
    let again = create_wrapper(Some(ObjectHandle::Borrowed(table.get(index).unwrap()))).unwrap();
    assert_eq!(again.kind(), WrapperKind::Mesh);
}
