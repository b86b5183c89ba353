//! Integration tests for object encode / decode.

use rhino3dm::archive::{opennurbs_version_to_write, ClassId, CURRENT_ENGINE_VERSION};
use rhino3dm::binding::{CommonObject, MeshWrapper, WrapperKind};
use rhino3dm::codec::{try_decode, try_encode};
use rhino3dm::core::UnknownObject;
use rhino3dm::prelude::*;
use rhino3dm::util::{Plane, Vec3};

use tempfile::NamedTempFile;

const ACCEPTED_VERSIONS: [i32; 8] = [2, 3, 4, 5, 50, 60, 70, 80];

/// One object of every kind the dispatch factory specializes for.
fn every_kind() -> Vec<Object> {
    let mut mesh = Mesh::new();
    for p in [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0)] {
        mesh.add_vertex(p);
    }
    mesh.add_triangle(0, 1, 2).expect("valid triangle");

    let mut brep = Brep::new();
    brep.add_vertex(DVec3::ZERO);
    brep.add_vertex(DVec3::Z);
    brep.add_curve(NurbsCurve::create_clamped_uniform(3, 2, &[DVec3::ZERO, DVec3::Z]).unwrap());
    brep.add_edge(0, 0, 1, 0.001).unwrap();

    let mut poly = PolyCurve::new();
    poly.append(LineCurve::new(DVec3::ZERO, DVec3::X));
    poly.append(PolylineCurve::new(vec![DVec3::X, DVec3::new(2.0, 1.0, 0.0)]));

    vec![
        Object::new(mesh),
        Object::new(brep),
        Object::new(NurbsCurve::new(3, false, 4, 4)),
        Object::new(LineCurve::new(DVec3::ZERO, DVec3::new(3.0, 4.0, 0.0))),
        Object::new(PolylineCurve::new(vec![DVec3::ZERO, DVec3::Y, DVec3::ONE])),
        Object::new(poly),
        Object::new(ArcCurve::circle(Plane::WORLD_XY, 2.0)),
        Object::new(Point::new(DVec3::new(1.0, 2.0, 3.0))),
        Object::new(Viewport::new()),
        Object::new(TextDot::new(DVec3::ZERO, "label")),
        Object::new(Layer::new("Walls")),
        Object::new(UnknownObject {
            class_id: ClassId(0xDEAD_BEEF),
            data: vec![1, 0, 7, 7, 7],
        }),
    ]
}

fn kind_of(object: Object) -> WrapperKind {
    create_wrapper(Some(object.into())).expect("wrapper").kind()
}

#[test]
fn test_roundtrip_keeps_wrapper_type() {
    for version in ACCEPTED_VERSIONS {
        for object in every_kind() {
            let expected = kind_of(object.clone());
            let mut source = object;
            let options = EncodeOptions::default().with_archive_3dm_version(version);
            let encoded = encode(Some(&mut source), &options)
                .unwrap_or_else(|| panic!("{} at v{} did not encode", source.class_name(), version));
            let wrapper = decode_wrapper(&encoded)
                .unwrap_or_else(|| panic!("{} at v{} did not decode", source.class_name(), version));
            assert_eq!(wrapper.kind(), expected, "{} at v{}", source.class_name(), version);
        }
    }
}

#[test]
fn test_roundtrip_keeps_modern_data() {
    for object in every_kind() {
        let mut source = object.clone();
        source.user_strings_mut().set("id", "42");
        let encoded = try_encode(&mut source, &EncodeOptions::default()).unwrap();
        let back = try_decode(&encoded).unwrap();
        assert_eq!(back, source, "{}", object.class_name());
    }
}

#[test]
fn test_legacy_mesh_vertices_are_single_precision() {
    let mut mesh = Mesh::new();
    mesh.add_vertex(DVec3::new(0.1, 0.2, 0.3));
    let mut object = Object::new(mesh);

    let options = EncodeOptions::default().with_archive_3dm_version(4);
    let back = try_decode(&try_encode(&mut object, &options).unwrap()).unwrap();
    let v = back.as_mesh().unwrap().vertices()[0];
    assert_eq!(v.x, 0.1f32 as f64);
    assert_ne!(v.x, 0.1);

    let back = try_decode(&try_encode(&mut object, &EncodeOptions::default()).unwrap()).unwrap();
    assert_eq!(back.as_mesh().unwrap().vertices()[0].x, 0.1);
}

#[test]
fn test_excluding_user_data_keeps_caller_strings() {
    let mut mesh = Object::new(Mesh::new());
    mesh.user_strings_mut().set("a", "1");
    mesh.user_strings_mut().set("b", "2");
    mesh.user_strings_mut().set("c", "3");
    let before = mesh.user_strings().clone();

    let options = EncodeOptions::default().with_user_data(false);
    let encoded = encode(Some(&mut mesh), &options).expect("encodes");

    assert_eq!(mesh.user_strings().len(), 3);
    assert_eq!(mesh.user_strings(), &before);

    let decoded = decode(&encoded).unwrap();
    assert!(decoded.user_strings().is_empty());
}

#[test]
fn test_excluding_user_data_restores_on_failure() {
    let mut object = Object::new(Point::new(DVec3::ONE));
    object.user_strings_mut().set("k", "v");
    let options = EncodeOptions::default()
        .with_user_data(false)
        .with_archive_3dm_version(90);
    assert!(encode(Some(&mut object), &options).is_none());
    assert_eq!(object.user_strings().get("k"), Some("v"));
}

#[test]
fn test_rejected_version_band_never_decodes() {
    let mut point = Object::new(Point::new(DVec3::ONE));
    let valid = encode(Some(&mut point), &EncodeOptions::default()).unwrap();

    for version in 6..50 {
        let forged = EncodedObject {
            archive3dm: version,
            ..valid.clone()
        };
        assert!(decode(&forged).is_none(), "v{} decoded", version);

        let garbage = EncodedObject {
            archive3dm: version,
            data: vec![0xFF; 32],
            ..valid.clone()
        };
        assert!(decode(&garbage).is_none());
    }
}

#[test]
fn test_null_inputs() {
    assert!(encode(None, &EncodeOptions::default()).is_none());
    assert!(create_wrapper(None).is_none());
}

#[test]
fn test_corrupt_payloads_decode_to_nothing() {
    let mut line = Object::new(LineCurve::new(DVec3::ZERO, DVec3::X));
    let valid = encode(Some(&mut line), &EncodeOptions::default()).unwrap();

    let empty = EncodedObject {
        data: Vec::new(),
        ..valid.clone()
    };
    assert!(decode(&empty).is_none());

    for cut in [1, 8, valid.data.len() / 2, valid.data.len() - 1] {
        let truncated = EncodedObject {
            data: valid.data[..cut].to_vec(),
            ..valid.clone()
        };
        assert!(decode(&truncated).is_none(), "cut at {}", cut);
    }

    // Flip a byte inside the CRC-protected class data
    let mut flipped = valid.clone();
    let n = flipped.data.len();
    flipped.data[n / 2] ^= 0x55;
    assert!(decode(&flipped).is_none());
}

#[test]
fn test_size_estimate_is_only_a_hint() {
    for object in every_kind() {
        let mut object = object;
        let encoded = encode(Some(&mut object), &EncodeOptions::default()).unwrap();
        assert!(!encoded.data.is_empty());
    }
}

// Scenario 1
#[test]
fn test_encode_empty_nurbs_curve() {
    let mut curve = NurbsCurve::new(3, false, 4, 4);
    curve.set_cv_point(0, DVec3::ZERO, 1.0);
    let mut object = Object::new(curve);

    let encoded = encode(Some(&mut object), &EncodeOptions::default()).unwrap();
    assert_eq!(encoded.version, 10000);
    assert_eq!(encoded.archive3dm, 60);
    assert_eq!(
        Some(encoded.opennurbs),
        opennurbs_version_to_write(60, CURRENT_ENGINE_VERSION)
    );
    assert!(!encoded.data_base64().is_empty());
}

// Scenario 2
#[test]
fn test_decode_gives_nurbs_curve_wrapper() {
    let mut object = Object::new(NurbsCurve::new(3, false, 4, 4));
    let encoded = encode(Some(&mut object), &EncodeOptions::default()).unwrap();

    let wrapper = decode_wrapper(&encoded).unwrap();
    assert_eq!(wrapper.kind(), WrapperKind::NurbsCurve);
    assert!(wrapper.kind().is_curve());
    assert_eq!(wrapper.as_nurbs_curve().unwrap().cv_count().unwrap(), 4);
}

// Scenario 3
#[test]
fn test_decode_version_ten_is_rejected() {
    let encoded = EncodedObject {
        version: 10000,
        archive3dm: 10,
        opennurbs: 0,
        data: vec![1, 2, 3],
    };
    assert!(decode(&encoded).is_none());
}

// Scenario 4
#[test]
fn test_decode_legacy_version_four() {
    let mut object = Object::new(PolylineCurve::new(vec![DVec3::ZERO, DVec3::X]));
    let options = EncodeOptions::default().with_archive_3dm_version(4);
    let encoded = encode(Some(&mut object), &options).unwrap();
    assert_eq!(encoded.archive3dm, 4);

    let wrapper = decode_wrapper(&encoded).expect("legacy payload decodes");
    assert_eq!(wrapper.type_name(), "PolylineCurve");
}

#[test]
fn test_decode_accepts_versions_below_the_band() {
    let mut mesh = Mesh::new();
    for p in [DVec3::ZERO, DVec3::X, DVec3::Y] {
        mesh.add_vertex(p);
    }
    mesh.add_triangle(0, 1, 2).unwrap();
    let mut object = Object::new(mesh);
    let options = EncodeOptions::default().with_archive_3dm_version(4);
    let legacy = encode(Some(&mut object), &options).unwrap();

    // 0 and below use the legacy layout, same as 1..=5
    for version in [0, -1] {
        let relabeled = EncodedObject {
            archive3dm: version,
            ..legacy.clone()
        };
        let wrapper = decode_wrapper(&relabeled).unwrap_or_else(|| panic!("v{version} rejected"));
        assert_eq!(wrapper.kind(), WrapperKind::Mesh);
        assert_eq!(wrapper.as_mesh().unwrap().vertex_count().unwrap(), 3);
    }
}

#[test]
fn test_mesh_with_stale_normals_does_not_encode() {
    let mut mesh = Mesh::new();
    for p in [DVec3::ZERO, DVec3::X, DVec3::Y] {
        mesh.add_vertex(p);
    }
    mesh.add_triangle(0, 1, 2).unwrap();
    assert!(mesh.set_normals(vec![Vec3::Z; 3]));

    let mut ok = Object::new(mesh.clone());
    let encoded = encode(Some(&mut ok), &EncodeOptions::default()).unwrap();
    let back = decode(&encoded).unwrap();
    assert_eq!(back.as_mesh().unwrap().normals(), mesh.normals());

    mesh.add_vertex(DVec3::ONE);
    let mut stale = Object::new(mesh);
    for version in [4, 70] {
        let options = EncodeOptions::default().with_archive_3dm_version(version);
        assert!(encode(Some(&mut stale), &options).is_none());
        assert!(matches!(try_encode(&mut stale, &options), Err(Error::WriteFailed(_))));
    }
}

#[test]
fn test_order_one_curve_does_not_encode() {
    let mut curve = Object::new(NurbsCurve::new(3, false, 1, 2));
    assert!(encode(Some(&mut curve), &EncodeOptions::default()).is_none());

    let mut brep = Brep::new();
    brep.add_vertex(DVec3::ZERO);
    brep.add_vertex(DVec3::Z);
    brep.add_curve(NurbsCurve::new(3, false, 1, 2));
    brep.add_edge(0, 0, 1, 0.001).unwrap();
    let mut brep = Object::new(brep);
    assert!(encode(Some(&mut brep), &EncodeOptions::default()).is_none());
}

// Scenario 5
#[test]
fn test_mesh_keeps_three_strings_without_user_data() {
    let mut mesh = MeshWrapper::new();
    for (k, v) in [("a", "x"), ("b", "y"), ("c", "z")] {
        mesh.set_user_string(k, v).unwrap();
    }
    let encoded = mesh
        .encode_with(&EncodeOptions::default().with_user_data(false))
        .unwrap();
    assert!(!encoded.data.is_empty());
    assert_eq!(mesh.user_string_count().unwrap(), 3);
    assert_eq!(mesh.get_user_string("b").unwrap().as_deref(), Some("y"));
}

// Scenario 6
#[test]
fn test_create_wrapper_of_nothing() {
    assert!(create_wrapper(None).is_none());
}

#[test]
fn test_envelope_file_roundtrip() {
    let temp = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp.path();

    let mut object = Object::new(TextDot::new(DVec3::new(1.0, 1.0, 0.0), "door"));
    object.user_strings_mut().set("room", "12");
    let encoded = encode(Some(&mut object), &EncodeOptions::default()).unwrap();
    encoded.save(path).expect("Failed to save");

    let text = std::fs::read_to_string(path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in ["version", "archive3dm", "opennurbs", "data"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }

    let loaded = EncodedObject::load(path).expect("Failed to load");
    assert_eq!(loaded, encoded);
    let back = decode(&loaded).unwrap();
    assert_eq!(back.as_text_dot().unwrap().text, "door");
    assert_eq!(back.user_strings().get("room"), Some("12"));
}

#[test]
fn test_text_dot_secondary_text_needs_modern_dialect() {
    let mut dot = TextDot::new(DVec3::ZERO, "main");
    dot.secondary_text = "tip".to_string();
    let mut object = Object::new(dot);

    let modern = decode(&encode(Some(&mut object), &EncodeOptions::default()).unwrap()).unwrap();
    assert_eq!(modern.as_text_dot().unwrap().secondary_text, "tip");

    let options = EncodeOptions::default().with_archive_3dm_version(50);
    let older = decode(&encode(Some(&mut object), &options).unwrap()).unwrap();
    assert_eq!(older.as_text_dot().unwrap().text, "main");
    assert!(older.as_text_dot().unwrap().secondary_text.is_empty());
}
