//! Integration tests for archivable dictionaries.

use rhino3dm::archive::{DictValue, ItemType};
use rhino3dm::codec::{decode_dictionary, encode_dictionary};
use rhino3dm::prelude::*;

#[test]
fn test_dictionary_roundtrip_with_geometry() {
    let mut dict = rhino3dm::archive::ArchivableDictionary::new();
    dict.insert("name", "bracket");
    dict.insert("count", 3);
    dict.insert("visible", true);
    dict.insert("scale", 0.5);
    dict.insert("origin", DVec3::new(1.0, 2.0, 3.0));
    dict.insert("profile", Object::new(LineCurve::new(DVec3::ZERO, DVec3::X)));
    dict.insert(
        "holes",
        vec![
            Object::new(Point::new(DVec3::ZERO)),
            Object::new(Point::new(DVec3::ONE)),
        ],
    );

    let encoded = encode_dictionary(&dict).unwrap();
    let back = decode_dictionary(&encoded).unwrap();
    assert_eq!(back, dict);

    let keys: Vec<&str> = back.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["name", "count", "visible", "scale", "origin", "profile", "holes"]);

    match back.get("holes") {
        Some(DictValue::GeometryArray(items)) => assert_eq!(items.len(), 2),
        other => panic!("unexpected value {other:?}"),
    }
    assert_eq!(back.get("profile").unwrap().item_type(), ItemType::OnGeometry);
}

#[test]
fn test_dictionary_insert_replaces_value() {
    let mut dict = rhino3dm::archive::ArchivableDictionary::new();
    assert!(dict.insert("k", 1).is_none());
    assert_eq!(dict.insert("k", 2), Some(DictValue::Int32(1)));
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.remove("k"), Some(DictValue::Int32(2)));
    assert!(dict.is_empty());
}

#[test]
fn test_dictionary_rejects_layer_values() {
    let mut dict = rhino3dm::archive::ArchivableDictionary::new();
    dict.insert("layer", Object::new(Layer::new("nope")));
    assert!(matches!(encode_dictionary(&dict), Err(Error::TypeMismatch { .. })));
}
