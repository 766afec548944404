mod common;

use common::*;
use refract::json::{EnumRepr, Error, JsonAdapter, JsonOptions};
use serde_json::json;

fn wrapper_document() -> serde_json::Value {
    json!({
        "i": 9,
        "d": -2.2,
        "bs": {"b": true, "i": 1, "d": 2.5},
        "basics_arr": [
            {"b": true, "i": 1, "d": 2.5},
            {"b": false, "i": -5, "d": 3.4},
            {"b": true, "i": 1, "d": 2.5}
        ],
        "basics_vec": [
            {"b": false, "i": -5, "d": 3.4},
            {"b": false, "i": -5, "d": 3.4}
        ]
    })
}

#[test]
fn test_to_document() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    assert_eq!(adapter.to_document(&nesting()).unwrap(), wrapper_document());
}

#[test]
fn test_key_order_follows_traversal() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let level = SecondLevelChild {
        label: "x".to_string(),
        parent: ChildClass {
            child_field: 1,
            base: BasicClass { public_field: 2 },
        },
    };
    assert_eq!(
        adapter.to_string(&level).unwrap(),
        r#"{"label":"x","child_field":1,"public_field":2}"#
    );
}

#[test]
fn test_from_document() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let decoded: NestingStruct = adapter.from_document(&wrapper_document()).unwrap();
    assert_eq!(decoded, nesting());
}

#[test]
fn test_round_trip_is_equal() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let original = nesting();
    let text = adapter.to_string_pretty(&original).unwrap();
    let decoded: NestingStruct = adapter.from_str(&text).unwrap();
    assert!(registry.equal_to(&original, &decoded).unwrap());
}

#[test]
fn test_missing_field() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let mut document = wrapper_document();
    document["basics_arr"][1]
        .as_object_mut()
        .unwrap()
        .remove("d");

    let err = adapter
        .from_document::<NestingStruct>(&document)
        .unwrap_err();
    match err {
        Error::MissingField { field } => assert_eq!(field, "basics_arr[1].d"),
        other => panic!("unexpected error: {other}"),
    }

    let err = adapter
        .from_document::<BasicStruct>(&json!({"b": true, "d": 1.0}))
        .unwrap_err();
    match err {
        Error::MissingField { field } => assert_eq!(field, "i"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_array_size_mismatch() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let mut document = wrapper_document();
    document["basics_arr"].as_array_mut().unwrap().truncate(2);

    let err = adapter
        .from_document::<NestingStruct>(&document)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ArraySizeMismatch {
            expected: 3,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn test_assign_keeps_fields_before_failure() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let mut basic = BasicStruct::new(false, 0, 0.0);
    let err = adapter
        .assign_document(&mut basic, &json!({"b": true, "i": 4}))
        .unwrap_err();
    match err {
        Error::MissingField { field } => assert_eq!(field, "d"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(basic, BasicStruct::new(true, 4, 0.0));
}

#[test]
fn test_non_finite_floats_rejected() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);

    let err = adapter
        .to_document(&BasicStruct::new(true, 1, f64::INFINITY))
        .unwrap_err();
    match err {
        Error::InvalidValue { field, .. } => assert_eq!(field, "d"),
        other => panic!("unexpected error: {other}"),
    }

    let mut wrapper = nesting();
    wrapper.basics_arr[2].d = f64::NAN;
    let err = adapter.to_string(&wrapper).unwrap_err();
    match err {
        Error::InvalidValue { field, .. } => assert_eq!(field, "basics_arr[2].d"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_vec_takes_document_length() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let mut document = wrapper_document();
    document["basics_vec"] = json!([]);
    let decoded: NestingStruct = adapter.from_document(&document).unwrap();
    assert!(decoded.basics_vec.is_empty());
}

#[test]
fn test_wrong_shapes() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);

    let err = adapter
        .from_document::<BasicStruct>(&json!([1, 2]))
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape { .. }));

    let err = adapter
        .from_document::<BasicStruct>(&json!({"b": "yes", "i": 1, "d": 1.0}))
        .unwrap_err();
    match err {
        Error::InvalidValue { field, .. } => assert_eq!(field, "b"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_enums_by_name_and_value() {
    let registry = registry();
    let settings = Settings {
        mode: Scoped::Third,
        history: [Scoped::Second, Scoped::First],
        gain: 0.25,
    };

    let by_name = JsonAdapter::new(&registry);
    assert_eq!(
        by_name.to_document(&settings).unwrap(),
        json!({"mode": "Third", "history": ["Second", "First"], "gain": 0.25})
    );

    let by_value = JsonAdapter::new(&registry).with_options(JsonOptions {
        enum_repr: EnumRepr::Value,
    });
    let document = by_value.to_document(&settings).unwrap();
    assert_eq!(
        document,
        json!({"mode": 2, "history": [1, 0], "gain": 0.25})
    );

    // Either form decodes.
    let decoded: Settings = by_name.from_document(&document).unwrap();
    assert_eq!(decoded, settings);
}

#[test]
fn test_unknown_enumerators_rejected() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);

    let err = adapter
        .from_document::<Settings>(&json!({"mode": 7, "history": [0, 0], "gain": 0.0}))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Core(refract::Error::UnknownEnumeratorValue { value: 7, .. })
    ));

    let err = adapter
        .from_document::<Settings>(&json!({"mode": "Fifth", "history": [0, 0], "gain": 0.0}))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Core(refract::Error::UnknownEnumeratorName { .. })
    ));
}

#[test]
fn test_unregistered_record() {
    let registry = registry();
    let adapter = JsonAdapter::new(&registry);
    let err = adapter
        .to_document(&UnreflectedBase::default())
        .unwrap_err();
    assert!(matches!(err, Error::Core(refract::Error::NotVisitable(_))));
}
