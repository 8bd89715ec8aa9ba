use super::*;

fn round_trip(value: &Value) -> Value {
    let encoded = serde_json::to_string(value).unwrap();
    serde_json::from_str(&encoded).unwrap()
}

#[test]
fn int_and_float_round_trip_distinctly() {
    assert_eq!(round_trip(&Value::Int(42)), Value::Int(42));
    assert_eq!(round_trip(&Value::Int(-7)), Value::Int(-7));
    assert_eq!(round_trip(&Value::Float(0.25)), Value::Float(0.25));
    // An integral float stays a float: 3.0 encodes as "3.0", which the
    // cascade decodes as Float, not Int.
    assert_eq!(round_trip(&Value::Float(3.0)), Value::Float(3.0));
}

#[test]
fn as_f64_widens_ints() {
    assert_eq!(Value::Int(3).as_f64(), Some(3.0));
    assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
    assert_eq!(Value::Str("3".to_string()).as_f64(), None);
}

#[test]
fn string_round_trips() {
    let v = Value::Str("spiral-1.png".to_string());
    assert_eq!(round_trip(&v), v);
    assert_eq!(v.as_str(), Some("spiral-1.png"));
}

#[test]
fn vector_round_trips_with_base64_payload() {
    let vec = VectorValue::from_f32s(&[0.5, -1.0, 2.25]);
    let v = Value::Vector(vec.clone());
    let encoded = serde_json::to_value(&v).unwrap();
    assert!(encoded.get("data").and_then(|d| d.as_str()).is_some());
    assert_eq!(encoded.get("type").and_then(|t| t.as_u64()), Some(0));

    let decoded = round_trip(&v);
    assert_eq!(decoded, v);
    assert_eq!(
        decoded.as_vector().and_then(VectorValue::as_f32s),
        Some(vec![0.5, -1.0, 2.25])
    );
}

#[test]
fn int_vector_round_trips() {
    let vec = VectorValue::from_i32s(&[1, -2, 300]);
    let v = Value::Vector(vec);
    let decoded = round_trip(&v);
    assert_eq!(
        decoded.as_vector().and_then(VectorValue::as_i32s),
        Some(vec![1, -2, 300])
    );
}

#[test]
fn typed_accessors_reject_mismatched_payloads() {
    let floats = VectorValue::from_f32s(&[1.0]);
    assert!(floats.as_i32s().is_none());
    let ints = VectorValue::from_i32s(&[1]);
    assert!(ints.as_f32s().is_none());
}

#[test]
fn unknown_scalar_tag_is_rejected() {
    let err = serde_json::from_str::<VectorValue>(r#"{"data":"AA==","type":99}"#);
    assert!(err.is_err());
}

#[test]
fn invalid_base64_is_rejected() {
    let err = serde_json::from_str::<VectorValue>(r#"{"data":"not base64!!","type":0}"#);
    assert!(err.is_err());
}

#[test]
fn nested_lists_and_maps_round_trip() {
    let mut map = std::collections::BTreeMap::new();
    map.insert("size".to_string(), Value::Float(0.2));
    map.insert("name".to_string(), Value::Str("wind".to_string()));
    map.insert(
        "center".to_string(),
        Value::Vector(VectorValue::from_f32s(&[0.5, 0.5])),
    );
    let v = Value::List(vec![
        Value::Int(1),
        Value::Map(map),
        Value::List(vec![Value::Str("a".to_string())]),
    ]);
    assert_eq!(round_trip(&v), v);
}

#[test]
fn untagged_cascade_prefers_int_over_float() {
    assert_eq!(
        serde_json::from_str::<Value>("3").unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        serde_json::from_str::<Value>("3.5").unwrap(),
        Value::Float(3.5)
    );
}
