use super::*;
use crate::effects::value::VectorValue;

#[test]
fn identity_is_structural_over_all_fields() {
    let a = TransitionEffect::new("WindFragment").with_parameter("size", 0.2f64);
    let b = TransitionEffect::new("WindFragment").with_parameter("size", 0.2f64);
    assert_eq!(a, b);

    let different_param = TransitionEffect::new("WindFragment").with_parameter("size", 0.3f64);
    assert_ne!(a, different_param);

    let different_sampler = a.clone().with_sampler("luma", "spiral-1.png");
    assert_ne!(a, different_sampler);

    let different_fragment = TransitionEffect::new("LumaFragment").with_parameter("size", 0.2f64);
    assert_ne!(a, different_fragment);
}

#[test]
fn serde_uses_camel_case_keys() {
    let effect = TransitionEffect::new("LumaFragment")
        .with_sampler("luma", "spiral-1.png")
        .with_parameter("softness", 0.1f64);
    let encoded = serde_json::to_value(&effect).unwrap();
    assert_eq!(
        encoded.get("fragmentName").and_then(|v| v.as_str()),
        Some("LumaFragment")
    );
    assert!(encoded.get("parameters").is_some());
    assert!(encoded.get("samplers").is_some());
}

#[test]
fn effect_round_trips() {
    let effect = TransitionEffect::new("DisplacementFragment")
        .with_parameter("strength", 0.5f64)
        .with_parameter("steps", Value::Int(8))
        .with_parameter("center", VectorValue::from_f32s(&[0.5, 0.5]))
        .with_sampler("displacement", "noise.png");
    let encoded = serde_json::to_string(&effect).unwrap();
    let decoded: TransitionEffect = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, effect);
}

#[test]
fn missing_maps_decode_as_empty() {
    let decoded: TransitionEffect =
        serde_json::from_str(r#"{"fragmentName":"CrossfadeFragment"}"#).unwrap();
    assert_eq!(decoded, TransitionEffect::crossfade());
    assert!(decoded.parameters().is_empty());
    assert!(decoded.samplers().is_empty());
}

#[test]
fn wipe_builder_sets_direction() {
    let effect = TransitionEffect::wipe("ttb");
    assert_eq!(effect.fragment_name(), "WipeFragment");
    assert_eq!(
        effect.parameters().get("direction").and_then(|v| v.as_str()),
        Some("ttb")
    );
}
