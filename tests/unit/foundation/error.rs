use super::*;

#[test]
fn error_messages_carry_context() {
    let err = TransmixError::validation("duration must be > 0");
    assert_eq!(err.to_string(), "validation error: duration must be > 0");

    let err = TransmixError::serde("bad payload");
    assert_eq!(err.to_string(), "serialization error: bad payload");
}

#[test]
fn anyhow_errors_pass_through() {
    let err: TransmixError = anyhow::anyhow!("device lost").into();
    assert_eq!(err.to_string(), "device lost");
}

#[test]
fn composite_errors_are_comparable_and_copyable() {
    let a = CompositeError::MissingSourceBuffer;
    let b = a;
    assert_eq!(a, b);
    assert_ne!(CompositeError::Cancelled, CompositeError::RenderFailure);
    assert_eq!(
        CompositeError::AllocationFailure.to_string(),
        "the render context could not provide a destination buffer"
    );
}
