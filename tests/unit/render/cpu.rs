use super::*;
use crate::foundation::core::Color;

fn solid(px: [u8; 4], w: u32, h: u32) -> Image {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&px);
    }
    Image::from_bgra8(w, h, data).unwrap()
}

fn state_for(input: Image, dest: Image, progress: f32) -> TransitionState {
    let mut state = TransitionState::default();
    state.assign(Some(input), Some(dest), progress);
    state
}

#[test]
fn crossfade_endpoints_reproduce_each_side() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::crossfade();
    let a = solid([200, 100, 50, 255], 4, 4);
    let b = solid([10, 20, 30, 255], 4, 4);

    let out = backend
        .render_transition(&effect, &state_for(a.clone(), b.clone(), 0.0))
        .unwrap();
    assert_eq!(out, a);

    let out = backend
        .render_transition(&effect, &state_for(a, b.clone(), 1.0))
        .unwrap();
    assert_eq!(out, b);
}

#[test]
fn crossfade_mixes_midway() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::crossfade();
    let a = solid([200, 100, 50, 255], 2, 2);
    let b = solid([0, 0, 0, 255], 2, 2);

    let out = backend
        .render_transition(&effect, &state_for(a, b, 0.3))
        .unwrap();
    assert_eq!(out.pixel(0, 0), [140, 70, 35, 255]);
}

#[test]
fn out_of_range_progress_is_clamped_by_the_pixel_math() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::crossfade();
    let a = solid([200, 100, 50, 255], 2, 2);
    let b = solid([10, 20, 30, 255], 2, 2);

    let under = backend
        .render_transition(&effect, &state_for(a.clone(), b.clone(), -0.5))
        .unwrap();
    assert_eq!(under, a);
    let over = backend
        .render_transition(&effect, &state_for(a, b.clone(), 1.5))
        .unwrap();
    assert_eq!(over, b);
}

#[test]
fn wipe_sweeps_left_to_right() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::wipe("left_to_right");
    let a = solid([255, 255, 255, 255], 4, 1);
    let b = solid([0, 0, 0, 255], 4, 1);

    let out = backend
        .render_transition(&effect, &state_for(a, b, 0.5))
        .unwrap();
    // Left half already wiped to the incoming side.
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(out.pixel(1, 0), [0, 0, 0, 255]);
    assert_eq!(out.pixel(2, 0), [255, 255, 255, 255]);
    assert_eq!(out.pixel(3, 0), [255, 255, 255, 255]);
}

#[test]
fn wipe_direction_aliases_parse() {
    let backend = CpuEffectBackend;
    let a = solid([255, 255, 255, 255], 1, 4);
    let b = solid([0, 0, 0, 255], 1, 4);

    let effect = TransitionEffect::wipe("ttb");
    let out = backend
        .render_transition(&effect, &state_for(a.clone(), b.clone(), 0.5))
        .unwrap();
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(out.pixel(0, 3), [255, 255, 255, 255]);

    let effect = TransitionEffect::wipe("btt");
    let out = backend
        .render_transition(&effect, &state_for(a, b, 0.5))
        .unwrap();
    assert_eq!(out.pixel(0, 3), [0, 0, 0, 255]);
    assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
}

#[test]
fn wipe_with_unknown_direction_yields_no_output() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::wipe("diagonal");
    let a = solid([255, 255, 255, 255], 2, 2);
    let b = solid([0, 0, 0, 255], 2, 2);
    assert!(backend.render_transition(&effect, &state_for(a, b, 0.5)).is_none());
}

#[test]
fn wipe_without_direction_defaults_to_left_to_right() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::new(WIPE_FRAGMENT);
    let a = solid([255, 255, 255, 255], 2, 1);
    let b = solid([0, 0, 0, 255], 2, 1);
    let out = backend
        .render_transition(&effect, &state_for(a, b, 0.5))
        .unwrap();
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(out.pixel(1, 0), [255, 255, 255, 255]);
}

#[test]
fn unknown_fragment_yields_no_output() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::new("AngularFragment");
    let a = solid([1, 1, 1, 255], 2, 2);
    let b = solid([2, 2, 2, 255], 2, 2);
    assert!(backend.render_transition(&effect, &state_for(a, b, 0.5)).is_none());
}

#[test]
fn mismatched_input_sizes_yield_no_output() {
    let backend = CpuEffectBackend;
    let effect = TransitionEffect::crossfade();
    let a = solid([1, 1, 1, 255], 2, 2);
    let b = solid([2, 2, 2, 255], 4, 4);
    assert!(backend.render_transition(&effect, &state_for(a, b, 0.5)).is_none());
}

#[test]
fn write_image_rejects_mismatched_destination() {
    let backend = CpuEffectBackend;
    let image = solid([1, 1, 1, 255], 2, 2);
    let dst = FrameBuffer::new(4, 4);
    assert!(backend.write_image(&image, &dst).is_err());

    let dst = FrameBuffer::new(2, 2);
    backend.write_image(&image, &dst).unwrap();
    dst.with_pixels(|px| assert_eq!(&px[0..4], &[1, 1, 1, 255]));
}

#[test]
fn overlay_composites_layers_in_order() {
    let backend = CpuEffectBackend;
    let base = solid([10, 10, 10, 255], 2, 2);
    let mid = solid([0, 200, 0, 255], 2, 2);
    let top_half = solid([200, 0, 0, 128], 2, 2);

    let out = backend.overlay(&base, &[mid, top_half]).unwrap();
    // Opaque green replaces the base, then half-alpha blue sits on top.
    let px = out.pixel(0, 0);
    assert!(px[0] > 90 && px[0] < 110); // blue channel from the top layer
    assert!(px[1] > 90 && px[1] < 110); // green remainder from the mid layer
    assert_eq!(px[3], 255);
}

#[test]
fn overlay_rejects_mismatched_layer_sizes() {
    let backend = CpuEffectBackend;
    let base = solid([0, 0, 0, 255], 2, 2);
    let layer = solid([1, 1, 1, 255], 3, 3);
    assert!(backend.overlay(&base, &[layer]).is_err());
}

#[test]
fn black_solid_matches_placeholder_color() {
    let placeholder = Image::solid(Color::BLACK, 2, 2);
    assert_eq!(placeholder.pixel(0, 0), [0, 0, 0, 255]);
}
