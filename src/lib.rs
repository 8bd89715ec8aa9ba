//! Transmix is an asynchronous frame compositor for video transitions.
//!
//! A host editing pipeline submits one [`CompositionRequest`] per
//! presentation timestamp; the engine serializes requests onto a private
//! FIFO render lane, resolves each request's [`CompositionInstruction`],
//! fetches source buffers from the host's [`SourceFrameProvider`], and
//! delegates pixel work to a [`TransitionRenderer`] driving a pluggable
//! [`EffectBackend`]. Each request resolves to exactly one terminal
//! outcome: a produced frame, a typed [`CompositeError`], or a
//! cancellation.
//!
//! - Build a [`CompositionInstruction`] per timeline segment (passthrough
//!   or two-source transition, plus optional per-frame hooks)
//! - Create a [`Compositor`] over an [`EffectBackend`] and a
//!   [`RenderContext`]
//! - Submit requests; cancel pending work with
//!   [`Compositor::cancel_all_pending`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compositor;
mod effects;
mod foundation;
mod image;
mod render;

pub use crate::foundation::core::{
    Color, MediaTime, PixelFormat, TimeRange, TrackId, tween_factor,
};
pub use crate::foundation::error::{CompositeError, TransmixError, TransmixResult};

pub use crate::compositor::engine::{
    CompletionHandler, CompositionOutcome, CompositionRequest, Compositor,
};
pub use crate::compositor::instruction::{
    BufferProducedHook, CompositionInstruction, FrameTransform, PostTransform,
    SkipBufferProvider,
};
pub use crate::compositor::renderer::{TransitionRenderer, TransitionState};
pub use crate::effects::transition::TransitionEffect;
pub use crate::effects::value::{ScalarType, Value, VectorValue};
pub use crate::image::device::Image;
pub use crate::image::frame::FrameBuffer;
pub use crate::render::backend::{
    EffectBackend, FixedRenderContext, RenderContext, SourceFrameProvider,
};
pub use crate::render::cpu::{CROSSFADE_FRAGMENT, CpuEffectBackend, WIPE_FRAGMENT};
