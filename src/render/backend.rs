use crate::compositor::renderer::TransitionState;
use crate::effects::transition::TransitionEffect;
use crate::foundation::core::{MediaTime, PixelFormat, TrackId};
use crate::foundation::error::TransmixResult;
use crate::image::device::Image;
use crate::image::frame::FrameBuffer;

/// Supplies a source frame for a track at a time.
///
/// Implemented by the host pipeline. May return `None` for any track at any
/// time (seek inaccuracies, track gaps); every engine call site tolerates
/// this.
pub trait SourceFrameProvider: Send + Sync {
    /// Fetch the frame of `track` at `time`, if one is available.
    fn source_frame(&self, track: TrackId, time: MediaTime) -> Option<FrameBuffer>;
}

/// Host-owned allocator of destination buffers plus pixel-format attributes.
///
/// The host may swap the active context at any time via
/// [`Compositor::notify_render_context_changed`](crate::Compositor::notify_render_context_changed);
/// the engine always reads the current context when allocating, never a
/// cached one.
pub trait RenderContext: Send + Sync {
    /// Allocate a fresh destination buffer, or `None` when the pool is
    /// exhausted.
    fn new_buffer(&self) -> Option<FrameBuffer>;

    /// Pixel layout of vended buffers.
    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Bgra8
    }

    /// Dimensions of vended buffers.
    fn dimensions(&self) -> (u32, u32);
}

/// The GPU program seam.
///
/// A backend resolves a [`TransitionEffect`]'s fragment identity to an
/// executable program and runs it; the engine never interprets fragment
/// names itself. The crate ships [`CpuEffectBackend`](crate::CpuEffectBackend)
/// as a reference implementation.
pub trait EffectBackend: Send + Sync {
    /// Run the effect over the state's `(input, dest, progress)` triple.
    ///
    /// `None` means the submission produced no output image (unknown
    /// fragment, device loss); the engine surfaces that as
    /// [`CompositeError::RenderFailure`](crate::CompositeError::RenderFailure).
    fn render_transition(&self, effect: &TransitionEffect, state: &TransitionState)
    -> Option<Image>;

    /// Submit `image` for output into the destination buffer.
    fn write_image(&self, image: &Image, dst: &FrameBuffer) -> TransmixResult<()>;

    /// Composite `layers` above `base`, bottom layer first.
    fn overlay(&self, base: &Image, layers: &[Image]) -> TransmixResult<Image>;
}

/// Minimal [`RenderContext`] that allocates fresh fixed-size buffers.
///
/// Suitable for hosts without pooling requirements and for tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedRenderContext {
    width: u32,
    height: u32,
}

impl FixedRenderContext {
    /// Context vending `width`x`height` BGRA8 buffers.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RenderContext for FixedRenderContext {
    fn new_buffer(&self) -> Option<FrameBuffer> {
        Some(FrameBuffer::new(self.width, self.height))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
