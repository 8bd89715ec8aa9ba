use std::sync::Arc;

use crate::compositor::instruction::{FrameTransform, PostTransform};
use crate::effects::transition::TransitionEffect;
use crate::foundation::core::Color;
use crate::foundation::error::TransmixResult;
use crate::image::device::Image;
use crate::image::frame::FrameBuffer;
use crate::render::backend::EffectBackend;

/// Mutable per-render scratch handed to the effect backend.
///
/// Holds at most one input image, one destination image, and the progress
/// scalar. Cleared immediately after every two-source render so large
/// device-backed images are not retained between frames.
#[derive(Debug, Default)]
pub struct TransitionState {
    input: Option<Image>,
    dest: Option<Image>,
    progress: f32,
}

impl TransitionState {
    /// Outgoing side of the blend, if assigned.
    pub fn input(&self) -> Option<&Image> {
        self.input.as_ref()
    }

    /// Incoming side of the blend, if assigned.
    pub fn dest(&self) -> Option<&Image> {
        self.dest.as_ref()
    }

    /// Progress scalar; nominally in `[0, 1]` but not enforced.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub(crate) fn assign(&mut self, input: Option<Image>, dest: Option<Image>, progress: f32) {
        self.input = input;
        self.dest = dest;
        self.progress = progress;
    }

    fn clear(&mut self) {
        self.input = None;
        self.dest = None;
    }
}

/// Stateful wrapper around one transition effect.
///
/// Given foreground/background buffers and a tween factor, drives the effect
/// backend and writes a composed result into a destination buffer. The
/// engine rebuilds the renderer whenever a transition-class instruction
/// declares a different effect identity.
pub struct TransitionRenderer {
    effect: Arc<TransitionEffect>,
    state: TransitionState,
}

impl TransitionRenderer {
    /// Bind a renderer to `effect`.
    pub fn new(effect: Arc<TransitionEffect>) -> Self {
        Self {
            effect,
            state: TransitionState::default(),
        }
    }

    /// The bound effect; its identity decides hot-swaps.
    pub fn effect(&self) -> &TransitionEffect {
        &self.effect
    }

    /// Single-source render: build an image from `foreground`, apply the
    /// transform if present, and submit it into `dst`.
    pub fn render_passthrough(
        &self,
        dst: &FrameBuffer,
        foreground: &FrameBuffer,
        transform: Option<&FrameTransform>,
        tween: f32,
        backend: &dyn EffectBackend,
    ) -> TransmixResult<()> {
        let image = Image::from_buffer(foreground);
        let image = match transform {
            Some(transform) => transform(image, tween),
            None => image,
        };
        backend.write_image(&image, dst)
    }

    /// Two-source render. Returns `Ok(true)` when pixels were written into
    /// `dst`, `Ok(false)` when the effect produced no output image.
    ///
    /// A side with no buffer stays empty; if exactly one side ends up empty
    /// it is replaced by a solid black placeholder sized to the other side
    /// (a transition is never rendered with one side of unknown size). The
    /// effect output is vertically re-oriented into buffer space before the
    /// post transform runs.
    #[allow(clippy::too_many_arguments)]
    pub fn render_transition(
        &mut self,
        dst: &FrameBuffer,
        foreground: Option<&FrameBuffer>,
        foreground_transform: Option<&FrameTransform>,
        background: Option<&FrameBuffer>,
        background_transform: Option<&FrameTransform>,
        post_transform: Option<&PostTransform>,
        tween: f32,
        backend: &dyn EffectBackend,
    ) -> TransmixResult<bool> {
        let input = foreground.map(|buffer| {
            let image = Image::from_buffer(buffer);
            match foreground_transform {
                Some(transform) => transform(image, tween),
                None => image,
            }
        });
        let dest = background.map(|buffer| {
            let image = Image::from_buffer(buffer);
            match background_transform {
                Some(transform) => transform(image, tween),
                None => image,
            }
        });

        let (input, dest) = match (input, dest) {
            (None, Some(dest)) => {
                let (w, h) = dest.size();
                (Some(Image::solid(Color::BLACK, w, h)), Some(dest))
            }
            (Some(input), None) => {
                let (w, h) = input.size();
                let placeholder = Image::solid(Color::BLACK, w, h);
                (Some(input), Some(placeholder))
            }
            other => other,
        };

        self.state.assign(input, dest, tween);
        let output = backend.render_transition(&self.effect, &self.state);

        let result = match output {
            Some(output) => {
                let mut output = output.oriented_down_mirrored();
                if let Some(post) = post_transform {
                    output = post(output);
                }
                backend.write_image(&output, dst).map(|()| true)
            }
            None => Ok(false),
        };

        // Release device image references regardless of the outcome.
        self.state.clear();
        result
    }
}
