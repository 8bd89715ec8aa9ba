use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::compositor::instruction::CompositionInstruction;
use crate::compositor::renderer::TransitionRenderer;
use crate::foundation::core::{MediaTime, PixelFormat, lock_unpoisoned, tween_factor};
use crate::foundation::error::{CompositeError, TransmixResult};
use crate::image::device::Image;
use crate::image::frame::FrameBuffer;
use crate::render::backend::{EffectBackend, RenderContext, SourceFrameProvider};

/// Terminal outcome delivered to the host for one composition request.
pub type CompositionOutcome = Result<FrameBuffer, CompositeError>;

/// Completion callback; invoked exactly once per request, on the render
/// lane.
pub type CompletionHandler = Box<dyn FnOnce(CompositionOutcome) + Send>;

/// One per-frame composition request submitted by the host.
pub struct CompositionRequest {
    /// Presentation timestamp being composed.
    pub time: MediaTime,
    /// Instruction describing the frame's sources, effect, and hooks.
    pub instruction: Arc<CompositionInstruction>,
    /// Accessor for per-track source buffers at `time`.
    pub source: Arc<dyn SourceFrameProvider>,
    /// Receives the terminal outcome: a produced buffer, a typed failure,
    /// or a cancellation. Never called twice, never skipped.
    pub completion: CompletionHandler,
}

enum LaneItem {
    Render(CompositionRequest),
    ClearCancel,
}

struct ControlState {
    cancel_all: bool,
    context: Arc<dyn RenderContext>,
    context_changed: bool,
}

/// Top-level frame compositor and request scheduler.
///
/// The host calls [`Compositor::submit`] once per frame; requests are
/// serialized onto a private FIFO render lane (a dedicated worker thread)
/// that processes one request at a time. A separate control lane (a mutex
/// over shared state) holds the cancellation flag and the active render
/// context; no public operation blocks the calling thread.
///
/// Dropping the compositor closes the lane, drains already-queued requests,
/// and joins the worker.
pub struct Compositor {
    lane: Option<Sender<LaneItem>>,
    control: Arc<Mutex<ControlState>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Compositor {
    /// Spawn the render lane against `backend`, allocating destination
    /// buffers from `context` until the host swaps it. Fails only when the
    /// worker thread cannot be spawned.
    pub fn new(
        backend: Arc<dyn EffectBackend>,
        context: Arc<dyn RenderContext>,
    ) -> TransmixResult<Self> {
        let (lane, rx) = unbounded::<LaneItem>();
        let control = Arc::new(Mutex::new(ControlState {
            cancel_all: false,
            context,
            context_changed: false,
        }));

        let worker_control = Arc::clone(&control);
        let worker = thread::Builder::new()
            .name("transmix-render-lane".to_string())
            .spawn(move || render_lane(rx, worker_control, backend))
            .map_err(|err| anyhow::Error::new(err).context("spawning the render lane thread"))?;

        Ok(Self {
            lane: Some(lane),
            control,
            worker: Some(worker),
        })
    }

    /// Pixel layout required of source buffers.
    pub fn source_pixel_format(&self) -> PixelFormat {
        PixelFormat::Bgra8
    }

    /// Pixel layout of buffers the engine renders into.
    pub fn required_pixel_format(&self) -> PixelFormat {
        PixelFormat::Bgra8
    }

    /// Enqueue a per-frame composition request and return immediately.
    ///
    /// The request's completion is eventually invoked with exactly one
    /// terminal outcome. Submissions may arrive from multiple threads; they
    /// complete in submission order.
    #[tracing::instrument(skip(self, request), fields(time = request.time.seconds()))]
    pub fn submit(&self, request: CompositionRequest) {
        let Some(lane) = &self.lane else {
            (request.completion)(Err(CompositeError::Cancelled));
            return;
        };
        if let Err(crossbeam_channel::SendError(item)) = lane.send(LaneItem::Render(request)) {
            // Lane already shut down: still honor the one-completion
            // contract.
            if let LaneItem::Render(request) = item {
                (request.completion)(Err(CompositeError::Cancelled));
            }
        }
    }

    /// Replace the active render context and flag the change.
    ///
    /// The engine reads the current context on every allocation, so the flag
    /// is advisory bookkeeping rather than a synchronization point.
    pub fn notify_render_context_changed(&self, context: Arc<dyn RenderContext>) {
        let mut control = lock_unpoisoned(&self.control);
        control.context = context;
        control.context_changed = true;
    }

    /// Cancel every request queued at the moment of the call, then resume
    /// accepting work. Returns without blocking.
    ///
    /// The cancellation flag is set synchronously on the control lane; a
    /// flag-clearing item is then enqueued on the render lane behind the
    /// already-queued requests, so the window covers exactly those requests.
    /// A request submitted afterwards renders normally once the clearing
    /// item executes. Requests already mid-render are not interrupted.
    pub fn cancel_all_pending(&self) {
        lock_unpoisoned(&self.control).cancel_all = true;
        if let Some(lane) = &self.lane {
            let _ = lane.send(LaneItem::ClearCancel);
        }
    }
}

impl Drop for Compositor {
    fn drop(&mut self) {
        // Closing the sender ends the worker's receive loop once the queue
        // drains.
        self.lane.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn render_lane(
    rx: Receiver<LaneItem>,
    control: Arc<Mutex<ControlState>>,
    backend: Arc<dyn EffectBackend>,
) {
    let mut renderer: Option<TransitionRenderer> = None;

    while let Ok(item) = rx.recv() {
        match item {
            LaneItem::ClearCancel => {
                lock_unpoisoned(&control).cancel_all = false;
            }
            LaneItem::Render(request) => {
                if lock_unpoisoned(&control).cancel_all {
                    (request.completion)(Err(CompositeError::Cancelled));
                    continue;
                }
                let CompositionRequest {
                    time,
                    instruction,
                    source,
                    completion,
                } = request;
                let outcome = render_request(
                    time,
                    &instruction,
                    source.as_ref(),
                    &control,
                    &backend,
                    &mut renderer,
                );
                completion(outcome);
            }
        }
    }
}

/// Decide whether the active renderer must be rebuilt for `instruction`.
///
/// Only transition-class instructions exercise the blend path, so only they
/// are compared against the active effect identity.
pub(crate) fn needs_renderer_swap(
    renderer: Option<&TransitionRenderer>,
    instruction: &CompositionInstruction,
) -> bool {
    if !instruction.is_transition() {
        return false;
    }
    match renderer {
        Some(renderer) => renderer.effect() != instruction.effect().as_ref(),
        None => true,
    }
}

fn current_context(control: &Mutex<ControlState>) -> Arc<dyn RenderContext> {
    Arc::clone(&lock_unpoisoned(control).context)
}

fn render_request(
    time: MediaTime,
    instruction: &Arc<CompositionInstruction>,
    source: &dyn SourceFrameProvider,
    control: &Mutex<ControlState>,
    backend: &Arc<dyn EffectBackend>,
    renderer: &mut Option<TransitionRenderer>,
) -> CompositionOutcome {
    let tween = tween_factor(time, instruction.time_range()) as f32;

    // Dead-frame mitigation: a caller-supplied buffer bypasses compositing
    // for this frame entirely.
    if let Some(skipped) = instruction.skip_buffer(time) {
        return Ok(skipped);
    }

    let foreground = if instruction.ignore_input() {
        None
    } else {
        instruction
            .foreground_track()
            .and_then(|track| source.source_frame(track, time))
    };

    let mut layer_images = Vec::new();
    for track in instruction.layered_foreground_tracks() {
        if let Some(buffer) = source.source_frame(*track, time) {
            layer_images.push(Image::from_buffer(&buffer));
        }
    }
    if !layer_images.is_empty() {
        instruction.ensure_layered_wrap(Arc::clone(backend));
    }
    instruction.set_current_layer_images(layer_images);

    let outcome = if instruction.is_transition() {
        render_blend(
            time,
            instruction,
            foreground,
            source,
            control,
            backend,
            renderer,
            tween,
        )
    } else {
        render_passthrough(instruction, foreground, control, backend, renderer, tween)
    };

    // Acknowledge a context swap once a frame has gone through it.
    {
        let mut control = lock_unpoisoned(control);
        if control.context_changed {
            control.context_changed = false;
        }
    }

    outcome
}

fn render_passthrough(
    instruction: &Arc<CompositionInstruction>,
    foreground: Option<FrameBuffer>,
    control: &Mutex<ControlState>,
    backend: &Arc<dyn EffectBackend>,
    renderer: &mut Option<TransitionRenderer>,
    tween: f32,
) -> CompositionOutcome {
    let context = current_context(control);

    let (dst, base) = if instruction.ignore_input() {
        let Some(dst) = context.new_buffer() else {
            tracing::debug!("buffer allocation failure (passthrough, ignore_input)");
            return Err(CompositeError::AllocationFailure);
        };
        // The blank destination doubles as the foreground base; the hook is
        // expected to synthesize an image from nothing.
        let base = dst.clone();
        (dst, base)
    } else {
        let Some(foreground) = foreground else {
            tracing::debug!("no foreground pixel buffer (passthrough)");
            return Err(CompositeError::MissingSourceBuffer);
        };
        let Some(dst) = context.new_buffer() else {
            tracing::debug!("buffer allocation failure (passthrough)");
            return Err(CompositeError::AllocationFailure);
        };
        (dst, foreground)
    };

    // Passthrough never triggers an effect swap; reuse the active renderer
    // or bind one lazily.
    let active = renderer
        .get_or_insert_with(|| TransitionRenderer::new(Arc::clone(instruction.effect())));

    let transform = instruction.foreground_transform();
    if let Err(err) = active.render_passthrough(
        &dst,
        &base,
        transform.as_ref(),
        tween,
        backend.as_ref(),
    ) {
        tracing::warn!(%err, "passthrough render failed");
        return Err(CompositeError::RenderFailure);
    }

    instruction.notify_buffer_produced(&dst);
    Ok(dst)
}

#[allow(clippy::too_many_arguments)]
fn render_blend(
    time: MediaTime,
    instruction: &Arc<CompositionInstruction>,
    foreground: Option<FrameBuffer>,
    source: &dyn SourceFrameProvider,
    control: &Mutex<ControlState>,
    backend: &Arc<dyn EffectBackend>,
    renderer: &mut Option<TransitionRenderer>,
    tween: f32,
) -> CompositionOutcome {
    let background = instruction
        .background_track()
        .and_then(|track| source.source_frame(track, time));

    if foreground.is_none() && background.is_none() {
        tracing::debug!("no foreground or background source buffer (blend)");
        return Err(CompositeError::MissingSourceBuffer);
    }

    let context = current_context(control);
    let Some(dst) = context.new_buffer() else {
        tracing::debug!("buffer allocation failure (blend)");
        return Err(CompositeError::AllocationFailure);
    };

    if needs_renderer_swap(renderer.as_ref(), instruction) {
        tracing::debug!(
            fragment = instruction.effect().fragment_name(),
            "rebinding transition renderer"
        );
        *renderer = None;
    }
    let active = renderer
        .get_or_insert_with(|| TransitionRenderer::new(Arc::clone(instruction.effect())));

    let fg_transform = instruction.foreground_transform();
    let bg_transform = instruction.background_transform();
    let post_transform = instruction.post_transform();
    match active.render_transition(
        &dst,
        foreground.as_ref(),
        fg_transform.as_ref(),
        background.as_ref(),
        bg_transform.as_ref(),
        post_transform.as_ref(),
        tween,
        backend.as_ref(),
    ) {
        Ok(true) => {
            instruction.notify_buffer_produced(&dst);
            Ok(dst)
        }
        Ok(false) => {
            tracing::debug!(
                fragment = instruction.effect().fragment_name(),
                "effect produced no output image"
            );
            Err(CompositeError::RenderFailure)
        }
        Err(err) => {
            tracing::warn!(%err, "blend render failed");
            Err(CompositeError::RenderFailure)
        }
    }
}
