use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use crate::effects::transition::TransitionEffect;
use crate::foundation::core::{MediaTime, TimeRange, TrackId, lock_unpoisoned};
use crate::image::device::Image;
use crate::image::frame::FrameBuffer;
use crate::render::backend::EffectBackend;

/// Per-frame image hook: `(image, tween) -> image`.
///
/// Pure by contract: stored by reference and invoked synchronously on the
/// render lane.
pub type FrameTransform = Arc<dyn Fn(Image, f32) -> Image + Send + Sync>;

/// Post-blend hook applied to the composed output: `(image) -> image`.
pub type PostTransform = Arc<dyn Fn(Image) -> Image + Send + Sync>;

/// Dead-frame mitigation hook.
///
/// When it returns a buffer, compositing for that frame is bypassed entirely
/// and the buffer is delivered as the request's result. Used by hosts to
/// mask known timing/seek inaccuracies with a cached frame.
pub type SkipBufferProvider =
    Arc<dyn Fn(&CompositionInstruction, MediaTime) -> Option<FrameBuffer> + Send + Sync>;

/// Side-effecting observer invoked with every buffer an instruction
/// successfully produces.
pub type BufferProducedHook = Arc<dyn Fn(&FrameBuffer) + Send + Sync>;

struct ForegroundHook {
    transform: Option<FrameTransform>,
    layered_wrap_done: bool,
}

/// Describes how to compose one timeline segment's frames.
///
/// Carries the participating tracks, the validity window, the selected
/// effect, and optional per-frame hooks. No rendering logic lives here; the
/// [`Compositor`](crate::Compositor) reads the instruction to decide which
/// tracks to fetch, whether the frame is a blend or a passthrough, and which
/// hooks to run.
///
/// Immutable after construction except for the foreground hook, which is
/// wrapped exactly once when layered foreground tracks first contribute
/// buffers (see [`CompositionInstruction::layered_foreground_tracks`]).
pub struct CompositionInstruction {
    foreground_track: Option<TrackId>,
    background_track: Option<TrackId>,
    layered_foreground_tracks: Vec<TrackId>,
    required_source_tracks: Vec<TrackId>,
    time_range: TimeRange,
    effect: Arc<TransitionEffect>,
    foreground: Mutex<ForegroundHook>,
    background_transform: Option<FrameTransform>,
    post_transform: Option<PostTransform>,
    skip_buffer_provider: Option<SkipBufferProvider>,
    on_buffer_produced: Option<BufferProducedHook>,
    ignore_input: bool,
    enable_post_processing: bool,
    contains_tweening: bool,
    // Layer images for the frame currently being rendered. Refreshed by the
    // engine before each render; read by the wrapped foreground hook.
    current_layer_images: Mutex<Vec<Image>>,
}

impl CompositionInstruction {
    /// Single-source instruction: the track's frames pass through, possibly
    /// transformed. Never exercises the blend path.
    pub fn passthrough(track: TrackId, time_range: TimeRange) -> Self {
        Self {
            foreground_track: Some(track),
            background_track: None,
            layered_foreground_tracks: Vec::new(),
            required_source_tracks: vec![track],
            time_range,
            // Inert for passthrough; kept so every instruction has a uniform
            // shape.
            effect: Arc::new(TransitionEffect::crossfade()),
            foreground: Mutex::new(ForegroundHook {
                transform: None,
                layered_wrap_done: false,
            }),
            background_transform: None,
            post_transform: None,
            skip_buffer_provider: None,
            on_buffer_produced: None,
            ignore_input: false,
            enable_post_processing: false,
            contains_tweening: false,
            current_layer_images: Mutex::new(Vec::new()),
        }
    }

    /// Two-source blend instruction: `foreground` transitions into
    /// `background` under `effect` across `time_range`.
    pub fn transition(
        foreground: TrackId,
        background: TrackId,
        time_range: TimeRange,
        effect: Arc<TransitionEffect>,
    ) -> Self {
        Self {
            foreground_track: Some(foreground),
            background_track: Some(background),
            layered_foreground_tracks: Vec::new(),
            required_source_tracks: vec![foreground, background],
            time_range,
            effect,
            foreground: Mutex::new(ForegroundHook {
                transform: None,
                layered_wrap_done: false,
            }),
            background_transform: None,
            post_transform: None,
            skip_buffer_provider: None,
            on_buffer_produced: None,
            ignore_input: false,
            enable_post_processing: false,
            contains_tweening: true,
            current_layer_images: Mutex::new(Vec::new()),
        }
    }

    /// Add extra tracks composited above the foreground, bottom first.
    pub fn with_layered_foreground_tracks(mut self, tracks: Vec<TrackId>) -> Self {
        self.required_source_tracks.extend(tracks.iter().copied());
        self.layered_foreground_tracks = tracks;
        self
    }

    /// Set the foreground transform hook.
    pub fn with_foreground_transform(self, transform: FrameTransform) -> Self {
        lock_unpoisoned(&self.foreground).transform = Some(transform);
        self
    }

    /// Set the background transform hook.
    pub fn with_background_transform(mut self, transform: FrameTransform) -> Self {
        self.background_transform = Some(transform);
        self
    }

    /// Set the post-blend transform hook.
    pub fn with_post_transform(mut self, transform: PostTransform) -> Self {
        self.post_transform = Some(transform);
        self
    }

    /// Set the dead-frame mitigation hook.
    pub fn with_skip_buffer_provider(mut self, provider: SkipBufferProvider) -> Self {
        self.skip_buffer_provider = Some(provider);
        self
    }

    /// Set the produced-buffer observer.
    pub fn with_on_buffer_produced(mut self, hook: BufferProducedHook) -> Self {
        self.on_buffer_produced = Some(hook);
        self
    }

    /// When `true`, the instruction synthesizes output without reading the
    /// foreground track at all; the foreground transform is expected to
    /// produce an image from an empty base.
    pub fn with_ignore_input(mut self, ignore: bool) -> Self {
        self.ignore_input = ignore;
        self
    }

    /// Track composited below everything else, if any.
    pub fn foreground_track(&self) -> Option<TrackId> {
        self.foreground_track
    }

    /// Track the foreground transitions into, if any.
    pub fn background_track(&self) -> Option<TrackId> {
        self.background_track
    }

    /// Extra tracks composited above the foreground.
    pub fn layered_foreground_tracks(&self) -> &[TrackId] {
        &self.layered_foreground_tracks
    }

    /// All tracks the host must make available for this instruction.
    pub fn required_source_tracks(&self) -> &[TrackId] {
        &self.required_source_tracks
    }

    /// Validity window of the instruction.
    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    /// The selected transition effect, shared by value semantics.
    pub fn effect(&self) -> &Arc<TransitionEffect> {
        &self.effect
    }

    /// `true` when the instruction is a true two-source blend rather than a
    /// single effective source: the count of required tracks minus the count
    /// of layered tracks exceeds one.
    pub fn is_transition(&self) -> bool {
        self.required_source_tracks.len() - self.layered_foreground_tracks.len() > 1
    }

    /// Whether the foreground track is read at all.
    pub fn ignore_input(&self) -> bool {
        self.ignore_input
    }

    /// Whether the host should run its post-processing over this segment.
    pub fn enable_post_processing(&self) -> bool {
        self.enable_post_processing
    }

    /// Whether frames within the window differ over time.
    pub fn contains_tweening(&self) -> bool {
        self.contains_tweening
    }

    pub(crate) fn skip_buffer(&self, time: MediaTime) -> Option<FrameBuffer> {
        self.skip_buffer_provider
            .as_ref()
            .and_then(|provider| provider(self, time))
    }

    pub(crate) fn notify_buffer_produced(&self, buffer: &FrameBuffer) {
        if let Some(hook) = &self.on_buffer_produced {
            hook(buffer);
        }
    }

    pub(crate) fn foreground_transform(&self) -> Option<FrameTransform> {
        lock_unpoisoned(&self.foreground).transform.clone()
    }

    pub(crate) fn background_transform(&self) -> Option<FrameTransform> {
        self.background_transform.clone()
    }

    pub(crate) fn post_transform(&self) -> Option<PostTransform> {
        self.post_transform.clone()
    }

    pub(crate) fn set_current_layer_images(&self, images: Vec<Image>) {
        *lock_unpoisoned(&self.current_layer_images) = images;
    }

    fn current_layer_images(&self) -> Vec<Image> {
        lock_unpoisoned(&self.current_layer_images).clone()
    }

    /// Wrap the foreground transform so it also composites the current
    /// frame's layer images above the base image. Runs at most once per
    /// instruction; overlay failure falls back to the unwrapped image
    /// instead of failing the request.
    pub(crate) fn ensure_layered_wrap(self: &Arc<Self>, backend: Arc<dyn EffectBackend>) {
        let mut hook = lock_unpoisoned(&self.foreground);
        if hook.layered_wrap_done {
            return;
        }
        hook.layered_wrap_done = true;

        let inner = hook.transform.take();
        let weak: Weak<CompositionInstruction> = Arc::downgrade(self);
        hook.transform = Some(Arc::new(move |image: Image, tween: f32| {
            let base = match &inner {
                Some(transform) => transform(image, tween),
                None => image,
            };
            let Some(instruction) = weak.upgrade() else {
                return base;
            };
            let layers = instruction.current_layer_images();
            if layers.is_empty() {
                return base;
            }
            match backend.overlay(&base, &layers) {
                Ok(composed) => composed,
                Err(err) => {
                    tracing::warn!(%err, "multilayer overlay failed, using base image");
                    base
                }
            }
        }));
    }
}

impl fmt::Debug for CompositionInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionInstruction")
            .field("foreground_track", &self.foreground_track)
            .field("background_track", &self.background_track)
            .field("layered_foreground_tracks", &self.layered_foreground_tracks)
            .field("required_source_tracks", &self.required_source_tracks)
            .field("time_range", &self.time_range)
            .field("effect", &self.effect.fragment_name())
            .field("ignore_input", &self.ignore_input)
            .field("is_transition", &self.is_transition())
            .finish_non_exhaustive()
    }
}
