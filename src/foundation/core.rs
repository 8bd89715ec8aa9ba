use std::sync::{Mutex, MutexGuard};

use crate::foundation::error::{TransmixError, TransmixResult};

/// Persistent identifier of a source track within the host timeline.
///
/// Opaque to the engine: it is only ever forwarded to the host's
/// [`SourceFrameProvider`](crate::SourceFrameProvider).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TrackId(pub i32);

impl TrackId {
    /// Reserved id meaning "no track".
    pub const INVALID: TrackId = TrackId(0);

    /// Return `true` when the id refers to an actual track.
    pub fn is_valid(self) -> bool {
        self.0 != TrackId::INVALID.0
    }
}

/// Rational media timestamp: `value / timescale` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MediaTime {
    /// Tick count.
    pub value: i64,
    /// Ticks per second, must be non-zero.
    pub timescale: u32,
}

impl MediaTime {
    /// Zero timestamp at the conventional 600-tick timescale.
    pub const ZERO: MediaTime = MediaTime {
        value: 0,
        timescale: 600,
    };

    /// Create a validated timestamp.
    pub fn new(value: i64, timescale: u32) -> TransmixResult<Self> {
        if timescale == 0 {
            return Err(TransmixError::validation("MediaTime timescale must be > 0"));
        }
        Ok(Self { value, timescale })
    }

    /// Convert to floating-point seconds.
    pub fn seconds(self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }

    /// Build a timestamp from seconds at the given timescale, rounding to
    /// the nearest tick.
    pub fn from_seconds(secs: f64, timescale: u32) -> TransmixResult<Self> {
        if timescale == 0 {
            return Err(TransmixError::validation("MediaTime timescale must be > 0"));
        }
        Ok(Self {
            value: (secs * f64::from(timescale)).round() as i64,
            timescale,
        })
    }
}

/// Validity window of a composition instruction: start plus duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeRange {
    /// Window start.
    pub start: MediaTime,
    /// Window length; always strictly positive by construction.
    pub duration: MediaTime,
}

impl TimeRange {
    /// Create a validated range with `duration > 0`.
    pub fn new(start: MediaTime, duration: MediaTime) -> TransmixResult<Self> {
        if duration.seconds() <= 0.0 {
            return Err(TransmixError::validation("TimeRange duration must be > 0"));
        }
        Ok(Self { start, duration })
    }

    /// Window end (`start + duration`), in seconds.
    pub fn end_seconds(self) -> f64 {
        self.start.seconds() + self.duration.seconds()
    }
}

/// Normalized progress of `time` within `range`.
///
/// `0.0` at `range.start`, `1.0` at the end of the window. The result is
/// deliberately **not** clamped: times outside the window yield values
/// outside `[0, 1]` and are passed through to the effect backend as-is.
pub fn tween_factor(time: MediaTime, range: TimeRange) -> f64 {
    (time.seconds() - range.start.seconds()) / range.duration.seconds()
}

/// Pixel layout of source and destination buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// 8-bit blue/green/red/alpha, the only format the engine vends.
    Bgra8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 => 4,
        }
    }
}

/// Solid fill color used for placeholder frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black, the fill used when one blend side is missing.
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Channel order matching [`PixelFormat::Bgra8`].
    pub fn to_bgra8(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

/// Lock a mutex, recovering the guard if a previous holder panicked.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
