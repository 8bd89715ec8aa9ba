use std::fmt;
use std::sync::Arc;

use crate::foundation::core::Color;
use crate::foundation::error::{TransmixError, TransmixResult};
use crate::image::frame::FrameBuffer;

/// Immutable device image used as transition input and output.
///
/// The engine-side analog of a texture handle: a snapshot of BGRA8 pixels
/// that is cheap to clone and safe to hold across hook invocations. Hooks
/// and the effect backend consume and produce `Image` values; destination
/// writes go back through [`FrameBuffer`].
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Image {
    /// Snapshot a source buffer. Alpha is forced opaque: source frames are
    /// video frames, which carry no meaningful alpha.
    pub fn from_buffer(buffer: &FrameBuffer) -> Self {
        let mut data = buffer.with_pixels(|px| px.to_vec());
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width: buffer.width(),
            height: buffer.height(),
            data: data.into(),
        }
    }

    /// Build a solid single-color image, used as the placeholder when one
    /// blend side has no buffer.
    pub fn solid(color: Color, width: u32, height: u32) -> Self {
        let px = color.to_bgra8();
        let len = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(len * 4);
        for _ in 0..len {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    /// Wrap raw BGRA8 pixel data.
    pub fn from_bgra8(width: u32, height: u32, data: Vec<u8>) -> TransmixResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(TransmixError::validation(format!(
                "pixel data length {} does not match {width}x{height} BGRA8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: data.into(),
        })
    }

    /// Internal constructor for math paths that preserve length invariants.
    pub(crate) fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw BGRA8 pixels, row-major, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// One pixel as `[b, g, r, a]`. Panics outside the image bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Return a vertically mirrored copy.
    ///
    /// Transition output space is vertically mirrored relative to buffer
    /// space; the renderer applies this correction exactly once per blended
    /// frame.
    pub fn oriented_down_mirrored(&self) -> Image {
        let row_len = (self.width as usize) * 4;
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(row_len).rev() {
            data.extend_from_slice(row);
        }
        Self {
            width: self.width,
            height: self.height,
            data: data.into(),
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
