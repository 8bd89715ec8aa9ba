use std::fmt;
use std::sync::{Arc, Mutex};

use crate::foundation::core::{PixelFormat, lock_unpoisoned};
use crate::foundation::error::{TransmixError, TransmixResult};

/// Host-side pixel buffer used as a frame source or render destination.
///
/// Cheap to clone: clones share the same pixel storage. The engine writes
/// destination pixels only on the render lane, before the request's
/// completion is delivered; the host reads them afterwards via
/// [`FrameBuffer::with_pixels`].
#[derive(Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Arc<Mutex<Vec<u8>>>,
}

impl FrameBuffer {
    /// Allocate a zero-filled BGRA8 buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * PixelFormat::Bgra8.bytes_per_pixel();
        Self {
            width,
            height,
            format: PixelFormat::Bgra8,
            data: Arc::new(Mutex::new(vec![0u8; len])),
        }
    }

    /// Wrap existing BGRA8 pixel data.
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
            format: PixelFormat::Bgra8,
            data: Arc::new(Mutex::new(data)),
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout of the storage.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Run `f` over the current pixel contents.
    pub fn with_pixels<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let guard = lock_unpoisoned(&self.data);
        f(&guard)
    }

    /// Replace the full pixel contents. `src` must match the buffer size.
    pub(crate) fn write_pixels(&self, src: &[u8]) -> TransmixResult<()> {
        let mut guard = lock_unpoisoned(&self.data);
        if guard.len() != src.len() {
            return Err(TransmixError::validation(format!(
                "pixel write length {} does not match buffer length {}",
                src.len(),
                guard.len()
            )));
        }
        guard.copy_from_slice(src);
        Ok(())
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
