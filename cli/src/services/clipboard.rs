//! Clipboard hand-off behind a narrow interface.
//!
//! The compositor stays toolkit-free: anything that can accept an RGBA
//! bitmap acts as a sink, and only the system implementation touches the
//! OS clipboard.

use std::borrow::Cow;

use compositor::ComposedImage;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Destination for a composed bitmap.
pub trait ClipboardSink {
    fn put_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), ClipboardError>;
}

/// System clipboard backed by `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

impl ClipboardSink for SystemClipboard {
    fn put_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), ClipboardError> {
        let data = arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Borrowed(rgba),
        };
        self.inner
            .set_image(data)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Place a composed label's bitmap on the sink.
pub fn copy_label(label: &ComposedImage, sink: &mut dyn ClipboardSink) -> Result<(), ClipboardError> {
    sink.put_image(label.width(), label.height(), label.canvas().as_raw())
}
