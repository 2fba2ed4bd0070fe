//! # Capture
//!
//! Flattens the composed canvas into a single pixel buffer. The host sets
//! the session's capture flag; on the next paint pass the driver records the
//! visual subtree into an off-screen layer through the external rasterizer,
//! rasterizes it asynchronously, crops to the last-measured bounds of the
//! base image, and delivers the result through the completion channel before
//! clearing the flag.
//!
//! Delivery is never synchronous with the paint pass that observed the flag;
//! off-screen rasterization is asynchronous on every underlying platform.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use memento_core::Controller;

/// The on-screen bounds to crop the full-canvas buffer to, in logical units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// Capture was requested before the main content region reported its
    /// first layout. The request flag stays set; retry after layout.
    #[error("layout not yet measured")]
    NotReady,
    /// The crop rectangle does not intersect the captured surface.
    #[error("crop region lies outside the captured surface")]
    OutOfBounds,
    /// A raw buffer's length did not match its stated dimensions.
    #[error("pixel data length {got} does not match {expected} for the given size")]
    BufferSize { expected: usize, got: usize },
    /// The external rasterizer failed.
    #[error("rasterizer failed: {0}")]
    Rasterize(#[source] anyhow::Error),
}

/// A flat RGBA8 pixel buffer, the common currency between the rasterizer,
/// the crop step, and the platform image codec.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A transparent-black buffer of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }
    /// Wrap raw RGBA8 bytes, row-major, tightly packed.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CaptureError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
    /// Copy out the sub-rectangle `rect`, with logical units converted to
    /// pixels at `density`. The rectangle is clamped to the buffer; an empty
    /// intersection is an error.
    pub fn crop(&self, rect: CropRect, density: f32) -> Result<Self, CaptureError> {
        let to_px = |v: f32| (v * density).round() as i64;
        let clamp_x = |v: i64| v.clamp(0, i64::from(self.width)) as u32;
        let clamp_y = |v: i64| v.clamp(0, i64::from(self.height)) as u32;
        let x0 = clamp_x(to_px(rect.x));
        let y0 = clamp_y(to_px(rect.y));
        let x1 = clamp_x(to_px(rect.x + rect.width));
        let y1 = clamp_y(to_px(rect.y + rect.height));
        if x1 <= x0 || y1 <= y0 {
            return Err(CaptureError::OutOfBounds);
        }
        let (width, height) = (x1 - x0, y1 - y0);
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in y0..y1 {
            let row = (y as usize * self.width as usize + x0 as usize) * 4;
            data.extend_from_slice(&self.data[row..row + width as usize * 4]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PixelBuffer({}x{})", self.width, self.height)
    }
}

/// Platform handoff of a finished buffer into a native image type.
pub trait EncodeHostImage {
    type Image;
    fn encode(&self, buffer: &PixelBuffer) -> anyhow::Result<Self::Image>;
}

/// An off-screen recording of the visual subtree, ready to rasterize.
/// Rasterization suspends until the layer is fully composited.
#[async_trait::async_trait]
pub trait Layer: Send + 'static {
    async fn rasterize(&self) -> anyhow::Result<PixelBuffer>;
}

/// The external compositing surface. Recording happens synchronously inside
/// a paint pass; the returned [`Layer`] is consumed asynchronously.
pub trait Rasterizer {
    type Layer: Layer;
    fn record(&mut self) -> Self::Layer;
}

/// Everything a finished or failed capture delivers.
pub type CaptureResult = Result<PixelBuffer, CaptureError>;

/// Watches a session's capture flag and runs the record/rasterize/crop/
/// deliver protocol, one capture at a time.
pub struct CaptureDriver<R: Rasterizer> {
    controller: Controller,
    rasterizer: R,
    /// Last-measured bounds of the base image, with the density to convert
    /// them to pixels. Absent until the host reports first layout.
    viewport: Option<(CropRect, f32)>,
    in_flight: Arc<AtomicBool>,
    sender: tokio::sync::mpsc::UnboundedSender<CaptureResult>,
}

impl<R: Rasterizer> CaptureDriver<R> {
    /// The receiver side is the completion channel captures arrive on.
    #[must_use]
    pub fn new(
        controller: Controller,
        rasterizer: R,
    ) -> (Self, tokio::sync::mpsc::UnboundedReceiver<CaptureResult>) {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        (
            Self {
                controller,
                rasterizer,
                viewport: None,
                in_flight: Arc::new(AtomicBool::new(false)),
                sender,
            },
            receiver,
        )
    }
    /// The host reports the measured bounds of the base image subtree.
    /// Must happen at least once before a capture can proceed.
    pub fn set_viewport(&mut self, rect: CropRect, density: f32) {
        self.viewport = Some((rect, density));
    }
    /// Run once per paint pass.
    ///
    /// Observes the capture flag: does nothing when clear, errors with
    /// [`CaptureError::NotReady`] when set before first layout (the flag
    /// stays set for a retry), ignores the request while a capture is
    /// already in flight, and otherwise records and spawns the
    /// rasterize-and-crop task.
    pub fn frame(&mut self) -> Result<(), CaptureError> {
        if !self.controller.snapshot().is_capture_requested() {
            return Ok(());
        }
        if self.in_flight.load(Ordering::Acquire) {
            log::warn!("capture requested while one is in flight, ignoring");
            return Ok(());
        }
        let Some((rect, density)) = self.viewport else {
            return Err(CaptureError::NotReady);
        };
        let layer = self.rasterizer.record();
        self.in_flight.store(true, Ordering::Release);

        let controller = self.controller.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = layer
                .rasterize()
                .await
                .map_err(CaptureError::Rasterize)
                .and_then(|full| full.crop(rect, density));
            // Clear the handshake whether or not the rasterizer delivered;
            // a wedged flag would block every later capture.
            controller.finish_capture();
            in_flight.store(false, Ordering::Release);
            if sender.send(result).is_err() {
                log::warn!("capture finished with no one listening");
            }
        });
        Ok(())
    }
}
