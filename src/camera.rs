// Frame sources. The real one opens a webcam through nokhwa; tests plug in their own.
// Visual expectation: each `next_frame()` is one fresh RGB picture of what the camera sees.

use image::RgbImage;

use crate::error::{Error, Result};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Anything that can hand the session one RGB frame per tick.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<RgbImage>;
}

// A small wrapper around nokhwa::Camera. Holding it means holding the device.
pub struct CameraCapture {
    cam: Camera,
}

impl CameraCapture {
    /// Open camera `index` at a target resolution (falls back to the closest mode).
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera {index}: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream might settle on a slightly different resolution; frames get rescaled.
        let actual = cam.resolution();
        log::info!(
            "camera {index} streaming at {}x{} (requested {width}x{height})",
            actual.width(),
            actual.height()
        );

        Ok(Self { cam })
    }
}

impl FrameSource for CameraCapture {
    /// Blocks until the camera has a new frame, then decodes it to RGB.
    fn next_frame(&mut self) -> Result<RgbImage> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            log::warn!("stopping camera stream: {e}");
        }
        log::info!("camera released");
    }
}
