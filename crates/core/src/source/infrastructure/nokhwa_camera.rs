use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::{Camera, NokhwaError};

use crate::shared::frame::Frame;
use crate::source::domain::video_source::{
    SourceConstraints, SourceError, SourceProvider, VideoSource,
};

/// Webcam stream backed by `nokhwa`.
pub struct NokhwaCameraSource {
    camera: Camera,
    active: bool,
}

impl VideoSource for NokhwaCameraSource {
    fn read_frame(&mut self) -> Result<Frame, SourceError> {
        if !self.active {
            return Err(SourceError::Stream("stream already stopped".to_string()));
        }
        let buffer = self
            .camera
            .frame()
            .map_err(|e| SourceError::Stream(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| SourceError::Stream(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());
        Ok(Frame::new(decoded.into_raw(), width, height))
    }

    fn resolution(&self) -> (u32, u32) {
        let r = self.camera.resolution();
        (r.width(), r.height())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("failed to stop camera stream: {e}");
        }
        self.active = false;
    }
}

impl Drop for NokhwaCameraSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Opens webcam streams by device index.
pub struct NokhwaSourceProvider {
    index: u32,
}

impl NokhwaSourceProvider {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

impl SourceProvider for NokhwaSourceProvider {
    fn acquire(
        &self,
        constraints: &SourceConstraints,
    ) -> Result<Box<dyn VideoSource>, SourceError> {
        let format = CameraFormat::new(
            Resolution::new(constraints.width, constraints.height),
            FrameFormat::MJPEG,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let mut camera =
            Camera::new(CameraIndex::Index(self.index), requested).map_err(classify_error)?;
        camera.open_stream().map_err(classify_error)?;

        log::info!(
            "opened camera '{}' at {}",
            camera.info().human_name(),
            camera.camera_format()
        );

        Ok(Box::new(NokhwaCameraSource {
            camera,
            active: true,
        }))
    }
}

/// `nokhwa` reports platform permission failures only in message text, so
/// classification is by message rather than variant.
fn classify_error(err: NokhwaError) -> SourceError {
    let text = err.to_string().to_lowercase();
    if text.contains("permission") || text.contains("denied") || text.contains("not authorized") {
        SourceError::PermissionDenied
    } else {
        SourceError::DeviceUnavailable
    }
}
