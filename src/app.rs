//! Per-frame driver.
//!
//! [`FrameLoop`] is the context object a display loop owns: it holds the
//! camera, the shape, the framebuffer and whatever presents finished frames.
//! There is no global instance; callers pass the loop to whatever schedules
//! frames.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::camera::Camera;
use crate::error::PresentError;
use crate::field::{DistanceField, Orientation, Shape};
use crate::sink::HdrImage;

/// Frame rate of the animation loop.
pub const FRAMES_PER_SECOND: f32 = 30.0;

/// Yaw, pitch and roll advance by this much per frame when animating.
pub const SPIN_PER_FRAME: f32 = 0.1;

/// Something that can show a finished frame.
pub trait Present {
    /// Display `image`. Called once per frame, after the whole image is rendered.
    fn present(&mut self, image: &HdrImage) -> Result<(), PresentError>;
}

/// Discards frames; for headless runs that only export the last one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Present for Headless {
    fn present(&mut self, _image: &HdrImage) -> Result<(), PresentError> {
        Ok(())
    }
}

/// How the shape's orientation changes from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// The same orientation every frame.
    Still(Orientation),
    /// Yaw, pitch and roll all equal `SPIN_PER_FRAME * frame`.
    Spin,
}

impl Motion {
    /// Orientation for frame number `frame`.
    pub fn orientation(&self, frame: u32) -> Orientation {
        match *self {
            Motion::Still(orientation) => orientation,
            Motion::Spin => {
                let angle = SPIN_PER_FRAME * frame as f32;
                Orientation::from_yaw_pitch_roll(angle, angle, angle)
            }
        }
    }
}

/// Owns everything needed to render and present successive frames.
pub struct FrameLoop<P> {
    camera: Camera,
    shape: Shape,
    motion: Motion,
    presenter: P,
    image: HdrImage,
    frame: u32,
    frame_time: Duration,
}

impl<P: Present> FrameLoop<P> {
    /// Create a loop rendering `shape` with `camera` and showing frames on `presenter`.
    pub fn new(camera: Camera, shape: Shape, motion: Motion, presenter: P) -> Self {
        let size = camera.image_size();
        Self {
            image: HdrImage::new(size.x as u32, size.y as u32),
            camera,
            shape,
            motion,
            presenter,
            frame: 0,
            frame_time: Duration::from_secs_f32(1.0 / FRAMES_PER_SECOND),
        }
    }

    /// Override the frame cadence.
    pub fn with_frame_time(mut self, frame_time: Duration) -> Self {
        self.frame_time = frame_time;
        self
    }

    /// Number of frames rendered so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// The most recently rendered frame.
    pub fn image(&self) -> &HdrImage {
        &self.image
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Render the next frame into the framebuffer.
    pub fn on_frame(&mut self) -> &HdrImage {
        let field = self.shape.oriented(self.motion.orientation(self.frame));
        self.camera.render_into(&field, &mut self.image);
        self.frame += 1;
        &self.image
    }

    /// Render and present `frames` frames, paced at the frame cadence.
    pub fn run(&mut self, frames: u32) -> Result<(), PresentError> {
        info!("Rendering {frames} frame(s) at up to {FRAMES_PER_SECOND} fps");
        for _ in 0..frames {
            let start = Instant::now();
            self.on_frame();
            self.presenter.present(&self.image)?;

            let elapsed = start.elapsed();
            debug!("Frame {} took {:.2?}", self.frame, elapsed);
            if let Some(remaining) = self.frame_time.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }
}
