// Start / Stop / Save on top of a Session.
// Running means "we hold a frame source"; stopping drops it, which releases the camera.

use std::path::PathBuf;

use image::RgbImage;

use crate::camera::FrameSource;
use crate::config::Config;
use crate::detector::HandDetector;
use crate::error::Result;
use crate::prompt::SavePrompt;
use crate::session::Session;

/// Acquires a frame source when the user presses Start.
pub type SourceOpener = Box<dyn FnMut() -> Result<Box<dyn FrameSource>>>;

pub struct App {
    session: Session,
    source: Option<Box<dyn FrameSource>>,
    detector: Box<dyn HandDetector>,
    opener: SourceOpener,
}

impl App {
    pub fn new(cfg: &Config, detector: Box<dyn HandDetector>, opener: SourceOpener) -> Self {
        Self {
            session: Session::new(cfg),
            source: None,
            detector,
            opener,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.source.is_some()
    }

    /// Acquire the camera and begin ticking. Does nothing if already running.
    pub fn start(&mut self) -> Result<()> {
        if self.source.is_some() {
            return Ok(());
        }
        self.source = Some((self.opener)()?);
        log::info!("capture started");
        Ok(())
    }

    /// Halt ticking and release the camera. The drawing is kept.
    pub fn stop(&mut self) {
        if self.source.take().is_some() {
            log::info!("capture stopped");
        }
        self.session.lift_pen();
    }

    /// One timer tick; `None` while stopped or when the frame was skipped.
    pub fn tick(&mut self) -> Option<RgbImage> {
        let source = self.source.as_deref_mut()?;
        self.session.tick(source, self.detector.as_mut())
    }

    /// Ask for a destination and write the drawing there. Cancelling writes nothing.
    pub fn save(&mut self, prompt: &mut dyn SavePrompt) -> Result<Option<PathBuf>> {
        let Some(mut path) = prompt.ask_path() else {
            log::info!("save cancelled");
            return Ok(None);
        };
        if path.extension().is_none() {
            path.set_extension("png");
        }
        self.session.save(&path)?;
        log::info!("drawing saved to {}", path.display());
        Ok(Some(path))
    }
}
