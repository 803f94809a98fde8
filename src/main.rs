// What you SEE:
// • Space starts the camera; the live (mirrored) feed fills the window.
// • Raise only your index finger: a magenta trail follows the fingertip.
// • Raise index + middle: a round eraser clears ink under the fingertip.
// • X stops the camera (the drawing is kept), S saves the ink as a PNG. ESC quits.

use hand_whiteboard::app::App;
use hand_whiteboard::camera::{CameraCapture, FrameSource};
use hand_whiteboard::config::{Config, ENV_DETECTOR};
use hand_whiteboard::detector::{HandDetector, NoDetector, SubprocessDetector};
use hand_whiteboard::display::Display;
use hand_whiteboard::prompt::TerminalPrompt;
use hand_whiteboard::Error;
use log::LevelFilter;

fn build_detector(cfg: &Config) -> Box<dyn HandDetector> {
    let Some(argv) = &cfg.detector_command else {
        log::warn!("{ENV_DETECTOR} not set; running without hand tracking");
        return Box::new(NoDetector);
    };
    match SubprocessDetector::spawn(argv, cfg.min_confidence) {
        Ok(det) => Box::new(det),
        Err(e) => {
            log::warn!("{e}; running without hand tracking");
            Box::new(NoDetector)
        }
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::new()
        .filter(Some(env!("CARGO_CRATE_NAME")), LevelFilter::Info)
        .parse_default_env()
        .init();

    let cfg = Config::from_env();
    match serde_json::to_string(&cfg) {
        Ok(json) => log::debug!("config: {json}"),
        Err(e) => log::warn!("config dump failed: {e}"),
    }

    let mut display = Display::new(cfg.width, cfg.height, cfg.target_fps())?;

    let (index, w, h) = (cfg.camera_index, cfg.width, cfg.height);
    let opener = Box::new(move || {
        CameraCapture::open(index, w, h).map(|cam| Box::new(cam) as Box<dyn FrameSource>)
    });
    let mut app = App::new(&cfg, build_detector(&cfg), opener);
    let mut prompt = TerminalPrompt::stdin();

    /* ------------------------------ Main loop ------------------------------ */
    loop {
        let controls = display.poll_controls();
        if controls.quit {
            app.stop();
            break;
        }

        if controls.start && !app.is_running() {
            match app.start() {
                Ok(()) => display.set_status("running | X: stop  S: save  Esc: quit"),
                Err(e) => log::error!("{e}"),
            }
        }
        if controls.stop && app.is_running() {
            app.stop();
            display.clear()?;
            display.set_status("stopped | Space: start  S: save  Esc: quit");
        }
        if controls.save {
            if let Err(e) = app.save(&mut prompt) {
                log::error!("{e}");
            }
        }

        // Ticks only while running; a missing frame just skips this round.
        match app.tick() {
            Some(frame) => display.present(&frame)?,
            None => display.idle(),
        }
    }

    Ok(())
}
