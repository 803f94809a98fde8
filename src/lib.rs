//! Hand-tracked whiteboard: raise your index finger to draw over the live camera
//! feed, raise index and middle to erase, save the ink as a PNG.
//!
//! Everything except the window and the real camera is plain data flowing through
//! [`session::Session::tick`], so the pipeline runs just as well against test fixtures.

pub mod app;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod detector;
pub mod display;
pub mod error;
pub mod landmarks;
pub mod overlay;
pub mod prompt;
pub mod session;
pub mod stroke;

pub use error::{Error, Result};
