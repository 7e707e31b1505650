//! Terminal host for the upload flow: stands in for the browser page, the
//! navbar and the visualizer route.
mod app;
mod config;
mod console;
mod logging;

pub use app::{run, Args};
