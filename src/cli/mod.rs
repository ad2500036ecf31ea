//! Command-line interface module.

mod args;
pub mod convert;
pub mod images;
mod prompt;
pub mod render;

pub use args::{Cli, Commands, ConvertArgs, RenderArgs, ResizeArgs, WebpArgs};
