//! 输出 transforms.json
mod manifest;

pub use manifest::{FrameEntry, Manifest};
