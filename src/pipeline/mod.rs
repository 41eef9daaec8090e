//! Image to palette: decode and cluster, derive swatches, assign targets.

pub mod extract;
pub mod generate;
pub mod loader;
pub mod swatch;
