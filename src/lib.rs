pub mod cli;
pub mod color;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod target;
pub mod tui;
