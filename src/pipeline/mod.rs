pub mod convert;
pub mod geo;
pub mod parse;
pub mod process;
pub mod render;
pub mod speed;
pub mod synth;
pub mod timeline;
