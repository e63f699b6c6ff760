pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use config::{ConversionConfig, RawConfig};
pub use pipeline::convert::{convert, convert_bytes, run, Conversion};
