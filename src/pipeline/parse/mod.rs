mod gpx;

use crate::config::ConversionConfig;
use crate::error::ParseError;
use crate::types::activity::ParsedTrace;

pub use gpx::GpxParser;

pub trait Parser {
    fn parse(&self, bytes: &[u8], config: &ConversionConfig) -> Result<ParsedTrace, ParseError>;
}

pub fn parse(bytes: &[u8], config: &ConversionConfig) -> Result<ParsedTrace, ParseError> {
    GpxParser.parse(bytes, config)
}
