use chrono::{DateTime, Duration, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::ConversionConfig;
use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::activity::{ParsedTrace, TracePoint};
use crate::types::time::{default_anchor, parse_time};

pub struct GpxParser;

struct RawPoint {
    lat: f64,
    lon: f64,
    elevation: Option<f64>,
    time: Option<DateTime<Utc>>,
}

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8], config: &ConversionConfig) -> Result<ParsedTrace, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut raw_points = Vec::new();
        let mut current_point: Option<RawPoint> = None;
        let mut current_element = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e)?;
                    if is_point_element(&name) {
                        current_point = read_position(&e)?;
                    } else if current_point.is_some() {
                        current_element = name;
                    }
                }
                Ok(Event::Empty(e)) => {
                    if is_point_element(&local_name(&e)?) {
                        if let Some(point) = read_position(&e)? {
                            raw_points.push(point);
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(point) = current_point.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                        match current_element.as_str() {
                            "ele" => point.elevation = text.trim().parse().ok(),
                            "time" => point.time = parse_time(&text).ok(),
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    let name = e.local_name();
                    let name_str = std::str::from_utf8(name.as_ref())
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                    if is_point_element(name_str) {
                        if let Some(point) = current_point.take() {
                            raw_points.push(point);
                        }
                    }
                    current_element.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if raw_points.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        let source_start = raw_points.iter().find_map(|p| p.time);
        let base_time = config.start_time.unwrap_or_else(default_anchor);
        let synthesized = raw_points.iter().filter(|p| p.time.is_none()).count();
        if synthesized > 0 {
            tracing::debug!(
                "Synthesized timestamps for {} of {} points",
                synthesized,
                raw_points.len()
            );
        }

        let points = raw_points
            .into_iter()
            .enumerate()
            .map(|(i, p)| TracePoint {
                lat: p.lat,
                lon: p.lon,
                elevation: p.elevation.unwrap_or(0.0),
                time: p
                    .time
                    .unwrap_or_else(|| base_time + Duration::seconds(i as i64)),
                cumulative_distance: 0.0,
            })
            .collect();

        Ok(ParsedTrace {
            points,
            source_start,
        })
    }
}

fn is_point_element(name: &str) -> bool {
    matches!(name, "trkpt" | "rtept")
}

fn local_name(e: &BytesStart) -> Result<String, ParseError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

fn read_position(e: &BytesStart) -> Result<Option<RawPoint>, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        match key {
            "lat" => lat = value.trim().parse::<f64>().ok(),
            "lon" => lon = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(RawPoint {
            lat,
            lon,
            elevation: None,
            time: None,
        })),
        _ => {
            tracing::warn!("Skipping point without usable lat/lon");
            Ok(None)
        }
    }
}
