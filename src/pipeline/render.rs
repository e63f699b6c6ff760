use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;

use crate::config::ConversionConfig;
use crate::error::RenderError;
use crate::types::activity::{
    ActivityKind, ProcessedTrace, TelemetrySample, TelemetrySummary, TracePoint,
};
use crate::types::time::format_time;

const TCX_NAMESPACES: [(&str, &str); 7] = [
    (
        "xsi:schemaLocation",
        "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd",
    ),
    ("xmlns:ns5", "http://www.garmin.com/xmlschemas/ActivityGoals/v1"),
    ("xmlns:ns3", "http://www.garmin.com/xmlschemas/ActivityExtension/v2"),
    ("xmlns:ns2", "http://www.garmin.com/xmlschemas/UserProfile/v2"),
    ("xmlns", "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns:ns4", "http://www.garmin.com/xmlschemas/ProfileExtension/v1"),
];

const DEVICE_SUFFIX: &str = " - 47mm";
const DEVICE_UNIT_ID: &str = "3605783213";
const DEVICE_PRODUCT_ID: &str = "4570";
const AUTHOR_NAME: &str = "gpx-tcx-rs";
const AUTHOR_PART_NUMBER: &str = "GPX-TCX-001";

type XmlWriter = Writer<Vec<u8>>;
type XmlResult = quick_xml::Result<()>;

/// Everything the serializer reads, bundled so the nested writers stay small.
pub struct TcxDocument<'a> {
    pub trace: &'a ProcessedTrace,
    pub samples: &'a [TelemetrySample],
    pub summary: &'a TelemetrySummary,
    pub config: &'a ConversionConfig,
}

pub fn render_tcx(doc: &TcxDocument) -> Result<String, RenderError> {
    if doc.samples.len() != doc.trace.points.len() {
        return Err(RenderError::Xml(format!(
            "{} telemetry samples for {} points",
            doc.samples.len(),
            doc.trace.points.len()
        )));
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("TrainingCenterDatabase")
        .with_attributes(TCX_NAMESPACES)
        .write_inner_content(|w| {
            w.create_element("Activities")
                .write_inner_content(|w| write_activity(w, doc))?;
            write_author(w)
        })?;

    String::from_utf8(writer.into_inner()).map_err(|e| RenderError::Xml(e.to_string()))
}

fn write_activity(w: &mut XmlWriter, doc: &TcxDocument) -> XmlResult {
    let start = doc
        .trace
        .points
        .first()
        .map(|p| format_time(&p.time))
        .unwrap_or_default();

    w.create_element("Activity")
        .with_attribute(("Sport", doc.config.activity_kind.as_str()))
        .write_inner_content(|w| {
            text_element(w, "Id", &start)?;
            w.create_element("Lap")
                .with_attribute(("StartTime", start.as_str()))
                .write_inner_content(|w| write_lap(w, doc))?;
            write_creator(w, doc.config)
        })?;
    Ok(())
}

fn write_lap(w: &mut XmlWriter, doc: &TcxDocument) -> XmlResult {
    let metrics = &doc.trace.metrics;
    let summary = doc.summary;
    let biking = doc.config.activity_kind == ActivityKind::Biking;

    text_element(w, "TotalTimeSeconds", &format!("{:.1}", metrics.total_time_s))?;
    text_element(w, "DistanceMeters", &format!("{:.2}", metrics.total_distance_m))?;
    text_element(w, "MaximumSpeed", &format!("{:.6}", metrics.max_speed_mps))?;
    text_element(w, "Calories", &metrics.total_calories.to_string())?;
    value_element(w, "AverageHeartRateBpm", summary.avg_heart_rate)?;
    value_element(w, "MaximumHeartRateBpm", summary.max_heart_rate)?;
    text_element(w, "Intensity", "Active")?;
    if biking {
        text_element(w, "Cadence", &summary.avg_cadence.to_string())?;
    }
    text_element(w, "TriggerMethod", "Manual")?;

    w.create_element("Track").write_inner_content(|w| -> XmlResult {
        for (idx, (point, sample)) in doc.trace.points.iter().zip(doc.samples).enumerate() {
            write_trackpoint(w, point, sample, doc.trace.point_speed(idx), biking)?;
        }
        Ok(())
    })?;

    w.create_element("Extensions").write_inner_content(|w| -> XmlResult {
        w.create_element("ns3:LX").write_inner_content(|w| {
            text_element(w, "ns3:AvgSpeed", &format!("{:.6}", metrics.avg_speed_mps))?;
            if !biking {
                text_element(w, "ns3:AvgRunCadence", &summary.avg_cadence.to_string())?;
                text_element(w, "ns3:MaxRunCadence", &summary.max_cadence.to_string())?;
            }
            text_element(w, "ns3:AvgWatts", &summary.avg_power.to_string())?;
            text_element(w, "ns3:MaxWatts", &summary.max_power.to_string())
        })?;
        Ok(())
    })?;
    Ok(())
}

fn write_trackpoint(
    w: &mut XmlWriter,
    point: &TracePoint,
    sample: &TelemetrySample,
    speed: f64,
    biking: bool,
) -> XmlResult {
    w.create_element("Trackpoint").write_inner_content(|w| -> XmlResult {
        text_element(w, "Time", &format_time(&point.time))?;
        w.create_element("Position").write_inner_content(|w| {
            text_element(w, "LatitudeDegrees", &point.lat.to_string())?;
            text_element(w, "LongitudeDegrees", &point.lon.to_string())
        })?;
        text_element(w, "AltitudeMeters", &point.elevation.to_string())?;
        text_element(w, "DistanceMeters", &format!("{:.2}", point.cumulative_distance))?;
        value_element(w, "HeartRateBpm", sample.heart_rate_bpm)?;
        if biking {
            text_element(w, "Cadence", &sample.cadence_spm.to_string())?;
        }
        w.create_element("Extensions").write_inner_content(|w| -> XmlResult {
            w.create_element("ns3:TPX").write_inner_content(|w| {
                text_element(w, "ns3:Speed", &format!("{:.6}", speed))?;
                if !biking {
                    text_element(w, "ns3:RunCadence", &sample.cadence_spm.to_string())?;
                }
                text_element(w, "ns3:Watts", &sample.power_w.to_string())
            })?;
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}

fn write_creator(w: &mut XmlWriter, config: &ConversionConfig) -> XmlResult {
    let (major, minor) = split_version(&config.device_version);
    let name = format!("{}{}", config.device_label, DEVICE_SUFFIX);

    w.create_element("Creator")
        .with_attribute(("xsi:type", "Device_t"))
        .write_inner_content(|w| {
            text_element(w, "Name", &name)?;
            text_element(w, "UnitId", DEVICE_UNIT_ID)?;
            text_element(w, "ProductID", DEVICE_PRODUCT_ID)?;
            write_version(w, major, minor)
        })?;
    Ok(())
}

fn write_author(w: &mut XmlWriter) -> XmlResult {
    let (major, minor) = split_version(env!("CARGO_PKG_VERSION"));

    w.create_element("Author")
        .with_attribute(("xsi:type", "Application_t"))
        .write_inner_content(|w| {
            text_element(w, "Name", AUTHOR_NAME)?;
            w.create_element("Build")
                .write_inner_content(|w| write_version(w, major, minor))?;
            text_element(w, "LangID", "en")?;
            text_element(w, "PartNumber", AUTHOR_PART_NUMBER)
        })?;
    Ok(())
}

fn write_version(w: &mut XmlWriter, major: &str, minor: &str) -> XmlResult {
    w.create_element("Version").write_inner_content(|w| {
        text_element(w, "VersionMajor", major)?;
        text_element(w, "VersionMinor", minor)?;
        text_element(w, "BuildMajor", "0")?;
        text_element(w, "BuildMinor", "0")
    })?;
    Ok(())
}

/// "12.70" -> ("12", "70"); a missing minor part reads as "0".
fn split_version(version: &str) -> (&str, &str) {
    let mut parts = version.trim().split('.');
    let major = parts.next().filter(|s| !s.is_empty()).unwrap_or("0");
    let minor = parts.next().filter(|s| !s.is_empty()).unwrap_or("0");
    (major, minor)
}

fn text_element(w: &mut XmlWriter, name: &str, value: &str) -> XmlResult {
    w.create_element(name)
        .write_text_content(BytesText::new(value))?;
    Ok(())
}

fn value_element(w: &mut XmlWriter, name: &str, value: u16) -> XmlResult {
    w.create_element(name)
        .write_inner_content(|w| text_element(w, "Value", &value.to_string()))?;
    Ok(())
}
