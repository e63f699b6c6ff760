#![allow(dead_code)]

/// Roughly 100 m of latitude.
pub const LAT_STEP: f64 = 0.0009;

pub fn gpx(trkpts: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><time>2020-01-01T00:00:00Z</time></metadata>
  <trk><name>Test Run</name><trkseg>
{trkpts}
  </trkseg></trk>
</gpx>"#
    )
}

/// `count` points heading north, `LAT_STEP` apart and `interval_s` seconds apart.
pub fn timed_gpx(count: usize, interval_s: u64) -> String {
    let points: String = (0..count)
        .map(|i| {
            let secs = i as u64 * interval_s;
            format!(
                r#"    <trkpt lat="{:.6}" lon="13.405"><ele>{}.0</ele><time>2024-06-01T07:{:02}:{:02}Z</time></trkpt>
"#,
                52.52 + i as f64 * LAT_STEP,
                30 + i,
                secs / 60,
                secs % 60
            )
        })
        .collect();
    gpx(&points)
}

pub fn untimed_gpx(count: usize) -> String {
    let points: String = (0..count)
        .map(|i| {
            format!(
                r#"    <trkpt lat="{:.6}" lon="13.405"><ele>30.0</ele></trkpt>
"#,
                52.52 + i as f64 * LAT_STEP
            )
        })
        .collect();
    gpx(&points)
}

/// Text of every `<tag>` element, in document order.
pub fn element_values<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let open = format!("<{tag}>");
    xml.split(open.as_str())
        .skip(1)
        .filter_map(|rest| rest.split('<').next())
        .collect()
}

pub fn numbers(xml: &str, tag: &str) -> Vec<f64> {
    element_values(xml, tag)
        .into_iter()
        .map(|v| v.trim().parse().expect("numeric element"))
        .collect()
}
