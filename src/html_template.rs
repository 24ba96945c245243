use crate::feed::EarthquakeRecord;
use crate::markers::DEPTH_BANDS;

// Same shape as a browser Date string, but always in UTC.
const POPUP_TIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S UTC";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Popup bound to each earthquake marker.
pub fn popup_html(record: &EarthquakeRecord) -> String {
    format!(
        "<h3>{}</h3><br><b>Location:</b> {}<br><b>Magnitude:</b> {}<br><b>Depth:</b> {}",
        record.occurred_at.format(POPUP_TIME_FORMAT),
        escape_html(&record.place),
        record.magnitude,
        record.depth_km
    )
}

/// Static legend: a title and one colour swatch per depth band, shallow first.
pub fn legend_html() -> String {
    let mut html = String::from("<h3>Depth (km)</h3><ul>");
    for band in DEPTH_BANDS.iter() {
        html.push_str(&format!(
            r#"<li><span class="swatch" style="background-color:{}"></span> {}</li>"#,
            band.color,
            escape_html(band.label)
        ));
    }
    html.push_str("</ul>");
    html
}
