//! Node appearance derived from sample size and response distribution.

use crate::model::SurveyDetail;

pub const MIN_RADIUS: f64 = 5.0;
pub const MAX_RADIUS: f64 = 30.0;

/// Fill for nodes without response data.
pub const NO_DATA_COLOR: &str = "#C4ECD8";

/// Low, medium and high agreement.
pub const CONFIDENCE_COLORS: [&str; 3] = ["#C4ECD8", "#77BB99", "#04BD61"];

const WHITE: (f64, f64, f64) = (255.0, 255.0, 255.0);
const LIME: (f64, f64, f64) = (92.0, 255.0, 92.0);

/// Square-root scale from `[0, max_size]` onto `[MIN_RADIUS, MAX_RADIUS]`.
pub fn radius(size: f64, max_size: f64) -> f64 {
    if max_size <= 0.0 || !size.is_finite() {
        return MIN_RADIUS;
    }
    let t = (size.max(0.0) / max_size).sqrt();
    MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * t
}

/// Blend from white towards lime by the top answer's share.
pub fn fill_color(detail: Option<&SurveyDetail>) -> String {
    let Some(top) = detail.and_then(SurveyDetail::top_share) else {
        return NO_DATA_COLOR.to_string();
    };
    let t = top.clamp(0.0, 1.0);
    let channel = |from: f64, to: f64| (from - (from - to) * t).round() as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        channel(WHITE.0, LIME.0),
        channel(WHITE.1, LIME.1),
        channel(WHITE.2, LIME.2)
    )
}

pub fn confidence_color(confidence: Option<f64>) -> &'static str {
    match confidence {
        Some(c) if c >= 0.66 => CONFIDENCE_COLORS[2],
        Some(c) if c >= 0.33 => CONFIDENCE_COLORS[1],
        _ => CONFIDENCE_COLORS[0],
    }
}
