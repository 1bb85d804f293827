//! Block colors and hue arithmetic on `hsla(...)` strings.

use regex::Regex;
use std::sync::OnceLock;

/// Color used for any block type missing from the palette.
pub const DEFAULT_BLOCK_COLOR: &str = "hsla(0, 0%, 50%, 0.8)";

/// Fallback for blocks that carry no color at all.
pub const NEUTRAL_COLOR: &str = "#cccccc";

/// Color of the non-selected slices in the per-site mini pies.
pub const MUTED_COLOR: &str = "rgba(200,200,200,0.3)";

/// Palette color for a block type.
pub fn block_color(block_type: &str) -> &'static str {
    match block_type {
        "Analogy" => "hsla(325, 100.00%, 42.00%, 0.80)",
        "Application" => "hsla(314, 100.00%, 30.20%, 0.80)",
        "Assumption" => "hsla(358, 89.80%, 38.60%, 0.80)",
        "Cause/Effect" => "hsla(0, 64.50%, 58.00%, 0.80)",
        "Caveat" => "hsla(0, 88.90%, 49.40%, 0.80)",
        "Citation" => "hsla(22, 97.80%, 65.10%, 0.80)",
        "Claim" => "hsla(39, 86.50%, 56.30%, 0.80)",
        "Classification" => "hsla(48, 100.00%, 50.00%, 0.80)",
        "Comparison" => "hsla(70, 82.80%, 47.80%, 0.80)",
        "Context" => "hsla(92, 90.50%, 41.20%, 0.80)",
        "Counterexample" => "hsla(118, 100.00%, 34.90%, 0.80)",
        "Definition" => "hsla(112, 95.60%, 17.60%, 0.80)",
        "Description" => "hsla(189, 100.00%, 30.40%, 0.80)",
        "Elaboration" => "hsla(147, 66.20%, 54.70%, 0.80)",
        "Emphasis" => "hsla(161, 100.00%, 32.40%, 0.80)",
        "Evidence" => "hsla(167, 100.00%, 22.00%, 0.80)",
        "Example" => "hsla(180, 99.20%, 49.00%, 0.80)",
        "Explanation" => "hsla(189, 100.00%, 33.50%, 0.80)",
        "Historical Reference" => "hsla(199, 100.00%, 29.60%, 0.80)",
        "Hypothesis" => "hsla(216, 100.00%, 49.80%, 0.80)",
        "Implication" => "hsla(219, 100.00%, 39.80%, 0.80)",
        "Procedure" => "hsla(230, 98.10%, 20.40%, 0.80)",
        "Qualification" => "hsla(247, 100.00%, 55.50%, 0.80)",
        "Question" => "hsla(253, 98.00%, 61.40%, 0.80)",
        "Quote" => "hsla(258, 100.00%, 70.60%, 0.80)",
        "Source" => "hsla(266, 100.00%, 30.40%, 0.80)",
        "Rule" => "hsla(270, 100.00%, 60.80%, 0.80)",
        "Story" => "hsla(302, 100.00%, 50.00%, 0.80)",
        "Summary" => "hsla(300, 100.00%, 69.80%, 0.80)",
        "Transition" => "hsla(327, 79.40%, 65.70%, 0.80)",
        "Visual Description" => "hsla(350, 100.00%, 75.10%, 0.80)",
        _ => DEFAULT_BLOCK_COLOR,
    }
}

fn hsla_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^hsla\((\d+\.?\d*),\s*(\d+\.?\d*)%,\s*(\d+\.?\d*)%,\s*(\d+\.?\d*)\)$")
            .expect("hsla pattern is a valid regex")
    })
}

/// Rotate the hue of an `hsla(h, s%, l%, a)` color by `degrees`, wrapping at 360.
///
/// Saturation, lightness and alpha are carried over verbatim. Colors in any
/// other notation are returned unchanged.
pub fn rotate_hue(color: &str, degrees: f64) -> String {
    let Some(caps) = hsla_pattern().captures(color.trim()) else {
        return color.to_string();
    };
    let Ok(hue) = caps[1].parse::<f64>() else {
        return color.to_string();
    };
    let rotated = (hue + degrees).rem_euclid(360.0);
    format!(
        "hsla({}, {}%, {}%, {})",
        rotated, &caps[2], &caps[3], &caps[4]
    )
}

/// Replace the trailing alpha of a palette color, e.g. for opacity ramps.
pub fn with_alpha(color: &str, alpha: f64) -> String {
    match color.trim().strip_suffix(')') {
        Some(body) => match body.rfind(',') {
            Some(idx) if body.starts_with("hsla(") || body.starts_with("rgba(") => {
                format!("{}, {})", &body[..idx], alpha)
            }
            _ => color.to_string(),
        },
        None => color.to_string(),
    }
}
