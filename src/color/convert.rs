pub const DEFAULT_RGBA: &str = "rgba(0,0,0,1)";

/// Converts `#RGB` / `#RRGGBB` (leading `#` optional) to `rgba(r,g,b,1)`.
///
/// Never fails: malformed input logs a warning and yields [`DEFAULT_RGBA`].
pub fn hex_to_rgba(hex: &str) -> String {
    hex_to_rgba_with_alpha(hex, 1.0)
}

pub fn hex_to_rgba_with_alpha(hex: &str, alpha: f32) -> String {
    match parse_hex(hex) {
        Some((r, g, b)) => {
            let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
            format!("rgba({},{},{},{})", r, g, b, alpha)
        }
        None => {
            tracing::warn!("Invalid hex color {:?}, defaulting to {}", hex, DEFAULT_RGBA);
            DEFAULT_RGBA.to_string()
        }
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
