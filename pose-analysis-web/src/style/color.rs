//! Color safety layer
//!
//! Canvas gradient color stops throw on strings the browser cannot parse
//! (e.g. naive `"rgb(1,2,3)" + "80"` alpha concatenation). Every color
//! that reaches the painter goes through `parse_color` first, and alpha
//! variants are rebuilt as `rgba(...)` instead of string-patched.

/// A parsed color, channels 0-255 and alpha 0-1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: clamp_alpha(a), ..self }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, format_alpha(self.a))
    }
}

/// Fallback when nothing else parses
pub const FALLBACK_COLOR: &str = "#ffffff";

const NAMED_COLORS: [(&str, Rgba); 14] = [
    ("black", Rgba::opaque(0, 0, 0)),
    ("white", Rgba::opaque(255, 255, 255)),
    ("red", Rgba::opaque(255, 0, 0)),
    ("green", Rgba::opaque(0, 128, 0)),
    ("lime", Rgba::opaque(0, 255, 0)),
    ("blue", Rgba::opaque(0, 0, 255)),
    ("yellow", Rgba::opaque(255, 255, 0)),
    ("cyan", Rgba::opaque(0, 255, 255)),
    ("magenta", Rgba::opaque(255, 0, 255)),
    ("orange", Rgba::opaque(255, 165, 0)),
    ("purple", Rgba::opaque(128, 0, 128)),
    ("gray", Rgba::opaque(128, 128, 128)),
    ("grey", Rgba::opaque(128, 128, 128)),
    ("transparent", Rgba { r: 0, g: 0, b: 0, a: 0.0 }),
];

// ============================================================================
// PARSING
// ============================================================================

/// Parse hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()/rgba()`,
/// `hsl()/hsla()` and a small set of named colors.
pub fn parse_color(input: &str) -> Option<Rgba> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return None;
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = function_args(&s, "rgba").or_else(|| function_args(&s, "rgb")) {
        return parse_rgb_args(&args);
    }
    if let Some(args) = function_args(&s, "hsla").or_else(|| function_args(&s, "hsl")) {
        return parse_hsl_args(&args);
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, rgba)| *rgba)
}

pub fn is_valid_color(input: &str) -> bool {
    parse_color(input).is_some()
}

/// Browser-safe form of `input`: hex and named colors pass through
/// trimmed, functional forms are rewritten as canonical `rgba(...)`.
/// Unparseable input yields `fallback` (or white if the fallback is
/// also invalid).
pub fn sanitize_color(input: &str, fallback: &str) -> String {
    canonical(input)
        .or_else(|| canonical(fallback))
        .unwrap_or_else(|| FALLBACK_COLOR.to_string())
}

fn canonical(input: &str) -> Option<String> {
    let color = parse_color(input)?;
    let trimmed = input.trim();
    if trimmed.contains('(') {
        Some(color.to_css())
    } else {
        Some(trimmed.to_string())
    }
}

/// `color` with its alpha replaced, always as a parseable `rgba(...)`
pub fn with_alpha(color: &str, alpha: f64) -> String {
    parse_color(color)
        .unwrap_or(Rgba::opaque(255, 255, 255))
        .with_alpha(alpha)
        .to_css()
}

/// Distinct hue per slot for trajectory paths
pub fn rotated_hue(slot: usize) -> String {
    let hue = (slot as f64 * 40.0) % 360.0;
    format!("hsl({}, 100%, 55%)", hue)
}

/// Arguments of `name(...)`. Either all comma separated (legacy) or
/// three space separated values with an optional `/ alpha` (modern).
/// Mixed separators and empty arguments are rejected.
fn function_args(s: &str, name: &str) -> Option<Vec<String>> {
    let inner = s.strip_prefix(name)?.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    let single = |p: &str| {
        let p = p.trim();
        (!p.is_empty() && !p.contains(|c: char| c.is_whitespace() || c == '/')).then(|| p.to_string())
    };

    if inner.contains(',') {
        return inner.split(',').map(single).collect();
    }

    let (channels, alpha) = match inner.split_once('/') {
        Some((channels, alpha)) => (channels, Some(single(alpha)?)),
        None => (inner, None),
    };
    let mut args: Vec<String> = channels.split_whitespace().map(str::to_string).collect();
    if args.len() != 3 {
        return None;
    }
    args.extend(alpha);
    Some(args)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::opaque(nibble(0)?, nibble(1)?, nibble(2)?).with_alpha(nibble(3)? as f64 / 255.0)),
        6 => Some(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?).with_alpha(byte(6)? as f64 / 255.0)),
        _ => None,
    }
}

fn parse_rgb_args(args: &[String]) -> Option<Rgba> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v = match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => s.parse::<f64>().ok()?,
        };
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match args.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Some(Rgba::opaque(channel(&args[0])?, channel(&args[1])?, channel(&args[2])?).with_alpha(alpha))
}

fn parse_hsl_args(args: &[String]) -> Option<Rgba> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let hue: f64 = args[0].trim_end_matches("deg").parse().ok()?;
    let percent = |s: &str| -> Option<f64> {
        let v: f64 = s.strip_suffix('%')?.parse().ok()?;
        v.is_finite().then(|| v.clamp(0.0, 100.0) / 100.0)
    };
    let saturation = percent(&args[1])?;
    let lightness = percent(&args[2])?;
    let alpha = match args.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    if !hue.is_finite() {
        return None;
    }

    let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
    Some(Rgba::opaque(r, g, b).with_alpha(alpha))
}

fn parse_alpha(s: &str) -> Option<f64> {
    let v = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0,
        None => s.parse::<f64>().ok()?,
    };
    v.is_finite().then(|| clamp_alpha(v))
}

fn hsl_to_rgb(hue: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r1), to_byte(g1), to_byte(b1))
}

fn clamp_alpha(a: f64) -> f64 {
    if a.is_nan() { 1.0 } else { a.clamp(0.0, 1.0) }
}

fn format_alpha(a: f64) -> String {
    let rounded = (a * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#fff"), Some(Rgba::opaque(255, 255, 255)));
        assert_eq!(parse_color("#FF6B6B"), Some(Rgba::opaque(255, 107, 107)));
        assert_eq!(parse_color("#00ff0080").map(|c| c.a > 0.5 && c.a < 0.51), Some(true));
        assert!(parse_color("#12345").is_none());
        assert!(parse_color("#gggggg").is_none());
    }

    #[test]
    fn test_functional_forms() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(Rgba::opaque(10, 20, 30)));
        assert_eq!(parse_color("rgba(10,20,30,0.5)").map(|c| c.a), Some(0.5));
        assert_eq!(parse_color("hsl(0, 100%, 50%)"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(parse_color("hsl(120, 100%, 50%)"), Some(Rgba::opaque(0, 255, 0)));
        assert!(parse_color("rgb(10, 20)").is_none());
        assert!(parse_color("hsl(10, 20, 30)").is_none());
    }

    #[test]
    fn test_broken_concatenation_rejected() {
        // What naive alpha appending produces
        assert!(!is_valid_color("rgb(10, 20, 30)80"));
        assert!(!is_valid_color("hsl(40, 100%, 55%)00"));
        assert!(!is_valid_color(""));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_color(" red ", "#000"), "red");
        assert_eq!(sanitize_color("#ABC", "#000"), "#ABC");
        assert_eq!(sanitize_color("rgb(10 20 30 / 50%)", "#000"), "rgba(10, 20, 30, 0.5)");
        assert_eq!(sanitize_color("hsl(0, 100%, 50%)", "#000"), "rgba(255, 0, 0, 1)");
        assert_eq!(sanitize_color("nope", "#000"), "#000");
        assert_eq!(sanitize_color("nope", "also-nope"), FALLBACK_COLOR);
    }

    #[test]
    fn test_malformed_functional_forms_fall_back() {
        for bad in ["rgb(1 2 3 4)", "rgb(1,2,3,)", "rgb(1, 2 3)", "hsl(120deg 50%, 50%)", "rgb(1 2 / )"] {
            assert!(!is_valid_color(bad), "{bad}");
            assert_eq!(sanitize_color(bad, "#00ff00"), "#00ff00", "{bad}");
        }
        assert_eq!(parse_color("hsl(120deg 100% 50%)"), Some(Rgba::opaque(0, 255, 0)));
    }

    #[test]
    fn test_with_alpha_always_parses() {
        for color in ["#ff0000", "rgb(1,2,3)", "hsl(200, 50%, 50%)", "cyan", "garbage"] {
            let out = with_alpha(color, 0.25);
            assert!(is_valid_color(&out), "{out}");
            assert_eq!(parse_color(&out).map(|c| c.a), Some(0.25));
        }
        assert_eq!(with_alpha("#ff0000", 2.0), "rgba(255, 0, 0, 1)");
    }

    #[test]
    fn test_rotated_hues_distinct_and_valid() {
        let hues: Vec<String> = (0..9).map(rotated_hue).collect();
        for (i, h) in hues.iter().enumerate() {
            assert!(is_valid_color(h));
            assert!(!hues[i + 1..].contains(h));
        }
    }
}
