use ratatui::style::Color;

use crate::config::Theme;
use crate::growth::Phase;

/// Parse a color string into a ratatui Color
/// Supports:
/// - Named colors: black, red, green, yellow, blue, magenta, cyan, white, gray/grey
/// - Extended named colors: darkgray, lightred, lightgreen, lightyellow, lightblue, lightmagenta, lightcyan
/// - Hex format: #RRGGBB or #RGB
/// - RGB format: rgb(255,0,0)
/// Returns Color::White for unrecognized colors
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "lightgray" | "lightgrey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => {
            if s.starts_with('#') {
                if let Some(color) = parse_hex_color(&s) {
                    return color;
                }
            } else if s.starts_with("rgb(") {
                if let Some(color) = parse_rgb_color(&s) {
                    return color;
                }
            }
            Color::White
        }
    }
}

/// Parse hex color format (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            // #RGB -> #RRGGBB
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Color::Rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
        }
        _ => None,
    }
}

/// Parse RGB color format (rgb(r,g,b))
fn parse_rgb_color(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;

    let parts: Vec<&str> = content.split(',').map(|s| s.trim()).collect();
    if parts.len() != 3 {
        return None;
    }

    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;

    Some(Color::Rgb(r, g, b))
}

/// Black text for light backgrounds, white text for dark ones
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => {
            // Perceived brightness (ITU-R BT.601)
            let brightness = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            brightness < 128.0
        }
        // Gray renders light in most terminals
        other => matches!(other, Color::Black | Color::Blue | Color::Magenta | Color::Red | Color::DarkGray),
    };
    if dark { Color::White } else { Color::Black }
}

/// Accent color for a growth phase
pub fn phase_color(theme: &Theme, phase: Phase) -> Color {
    match phase {
        Phase::Vegetative => parse_color(&theme.vegetative),
        Phase::Flowering => parse_color(&theme.flowering),
    }
}
