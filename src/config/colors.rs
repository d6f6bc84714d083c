//! Color configuration for the TUI.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

/// Configuration for all TUI colors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub active_border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub inactive_border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_bg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub card_title: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub card_meta: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub modal_border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_label: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata_link: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub rover_active: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub rover_inactive: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub error_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub banner_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub banner_bg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub star: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub status_bg: Color,
}

/// Mars-rust orange used for the selection and the modal frame.
const MARS_ORANGE: Color = Color::Rgb(0xC1, 0x44, 0x0E);

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            active_border: Color::Cyan,
            inactive_border: Color::DarkGray,
            selection_bg: MARS_ORANGE,
            selection_fg: Color::White,
            card_title: Color::LightYellow,
            card_meta: Color::Gray,
            modal_border: MARS_ORANGE,
            metadata_label: Color::Yellow,
            metadata_link: Color::Blue,
            rover_active: Color::LightGreen,
            rover_inactive: Color::Gray,
            error_fg: Color::LightRed,
            banner_fg: Color::Black,
            banner_bg: Color::Yellow,
            star: Color::Gray,
            status_fg: Color::White,
            status_bg: Color::DarkGray,
        }
    }
}

/// Custom deserializer for Color that supports named colors and hex codes.
fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color_string(&s).map_err(de::Error::custom)
}

/// Parse a color string into a ratatui Color.
///
/// Accepts the named ANSI colors (case-insensitive, `grey` spelled either way)
/// and `#RRGGBB` / `#RGB` hex codes.
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    let color = match s.to_lowercase().replace("grey", "gray").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" => Color::Gray,
        "darkgray" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" => Color::Reset,
        _ => return Err(format!("Unknown color: {}", s)),
    };
    Ok(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        // #RGB expands each digit, so F becomes FF.
        3 => Some(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => None,
    }
}
