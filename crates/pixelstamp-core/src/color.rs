//! Hex color parsing for fill colors and text layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when parsing a hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The color does not have exactly six hex digits.
    #[error("Invalid hexadecimal color \"{value}\": expected 6 hex digits, got {len}")]
    InvalidLength { value: String, len: usize },

    /// The color contains a character that is not a hex digit.
    #[error("Invalid hexadecimal color \"{value}\": contains non-hex characters")]
    InvalidDigit { value: String },
}

/// An opaque RGB color parsed from `RRGGBB` or `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::new(0, 0, 0);
    pub const WHITE: HexColor = HexColor::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Parse a hex color string.
///
/// A single leading `#` is accepted. Exactly six hex digits must follow,
/// upper or lower case.
///
/// # Example
///
/// ```ignore
/// assert_eq!(parse_hex_color("#FF0000")?, HexColor::new(255, 0, 0));
/// assert!(parse_hex_color("F00").is_err());
/// ```
pub fn parse_hex_color(value: &str) -> Result<HexColor, ColorError> {
    let digits = value.strip_prefix('#').unwrap_or(value);

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidDigit {
            value: value.to_string(),
        });
    }
    // All ASCII from here, so byte length == char count
    if digits.len() != 6 {
        return Err(ColorError::InvalidLength {
            value: value.to_string(),
            len: digits.len(),
        });
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::InvalidDigit {
            value: value.to_string(),
        })
    };

    Ok(HexColor {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_color(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_hex_color(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
