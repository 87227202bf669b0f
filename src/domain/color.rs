// RGBA color value used by element configs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid RGBA color '{0}', expected #rrggbbaa")]
pub struct ParseColorError(String);

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(0xff, 0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba::new(0x00, 0x00, 0x00, 0xff);
    pub const TRANSPARENT: Rgba = Rgba::new(0x00, 0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    /// Accepts `#rrggbbaa` or `#rrggbb` (opaque). The leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let err = || ParseColorError(s.to_string());

        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 0xff };

        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba() {
        assert_eq!("#ff000080".parse::<Rgba>(), Ok(Rgba::new(255, 0, 0, 128)));
        assert_eq!("00ff00".parse::<Rgba>(), Ok(Rgba::new(0, 255, 0, 255)));
        assert!("#12345".parse::<Rgba>().is_err());
        assert!("#gg0000ff".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_display_is_lowercase_eight_digit() {
        assert_eq!(Rgba::WHITE.to_string(), "#ffffffff");
        assert_eq!(Rgba::TRANSPARENT.to_string(), "#00000000");
        assert_eq!("#ABCDEF".parse::<Rgba>().unwrap().to_string(), "#abcdefff");
    }
}
