/// An opaque sRGB color, carried around as the shared fill for both text
/// layers and formatted as `#rrggbb` wherever SVG wants a paint value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` string (case-insensitive). Shorthand forms and
    /// alpha channels are not accepted.
    pub fn from_hex(s: &str) -> Option<Color> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Color { r, g, b })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_hex() {
        let c = Color::from_hex("#141538").unwrap();
        assert_eq!(c, Color::rgb(0x14, 0x15, 0x38));
        assert_eq!(c.to_hex(), "#141538");
        assert_eq!(Color::from_hex("#FF0000").unwrap().to_hex(), "#ff0000");
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::from_hex("141538").is_none());
        assert!(Color::from_hex("#fff").is_none());
        assert!(Color::from_hex("#14153g").is_none());
        assert!(Color::from_hex("#1415388").is_none());
    }
}
