//! Color tokens and the theme they make up.

use ratatui::style::Color;

/// An opaque RGB color read from a theme token such as `#21808d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorToken {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorToken {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` or `#rgb` token. Surrounding whitespace is ignored.
    pub fn parse(token: &str) -> Option<Self> {
        let hex = token.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // #abc expands to #aabbcc
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => None,
        }
    }

    /// Parse a token, falling back to `default` when it is missing or malformed.
    pub fn parse_or(token: Option<&str>, default: ColorToken) -> Self {
        token.and_then(Self::parse).unwrap_or(default)
    }

    /// Composite this color at `opacity` over an opaque `background`.
    ///
    /// Terminals have no alpha channel, so translucent strokes are flattened
    /// against the known page background instead.
    pub fn over(self, background: ColorToken, opacity: f32) -> ColorToken {
        let a = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Self::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    /// Convert to a Ratatui color.
    pub fn color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl std::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The page palette: two accents and the background they are drawn over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Accent used for particle fill and highlighted text.
    pub primary: ColorToken,
    /// Accent used for the connector lines.
    pub secondary: ColorToken,
    /// Page background.
    pub background: ColorToken,
}

impl Theme {
    pub const DEFAULT_PRIMARY: ColorToken = ColorToken::rgb(0x21, 0x80, 0x8d);
    pub const DEFAULT_SECONDARY: ColorToken = ColorToken::rgb(0x32, 0xb8, 0xc6);
    pub const DEFAULT_BACKGROUND: ColorToken = ColorToken::rgb(0x1f, 0x21, 0x21);
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Self::DEFAULT_PRIMARY,
            secondary: Self::DEFAULT_SECONDARY,
            background: Self::DEFAULT_BACKGROUND,
        }
    }
}
