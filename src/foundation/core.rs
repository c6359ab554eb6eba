use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{PixelflowError, PixelflowResult};

pub use kurbo::{Point, Rect};

/// Opaque 24-bit sRGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure black, `#000000`.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white, `#ffffff`.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (case-insensitive, `#` optional).
    pub fn parse_hex(s: &str) -> PixelflowResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err(PixelflowError::validation(format!(
                "hex color must be #RRGGBB, got \"{s}\""
            )));
        }

        fn hex_byte(pair: &str) -> PixelflowResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| PixelflowError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Add a signed offset to every channel, clamping each one to `0..=255`.
    pub fn adjust(self, amount: i16) -> Self {
        let ch = |c: u8| -> u8 { (i16::from(c) + amount).clamp(0, 255) as u8 };
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Shorthand for `adjust(+amount)`.
    pub fn lighten(self, amount: u8) -> Self {
        self.adjust(i16::from(amount))
    }

    /// Shorthand for `adjust(-amount)`.
    pub fn darken(self, amount: u8) -> Self {
        self.adjust(-i16::from(amount))
    }

    /// YIQ perceived brightness in `0.0..=255.0`.
    pub fn luma(self) -> f64 {
        (f64::from(self.r) * 299.0 + f64::from(self.g) * 587.0 + f64::from(self.b) * 114.0)
            / 1000.0
    }

    /// Brightness classification shared by shadow and text contrast.
    pub fn is_light(self) -> bool {
        self.luma() >= 128.0
    }

    /// Attach an alpha channel (`0.0..=1.0`).
    pub fn with_alpha(self, alpha: f32) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, alpha)
    }

    /// Fully opaque RGBA.
    pub fn opaque(self) -> Rgba8 {
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a: 255,
        }
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb8 {
    type Err = PixelflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Straight-alpha RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Construct with a floating-point alpha in `0.0..=1.0`.
    pub fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

/// Supported square board resolutions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridSize {
    /// 50×50 beads.
    #[default]
    Fifty,
    /// 100×100 beads.
    Hundred,
}

impl GridSize {
    /// Every supported size, smallest first.
    pub const ALL: [GridSize; 2] = [GridSize::Fifty, GridSize::Hundred];

    /// Number of cells along one side.
    pub const fn side(self) -> u32 {
        match self {
            GridSize::Fifty => 50,
            GridSize::Hundred => 100,
        }
    }

    /// Total number of cells (`side²`), which is also the traversal length.
    pub const fn cell_count(self) -> u32 {
        self.side() * self.side()
    }
}

impl TryFrom<u32> for GridSize {
    type Error = PixelflowError;

    fn try_from(side: u32) -> Result<Self, Self::Error> {
        match side {
            50 => Ok(GridSize::Fifty),
            100 => Ok(GridSize::Hundred),
            other => Err(PixelflowError::validation(format!(
                "unsupported grid size {other} (expected 50 or 100)"
            ))),
        }
    }
}

impl From<GridSize> for u32 {
    fn from(g: GridSize) -> Self {
        g.side()
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.side())
    }
}

impl FromStr for GridSize {
    type Err = PixelflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let side: u32 = s
            .trim()
            .parse()
            .map_err(|_| PixelflowError::validation(format!("invalid grid size \"{s}\"")))?;
        Self::try_from(side)
    }
}

impl serde::Serialize for GridSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.side())
    }
}

impl<'de> serde::Deserialize<'de> for GridSize {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let side = u32::deserialize(deserializer)?;
        Self::try_from(side).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
