use crate::foundation::core::{Point, Rect, Rgb8, Rgba8};
use crate::foundation::error::PixelflowResult;

/// Fill source for shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Flat color (straight alpha).
    Solid(Rgba8),
    /// Linear gradient between two points in canvas units.
    ///
    /// `stops` are `(offset, color)` pairs with offsets in `[0, 1]`, sorted ascending.
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<(f32, Rgb8)>,
    },
}

impl Paint {
    /// Opaque solid paint.
    pub fn rgb(color: Rgb8) -> Self {
        Self::Solid(color.opaque())
    }
}

impl From<Rgba8> for Paint {
    fn from(value: Rgba8) -> Self {
        Self::Solid(value)
    }
}

/// Blurred copy of the shapes drawn while it is active, painted beneath them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba8,
    /// Blur extent in canvas units (same convention as a 2D canvas `shadowBlur`).
    pub blur: f64,
    pub offset: (f64, f64),
}

/// Horizontal anchoring of a text line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Rgb8,
    pub align: TextAlign,
}

/// Drawing capabilities the compositor needs. Coordinates are canvas units; an implementation
/// may map them to device pixels with a uniform scale.
///
/// Shadows are scoped: every fill issued between `set_shadow(Some(..))` and the next
/// `set_shadow` call belongs to one group whose blurred silhouette is drawn beneath the group.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, paint: &Paint);

    /// Stroke centered on the rounded-rect outline.
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, width: f64, color: Rgba8);

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint);

    /// Draw one line of text with its vertical middle on `anchor.y`.
    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle) -> PixelflowResult<()>;

    fn set_shadow(&mut self, shadow: Option<Shadow>);
}
