use crate::foundation::core::{GridSize, Point, Rect, Rgb8, Rgba8};
use crate::foundation::error::{PixelflowError, PixelflowResult};
use crate::grid::cell::CellSet;
use crate::grid::traversal;
use crate::render::surface::{Paint, Shadow, Surface, TextAlign, TextStyle};

/// Label drawn when the artwork has no name.
pub const FALLBACK_LABEL: &str = "Pixel Art";

/// Card geometry in canvas units. Every other size is derived from these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardLayout {
    pub width: f64,
    pub padding: f64,
    pub text_height: f64,
    pub corner_radius: f64,
    pub border_width: f64,
    pub inner_padding: f64,
}

impl CardLayout {
    /// The 1080-wide export card.
    pub const REFERENCE: Self = Self {
        width: 1080.0,
        padding: 80.0,
        text_height: 200.0,
        corner_radius: 48.0,
        border_width: 12.0,
        inner_padding: 24.0,
    };

    pub fn box_size(&self) -> f64 {
        self.width - self.padding * 2.0
    }

    pub fn height(&self) -> f64 {
        self.padding + self.box_size() + self.text_height
    }

    pub fn box_rect(&self) -> Rect {
        Rect::from_origin_size(
            (self.padding, self.padding),
            (self.box_size(), self.box_size()),
        )
    }

    /// Side of one socket for `grid`.
    pub fn cell_size(&self, grid: GridSize) -> f64 {
        (self.box_size() - self.inner_padding * 2.0) / f64::from(grid.side())
    }

    /// Socket center; row 0 is the bottom row of the board.
    pub fn cell_center(&self, column: u32, row: u32, grid: GridSize) -> Point {
        let cell = self.cell_size(grid);
        let origin = self.padding + self.inner_padding;
        let side = grid.side();
        let screen_row = side.saturating_sub(1).saturating_sub(row);
        Point::new(
            origin + f64::from(column) * cell + cell / 2.0,
            origin + f64::from(screen_row) * cell + cell / 2.0,
        )
    }

    pub fn bead_radius(&self, grid: GridSize) -> f64 {
        self.cell_size(grid) * 0.85 / 2.0
    }

    /// Center of the label band under the box.
    pub fn text_center(&self) -> Point {
        Point::new(
            self.width / 2.0,
            self.padding + self.box_size() + self.text_height / 2.0,
        )
    }
}

impl Default for CardLayout {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Outer backdrop of an exported card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackgroundConfig {
    Solid(Rgb8),
    /// Diagonal three-stop gradient around a base color.
    Gradient(Rgb8),
}

impl BackgroundConfig {
    /// Color used for light/dark classification.
    pub fn base_color(&self) -> Rgb8 {
        match *self {
            Self::Solid(c) | Self::Gradient(c) => c,
        }
    }

    pub fn is_light(&self) -> bool {
        self.base_color().is_light()
    }

    pub fn paint(&self, layout: &CardLayout) -> Paint {
        match *self {
            Self::Solid(c) => Paint::rgb(c),
            Self::Gradient(base) => Paint::LinearGradient {
                start: Point::ORIGIN,
                end: Point::new(layout.width, layout.height()),
                stops: vec![(0.0, base), (0.5, base.adjust(30)), (1.0, base.adjust(-20))],
            },
        }
    }

    /// Label color contrasting with the backdrop.
    pub fn text_color(&self) -> Rgb8 {
        if self.is_light() {
            Rgb8::new(0x1e, 0x29, 0x3b)
        } else {
            Rgb8::new(0xf5, 0xf5, 0xf5)
        }
    }

    /// Glow on dark backdrops, drop shadow on light ones.
    pub fn box_shadow(&self) -> Shadow {
        if self.is_light() {
            Shadow {
                color: Rgba8::new(0, 0, 0, 0.4),
                blur: 80.0,
                offset: (0.0, 50.0),
            }
        } else {
            Shadow {
                color: Rgba8::new(255, 255, 255, 0.15),
                blur: 120.0,
                offset: (0.0, 0.0),
            }
        }
    }
}

/// A named solid backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundPreset {
    pub name: &'static str,
    pub color: Rgb8,
}

const fn preset(name: &'static str, hex: u32) -> BackgroundPreset {
    BackgroundPreset {
        name,
        color: Rgb8::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8),
    }
}

pub const PRESETS: [BackgroundPreset; 17] = [
    preset("Obsidian", 0x171717),
    preset("Graphite", 0x333333),
    preset("Alabaster", 0xFAFAF9),
    preset("Stone", 0xA8A29E),
    preset("Sand", 0xE7E5E4),
    preset("Matcha", 0x57534E),
    preset("Sage", 0x5F6F65),
    preset("Teal", 0x134E4A),
    preset("Emerald", 0x059669),
    preset("Clay", 0x9A3412),
    preset("Amber", 0xD97706),
    preset("Rust", 0x7F1D1D),
    preset("Ochre", 0xB45309),
    preset("Denim", 0x1E3A8A),
    preset("Midnight", 0x1E1B4B),
    preset("Plum", 0x581C87),
    preset("Rose Dust", 0x9F1239),
];

/// Look up a preset by name, ignoring case, spaces, dashes and underscores.
pub fn preset_background(name: &str) -> Option<BackgroundConfig> {
    let norm = |s: &str| -> String {
        s.chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect()
    };
    let wanted = norm(name);
    PRESETS
        .iter()
        .find(|p| norm(p.name) == wanted)
        .map(|p| BackgroundConfig::Solid(p.color))
}

/// Backdrop offered before the user picks one: Obsidian in a dark app, otherwise a gradient on
/// the artwork's theme color.
pub fn default_background(app_dark: bool, theme_color: Rgb8) -> BackgroundConfig {
    if app_dark {
        BackgroundConfig::Solid(PRESETS[0].color)
    } else {
        BackgroundConfig::Gradient(theme_color)
    }
}

/// Box chrome colors, chosen by the app theme only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStyle {
    pub box_fill: Rgb8,
    pub border: Rgb8,
    pub peg: Rgb8,
}

impl FrameStyle {
    pub fn new(dark: bool) -> Self {
        if dark {
            Self {
                box_fill: Rgb8::new(0x2a, 0x2a, 0x2a),
                border: Rgb8::new(0x2a, 0x2a, 0x2a),
                peg: Rgb8::new(0x1a, 0x1a, 0x1a),
            }
        } else {
            Self {
                box_fill: Rgb8::WHITE,
                border: Rgb8::WHITE,
                peg: Rgb8::new(0xe2, 0xe8, 0xf0),
            }
        }
    }
}

/// Everything a card needs besides the surface.
#[derive(Clone, Copy, Debug)]
pub struct FrameRequest<'a> {
    pub cells: &'a CellSet,
    /// Sockets with a traversal step below this count show their bead.
    pub reveal_count: u32,
    pub frame_is_dark: bool,
    pub label: &'a str,
    pub background: BackgroundConfig,
    /// Enlarge the most recently revealed bead while the reveal is partial.
    pub emphasize_head: bool,
}

impl<'a> FrameRequest<'a> {
    /// Fully revealed card without head emphasis.
    pub fn complete(
        cells: &'a CellSet,
        frame_is_dark: bool,
        label: &'a str,
        background: BackgroundConfig,
    ) -> Self {
        Self {
            cells,
            reveal_count: cells.grid_size().cell_count(),
            frame_is_dark,
            label,
            background,
            emphasize_head: false,
        }
    }
}

const BEAD_SHADOW: Shadow = Shadow {
    color: Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 38,
    },
    blur: 4.0,
    offset: (2.0, 2.0),
};

const LABEL_SIZE: f32 = 72.0;
const HEAD_SCALE: f64 = 1.25;

/// Draw a complete card onto `surface` in canvas units of `layout`.
#[tracing::instrument(
    level = "debug",
    skip(surface, request),
    fields(grid = %request.cells.grid_size(), reveal = request.reveal_count)
)]
pub fn draw_frame<S: Surface + ?Sized>(
    surface: &mut S,
    layout: &CardLayout,
    request: &FrameRequest<'_>,
) -> PixelflowResult<()> {
    let grid = request.cells.grid_size();
    let total = grid.cell_count();
    if request.reveal_count > total {
        return Err(PixelflowError::validation(format!(
            "reveal count {} exceeds {total} sockets",
            request.reveal_count
        )));
    }
    let style = FrameStyle::new(request.frame_is_dark);
    let bg = request.background;

    surface.fill_rect(
        Rect::new(0.0, 0.0, layout.width, layout.height()),
        &bg.paint(layout),
    );

    let box_rect = layout.box_rect();
    surface.set_shadow(Some(bg.box_shadow()));
    surface.fill_rounded_rect(box_rect, layout.corner_radius, &Paint::rgb(style.box_fill));
    surface.set_shadow(None);
    surface.stroke_rounded_rect(
        box_rect,
        layout.corner_radius,
        layout.border_width,
        style.border.opaque(),
    );

    let radius = layout.bead_radius(grid);
    let peg = Paint::rgb(style.peg);
    for step in 0..total {
        if let Some((column, row)) = traversal::cell_at_step(step, grid) {
            surface.fill_circle(layout.cell_center(column, row, grid), radius * 0.4, &peg);
        }
    }

    let head = (request.emphasize_head && request.reveal_count > 0 && request.reveal_count < total)
        .then(|| traversal::cell_at_step(request.reveal_count - 1, grid))
        .flatten();
    let beads = request
        .cells
        .iter()
        .filter(|c| traversal::is_visible(c.column, c.row, request.reveal_count, grid))
        .filter(|c| head != Some((c.column, c.row)))
        .collect::<Vec<_>>();

    surface.set_shadow(Some(BEAD_SHADOW));
    for cell in &beads {
        surface.fill_circle(
            layout.cell_center(cell.column, cell.row, grid),
            radius,
            &Paint::rgb(cell.color),
        );
    }
    surface.set_shadow(None);

    for cell in &beads {
        draw_bead_details(surface, layout.cell_center(cell.column, cell.row, grid), radius);
    }

    if let Some((column, row)) = head
        && let Some(color) = request.cells.color_at(column, row)
    {
        let center = layout.cell_center(column, row, grid);
        let r = radius * HEAD_SCALE;
        surface.fill_circle(center, r + 2.0, &Paint::Solid(Rgb8::WHITE.with_alpha(0.8)));
        surface.fill_circle(center, r, &Paint::rgb(brighten(color, 1.1)));
        draw_bead_details(surface, center, r);
    }

    let label = request.label.trim();
    let label = if label.is_empty() { FALLBACK_LABEL } else { label };
    surface.fill_text(
        label,
        layout.text_center(),
        &TextStyle {
            size: LABEL_SIZE,
            bold: true,
            color: bg.text_color(),
            align: TextAlign::Center,
        },
    )?;

    tracing::debug!(beads = beads.len(), "card drawn");
    Ok(())
}

fn draw_bead_details<S: Surface + ?Sized>(surface: &mut S, center: Point, radius: f64) {
    surface.fill_circle(
        center,
        radius * 0.35,
        &Paint::Solid(Rgb8::BLACK.with_alpha(0.15)),
    );
    surface.fill_circle(
        Point::new(center.x - radius * 0.3, center.y - radius * 0.3),
        radius * 0.25,
        &Paint::Solid(Rgb8::WHITE.with_alpha(0.2)),
    );
}

fn brighten(c: Rgb8, factor: f64) -> Rgb8 {
    let ch = |v: u8| -> u8 { (f64::from(v) * factor).round().clamp(0.0, 255.0) as u8 };
    Rgb8::new(ch(c.r), ch(c.g), ch(c.b))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
