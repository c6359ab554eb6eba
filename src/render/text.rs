use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::foundation::error::{PixelflowError, PixelflowResult};

/// Solid RGBA8 brush carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Font face bytes plus the face index inside a collection.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedFont {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
}

static REGULAR: OnceLock<Option<ResolvedFont>> = OnceLock::new();
static BOLD: OnceLock<Option<ResolvedFont>> = OnceLock::new();

/// Face used for labels: `PIXELFLOW_FONT` if set and readable, else a sans-serif system face.
///
/// Resolved once per weight; `None` means no usable font exists on this machine.
pub(crate) fn label_font(bold: bool) -> Option<&'static ResolvedFont> {
    let slot = if bold { &BOLD } else { &REGULAR };
    slot.get_or_init(|| resolve_font(bold)).as_ref()
}

fn resolve_font(bold: bool) -> Option<ResolvedFont> {
    if let Some(path) = std::env::var("PIXELFLOW_FONT")
        .ok()
        .filter(|v| !v.trim().is_empty())
    {
        match load_font_file(Path::new(&path)) {
            Ok(font) => return Some(font),
            Err(e) => tracing::warn!(path = %path, error = %e, "PIXELFLOW_FONT unusable"),
        }
    }

    let font = system_font(bold);
    match &font {
        Some(_) => tracing::debug!(bold, "resolved system sans-serif face"),
        None => tracing::warn!(bold, "no system font found; labels will be skipped"),
    }
    font
}

fn load_font_file(path: &Path) -> PixelflowResult<ResolvedFont> {
    let bytes = std::fs::read(path)
        .map_err(|e| PixelflowError::render(format!("read font {}: {e}", path.display())))?;
    if bytes.is_empty() {
        return Err(PixelflowError::render("font file is empty"));
    }
    Ok(ResolvedFont {
        bytes: Arc::new(bytes),
        index: 0,
    })
}

/// Families tried in order for labels; the first one installed with a fitting weight wins.
const LABEL_FAMILIES: &[&str] = &[
    "Inter",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

fn system_font(bold: bool) -> Option<ResolvedFont> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let id = label_face(&db, bold)?;
    db.with_face_data(id, |data, index| ResolvedFont {
        bytes: Arc::new(data.to_vec()),
        index,
    })
}

/// Pick the label face from `db`.
///
/// Named sans families come first. A bold request only accepts a family hit of weight 700 or
/// more. Otherwise the non-monospace face closest to the wanted weight is used, heavier and
/// upright sans faces winning ties.
fn label_face(db: &usvg::fontdb::Database, bold: bool) -> Option<usvg::fontdb::ID> {
    let weight = if bold {
        usvg::fontdb::Weight::BOLD
    } else {
        usvg::fontdb::Weight::NORMAL
    };

    for name in LABEL_FAMILIES {
        let families = [usvg::fontdb::Family::Name(name)];
        let query = usvg::fontdb::Query {
            families: &families,
            weight,
            ..Default::default()
        };
        let Some(id) = db.query(&query) else {
            continue;
        };
        let heavy_enough = db
            .face(id)
            .is_some_and(|face| !bold || face.weight.0 >= usvg::fontdb::Weight::BOLD.0);
        if heavy_enough {
            tracing::debug!(family = %name, bold, "label family matched");
            return Some(id);
        }
    }

    db.faces()
        .filter(|face| !face.monospaced)
        .min_by_key(|face| {
            let distance = (i32::from(face.weight.0) - i32::from(weight.0)).abs();
            let lighter = face.weight.0 < weight.0;
            let italic = face.style != usvg::fontdb::Style::Normal;
            let not_sans = !face
                .families
                .iter()
                .any(|(family, _)| family.contains("Sans"));
            (distance, lighter, italic, not_sans)
        })
        .map(|face| face.id)
}

/// Parley contexts plus the family names already registered from [`ResolvedFont`]s.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<(usize, u32), String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &ResolvedFont) -> PixelflowResult<String> {
        let key = (Arc::as_ptr(&font.bytes) as usize, font.index);
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PixelflowError::render("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PixelflowError::render("registered font family has no name"))?
            .to_string();
        self.families.insert(key, name.clone());
        Ok(name)
    }

    /// Shape a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        bold: bool,
        brush: TextBrushRgba8,
    ) -> PixelflowResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PixelflowError::validation(
                "text size must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
