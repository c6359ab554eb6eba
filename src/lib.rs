//! Pixelflow turns an image into bead-board pixel art.
//!
//! The pipeline is deterministic end to end:
//!
//! - [`quantize`] fits an image onto a 50×50 or 100×100 board and picks a theme color
//! - [`GenerationFlow`] reveals the board along the snake traversal over a fixed duration and
//!   appends the finished [`Artwork`] to a [`HistoryStore`]
//! - [`draw_frame`] / [`export_png`] composite the board into a framed card
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod grid;
pub(crate) mod history;
pub(crate) mod quantize;
pub(crate) mod render;
pub(crate) mod reveal;

pub use crate::foundation::core::{GridSize, Point, Rect, Rgb8, Rgba8};
pub use crate::foundation::error::{PixelflowError, PixelflowResult};

pub use crate::grid::cell::{Cell, CellSet};
pub use crate::grid::traversal::{SnakePath, cell_at_step, is_head, is_visible, step_index};
pub use crate::history::artwork::Artwork;
pub use crate::history::store::{FileStore, KeyValueStore, MemoryStore};
pub use crate::history::{HISTORY_KEY, HistoryStore};
pub use crate::quantize::{
    ALPHA_THRESHOLD, ContainFit, DEFAULT_THEME_COLOR, Quantized, quantize, quantize_bytes,
    quantize_path, quantize_rgba,
};
pub use crate::render::compositor::{
    BackgroundConfig, BackgroundPreset, CardLayout, FALLBACK_LABEL, FrameRequest, FrameStyle,
    PRESETS, default_background, draw_frame, preset_background,
};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::export::{
    EXPORT_WIDTH, PREVIEW_WIDTH, card_height_for, encode_png, export_file_name, export_png,
    preview, render_rgba,
};
pub use crate::render::surface::{Paint, Shadow, Surface, TextAlign, TextStyle};
pub use crate::reveal::clock::{
    Clock, ManualClock, RevealClock, SystemClock, progress_for_elapsed, reveal_duration,
};
pub use crate::reveal::driver::{DEFAULT_FRAME_INTERVAL, frame_interval_from_env, run_reveal};
pub use crate::reveal::flow::{GenerationFlow, GenerationTicket, Phase, TickOutcome, TickToken};
