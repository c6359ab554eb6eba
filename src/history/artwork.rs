use crate::foundation::core::{GridSize, Rgb8};
use crate::foundation::error::PixelflowResult;
use crate::grid::cell::{Cell, CellSet};

/// A finished board, created once when its reveal completes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", from = "ArtworkRecord")]
pub struct Artwork {
    /// Unique record id.
    pub id: String,
    /// User label.
    pub name: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Filled sockets.
    #[serde(rename = "pixels")]
    pub cells: Vec<Cell>,
    /// Dominant color chosen by the quantizer.
    pub theme_color: Rgb8,
    /// Board resolution.
    pub grid_size: GridSize,
}

impl Artwork {
    /// Rebuild the sparse lookup for rendering.
    pub fn cell_set(&self) -> PixelflowResult<CellSet> {
        CellSet::from_cells(self.grid_size, self.cells.clone())
    }
}

/// On-disk shape; older records may lack `gridSize`.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtworkRecord {
    id: String,
    #[serde(default)]
    name: String,
    created_at: u64,
    #[serde(rename = "pixels")]
    cells: Vec<Cell>,
    theme_color: Rgb8,
    #[serde(default)]
    grid_size: Option<GridSize>,
}

impl From<ArtworkRecord> for Artwork {
    fn from(r: ArtworkRecord) -> Self {
        let grid_size = r.grid_size.unwrap_or_else(|| infer_grid_size(&r.cells));
        Self {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            cells: r.cells,
            theme_color: r.theme_color,
            grid_size,
        }
    }
}

/// Any coordinate past the small board means the record came from the large one.
fn infer_grid_size(cells: &[Cell]) -> GridSize {
    let small = GridSize::Fifty.side();
    if cells.iter().any(|c| c.column >= small || c.row >= small) {
        GridSize::Hundred
    } else {
        GridSize::Fifty
    }
}
