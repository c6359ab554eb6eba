use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::foundation::core::{GridSize, Rgb8};
use crate::foundation::error::{PixelflowError, PixelflowResult};
use crate::grid::cell::CellSet;
use crate::grid::traversal;
use crate::history::HistoryStore;
use crate::history::artwork::Artwork;
use crate::history::store::KeyValueStore;
use crate::quantize::{self, DEFAULT_THEME_COLOR, Quantized};
use crate::reveal::clock::RevealClock;

/// Generation lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for input.
    Idle,
    /// Decoding and quantizing the source image.
    Processing,
    /// Reveal in flight.
    Animating,
    /// Fully revealed (fresh generation or loaded from history).
    Complete,
}

/// Proof that a generation request was accepted; hands the quantizer result back to the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationTicket {
    cycle: u64,
}

/// Handle for the single scheduled reveal tick.
///
/// A token is consumed by [`GenerationFlow::tick`]; a stale token (reset, new generation, or an
/// already completed cycle) is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickToken {
    cycle: u64,
    seq: u64,
}

/// Result of one reveal tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still revealing; schedule `next`.
    Pending {
        /// Revealed count after this tick.
        progress: u32,
        /// Token for the following tick.
        next: TickToken,
    },
    /// The last socket was revealed on this tick.
    Completed {
        /// The persisted record.
        artwork: Artwork,
    },
    /// The token belonged to a cancelled or finished cycle; nothing happened.
    Cancelled,
}

/// Owns the `Idle → Processing → Animating → Complete` state machine and its reveal clock.
pub struct GenerationFlow<S: KeyValueStore> {
    phase: Phase,
    grid_size: GridSize,
    label: String,
    cells: CellSet,
    theme_color: Rgb8,
    progress: u32,
    reveal: Option<RevealClock>,
    cycle: u64,
    pending: Option<TickToken>,
    history: HistoryStore<S>,
}

impl<S: KeyValueStore> GenerationFlow<S> {
    /// Idle flow on the default board size.
    pub fn new(history: HistoryStore<S>) -> Self {
        Self {
            phase: Phase::Idle,
            grid_size: GridSize::default(),
            label: String::new(),
            cells: CellSet::new(GridSize::default()),
            theme_color: DEFAULT_THEME_COLOR,
            progress: 0,
            reveal: None,
            cycle: 0,
            pending: None,
            history,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Board size used for the next (or current) generation.
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Choose the board size. Only allowed while idle.
    pub fn set_grid_size(&mut self, grid_size: GridSize) -> PixelflowResult<()> {
        self.require_idle("grid size")?;
        self.grid_size = grid_size;
        self.cells = CellSet::new(grid_size);
        Ok(())
    }

    /// Artwork label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the label. Only allowed while idle.
    pub fn set_label(&mut self, label: impl Into<String>) -> PixelflowResult<()> {
        self.require_idle("label")?;
        self.label = label.into();
        Ok(())
    }

    /// Cells of the current board.
    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    /// Theme color of the current board.
    pub fn theme_color(&self) -> Rgb8 {
        self.theme_color
    }

    /// Revealed socket count.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// History collaborator.
    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Mutable history access (deletes).
    pub fn history_mut(&mut self) -> &mut HistoryStore<S> {
        &mut self.history
    }

    /// `true` when the socket is revealed at the current progress.
    pub fn is_visible(&self, column: u32, row: u32) -> bool {
        traversal::is_visible(column, row, self.progress, self.cells.grid_size())
    }

    /// `true` for the emphasized leading socket of an in-flight reveal.
    pub fn is_head(&self, column: u32, row: u32) -> bool {
        self.phase == Phase::Animating
            && traversal::is_head(column, row, self.progress, self.cells.grid_size())
    }

    /// Accept a generation request and enter `Processing`.
    ///
    /// Rejected with [`PixelflowError::EmptyInput`] when the label is blank, and while any other
    /// generation is pending or shown.
    pub fn request_generation(&mut self) -> PixelflowResult<GenerationTicket> {
        if self.label.trim().is_empty() {
            return Err(PixelflowError::empty_input("a name is required to generate"));
        }
        match self.phase {
            Phase::Idle => {}
            Phase::Processing | Phase::Animating => {
                return Err(PixelflowError::validation("a generation is already running"));
            }
            Phase::Complete => {
                return Err(PixelflowError::validation("reset before generating again"));
            }
        }

        self.cancel_tick();
        self.cycle += 1;
        self.progress = 0;
        self.phase = Phase::Processing;
        tracing::info!(grid = %self.grid_size, label = %self.label, "generation started");
        Ok(GenerationTicket { cycle: self.cycle })
    }

    /// Deliver the quantizer result and start the reveal at `now`.
    ///
    /// On failure the flow returns to `Idle` with the previous board untouched and the error is
    /// passed through.
    pub fn finish_processing(
        &mut self,
        ticket: GenerationTicket,
        result: PixelflowResult<Quantized>,
        now: Duration,
    ) -> PixelflowResult<TickToken> {
        if ticket.cycle != self.cycle || self.phase != Phase::Processing {
            return Err(PixelflowError::validation("stale generation ticket"));
        }

        let quantized = match result {
            Ok(q) if q.cells.grid_size() != self.grid_size => {
                self.phase = Phase::Idle;
                return Err(PixelflowError::validation(format!(
                    "quantized for {} but generating {}",
                    q.cells.grid_size(),
                    self.grid_size
                )));
            }
            Ok(q) => q,
            Err(e) => {
                tracing::error!(error = %e, "generation failed");
                self.phase = Phase::Idle;
                return Err(e);
            }
        };

        self.cells = quantized.cells;
        self.theme_color = quantized.theme_color;
        self.progress = 0;
        self.reveal = Some(RevealClock::start(self.grid_size, now));
        self.phase = Phase::Animating;
        tracing::debug!(cells = self.cells.len(), "reveal started");
        Ok(self.schedule(0))
    }

    /// Request, decode, quantize and start the reveal in one call.
    pub fn generate_from_bytes(&mut self, bytes: &[u8], now: Duration) -> PixelflowResult<TickToken> {
        let ticket = self.request_generation()?;
        let result = quantize::quantize_bytes(bytes, self.grid_size);
        self.finish_processing(ticket, result, now)
    }

    /// Advance the reveal to `now`.
    ///
    /// The last tick moves to `Complete` and appends the artwork to history exactly once. A
    /// history write failure is logged and does not undo completion.
    pub fn tick(&mut self, token: TickToken, now: Duration) -> TickOutcome {
        if self.pending != Some(token) || self.phase != Phase::Animating {
            return TickOutcome::Cancelled;
        }
        let Some(reveal) = self.reveal else {
            self.pending = None;
            return TickOutcome::Cancelled;
        };

        self.progress = self.progress.max(reveal.progress_at(now));
        if self.progress < reveal.total() {
            let next = self.schedule(token.seq + 1);
            return TickOutcome::Pending {
                progress: self.progress,
                next,
            };
        }

        self.pending = None;
        self.reveal = None;
        self.phase = Phase::Complete;
        let artwork = self.make_artwork();
        if let Err(e) = self.history.add(artwork.clone()) {
            tracing::error!(error = %e, id = %artwork.id, "failed to persist artwork");
        }
        tracing::info!(id = %artwork.id, "reveal complete");
        TickOutcome::Completed { artwork }
    }

    /// Drop the scheduled tick, if any.
    pub fn cancel_tick(&mut self) {
        self.pending = None;
    }

    /// Return to `Idle`, cancelling any reveal. The board size preference is kept.
    pub fn reset(&mut self) {
        self.cancel_tick();
        self.cycle += 1;
        self.reveal = None;
        self.phase = Phase::Idle;
        self.label.clear();
        self.cells = CellSet::new(self.grid_size);
        self.theme_color = DEFAULT_THEME_COLOR;
        self.progress = 0;
    }

    /// Show a stored artwork fully revealed, without animating.
    pub fn load_artwork(&mut self, artwork: &Artwork) -> PixelflowResult<()> {
        if self.phase == Phase::Processing {
            return Err(PixelflowError::validation("cannot load while processing"));
        }
        let cells = artwork.cell_set()?;
        self.cancel_tick();
        self.cycle += 1;
        self.reveal = None;
        self.grid_size = artwork.grid_size;
        self.label = artwork.name.clone();
        self.cells = cells;
        self.theme_color = artwork.theme_color;
        self.progress = artwork.grid_size.cell_count();
        self.phase = Phase::Complete;
        Ok(())
    }

    fn schedule(&mut self, seq: u64) -> TickToken {
        let token = TickToken {
            cycle: self.cycle,
            seq,
        };
        self.pending = Some(token);
        token
    }

    fn require_idle(&self, what: &str) -> PixelflowResult<()> {
        if self.phase != Phase::Idle {
            return Err(PixelflowError::validation(format!(
                "{what} can only change while idle"
            )));
        }
        Ok(())
    }

    fn make_artwork(&self) -> Artwork {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Artwork {
            id: format!("{created_at}-{}", self.cycle),
            name: self.label.clone(),
            created_at,
            cells: self.cells.cells().to_vec(),
            theme_color: self.theme_color,
            grid_size: self.grid_size,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/flow.rs"]
mod tests;
