mod engine;
mod layout;
mod scale;
mod undo;

pub use engine::{CellQuota, GridProgressEngine, GridSnapshot, ProgressOutcome};
pub(crate) use engine::normalize_cells;
pub use layout::{GridDimensions, cell_coordinates, compute_dimensions};
pub use scale::{aggregate_scale, scale_for};
pub use undo::UndoStack;
