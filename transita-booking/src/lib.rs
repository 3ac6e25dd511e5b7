pub mod browse;
pub mod history;
pub mod seatmap;
pub mod selection;

pub use history::{search, SearchField};
pub use seatmap::{build_grid, compute_seats, DEFAULT_COLUMNS_PER_ROW};
pub use selection::{SeatSelection, SeatState, SelectionError, SelectionPhase};
