pub mod diff_selection;

pub use diff_selection::{DiffSelection, DiffSelectionType};
