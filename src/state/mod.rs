pub mod app_state;
pub mod diff_state;
pub mod navigator_state;

pub use app_state::AppState;
pub use diff_state::{DiffOptions, DiffState};
pub use navigator_state::NavigatorState;
