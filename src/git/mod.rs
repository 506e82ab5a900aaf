pub mod commands;
pub mod diff;
pub mod patch;
pub mod repository;
pub mod stage;
pub mod types;

pub use diff::DiffEngine;
pub use repository::RepoCache;
