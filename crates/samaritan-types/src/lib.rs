pub mod api;
pub mod flag;
pub mod models;

/// Status every new issue starts with.
pub const INITIAL_STATUS: &str = "Need Help";
