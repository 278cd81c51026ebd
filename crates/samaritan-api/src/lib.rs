pub mod error;
pub mod issues;
pub mod middleware;
pub mod posts;
pub mod routes;
pub mod state;
pub mod users;

pub use routes::router;
pub use state::{AppState, AppStateInner};
