pub mod auth;
pub mod extract;
pub mod response;
pub mod router;
pub mod tasks;

pub use router::{build_router, AppState};
