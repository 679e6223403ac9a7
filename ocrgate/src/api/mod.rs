mod extractors;
mod routes;
mod state;

pub mod dto;
pub mod handlers;
pub mod openapi;

pub use routes::create_router;
pub use state::AppState;
