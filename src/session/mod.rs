pub mod controller;
pub mod state;

pub use controller::PaginationController;
pub use state::{FetchOutcome, FetchTicket, SearchSession, Skip};
