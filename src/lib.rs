pub mod api_router;
pub mod config;
pub mod shared;
pub mod tickets;
