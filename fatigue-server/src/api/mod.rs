//! HTTP API handlers for fatigue-server

pub mod buildinfo;
pub mod fatigue;
pub mod health;

pub use buildinfo::get_build_info;
pub use fatigue::{calculate_fatigue, fatigue_routes};
pub use health::health_routes;
