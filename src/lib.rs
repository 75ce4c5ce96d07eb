pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::AppConfig;
pub use crate::core::{
    dispatch::{DailyRoute, RouteDispatcher},
    planner::{plan_route, RoutePlanner},
    roster::RosterManager,
};
pub use utils::error::{Result, RouteError};
