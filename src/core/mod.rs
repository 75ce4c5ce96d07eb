pub mod calendar;
pub mod dispatch;
pub mod geodesic;
pub mod planner;
pub mod roster;

pub use crate::domain::model::{Coordinate, Customer, DistanceUnit, RouteEntry, RoutePlan, ServiceDay};
pub use crate::domain::ports::{CustomerStore, DirectionsProvider, Geocoder, Notifier, Storage};
pub use crate::utils::error::Result;
