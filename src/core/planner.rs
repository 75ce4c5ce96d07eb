//! Daily route ordering.
//!
//! Picks the active customers due on a given weekday, measures each one's
//! great-circle distance from the depot and orders them furthest first.
//! Ties keep their roster order. Customers without a usable coordinate are
//! reported as warnings instead of failing the whole plan.
//!
//! This only orders stops by their single-leg distance from the depot. It does
//! not minimise the total driving distance between consecutive stops.

use crate::core::geodesic;
use crate::domain::model::{
    Coordinate, Customer, DataQualityWarning, DistanceUnit, RouteEntry, RoutePlan, ServiceDay,
    WarningKind,
};
use crate::utils::error::{Result, RouteError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePlanner {
    depot: Coordinate,
    unit: DistanceUnit,
}

impl RoutePlanner {
    pub fn new(depot: Coordinate, unit: DistanceUnit) -> Result<Self> {
        if !depot.is_valid() {
            return Err(RouteError::invalid_argument(format!(
                "Depot coordinate out of range: {}",
                depot
            )));
        }
        Ok(Self { depot, unit })
    }

    pub fn depot(&self) -> Coordinate {
        self.depot
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn plan<'a>(&self, customers: &'a [Customer], day: ServiceDay) -> RoutePlan<'a> {
        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        for customer in customers.iter().filter(|c| c.is_due_on(day)) {
            match customer.coordinate {
                None => {
                    warnings.push(DataQualityWarning::new(
                        customer,
                        WarningKind::MissingCoordinate,
                    ));
                }
                Some(coordinate) if !coordinate.is_valid() => {
                    warnings.push(DataQualityWarning::new(
                        customer,
                        WarningKind::InvalidCoordinate,
                    ));
                }
                Some(coordinate) => entries.push(RouteEntry {
                    customer,
                    distance: geodesic::distance(self.depot, coordinate, self.unit),
                }),
            }
        }

        // sort_by 是穩定排序，距離相同者維持名冊順序
        entries.sort_by(|a, b| b.distance.total_cmp(&a.distance));

        tracing::debug!(
            "Planned {} stop(s) for {} ({} warning(s))",
            entries.len(),
            day,
            warnings.len()
        );

        RoutePlan {
            day,
            unit: self.unit,
            entries,
            warnings,
        }
    }
}

/// Orders the customers due on `day` furthest-first from `depot`, in miles.
///
/// `day` must be a full weekday name from Monday to Friday (case-insensitive).
/// Anything else is rejected with [`RouteError::InvalidArgument`].
pub fn plan_route<'a>(
    customers: &'a [Customer],
    day: &str,
    depot: Coordinate,
) -> Result<RoutePlan<'a>> {
    let day: ServiceDay = day.parse()?;
    let planner = RoutePlanner::new(depot, DistanceUnit::Miles)?;
    Ok(planner.plan(customers, day))
}
