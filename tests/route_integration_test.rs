use anyhow::Result;
use httpmock::prelude::*;
use pool_route::adapters::customer_store::{CsvCustomerStore, ROSTER_FILE};
use pool_route::adapters::directions::{OrsDirections, DEFAULT_PROFILE};
use pool_route::adapters::notifier::HttpEmailNotifier;
use pool_route::adapters::storage::LocalStorage;
use pool_route::core::dispatch::Directions;
use pool_route::domain::model::{Coordinate, CustomerId, DistanceUnit, ServiceDay, WarningKind};
use pool_route::{RouteDispatcher, RoutePlanner};
use std::time::Duration;
use tempfile::TempDir;

const ROSTER: &str = "\
id,name,address,email,lat,lon,service_day,active,cleaning_started
1,Sea Breeze,10 Beach Dr,breeze@example.com,30.3574,-85.8350,Monday,true,false
2,Palm Court,22 Palm Ct,palm@example.com,30.5745,-85.8350,Monday,true,false
3,Shell Cove,5 Shell Ln,shell@example.com,30.2850,-85.8350,Monday,false,false
4,Bay Harbor,8 Harbor Rd,harbor@example.com,30.7917,-85.8350,Tuesday,true,false
5,Unmapped Villa,77 Unknown St,villa@example.com,,,Monday,true,false
";

fn roster_dir() -> Result<TempDir> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join(ROSTER_FILE), ROSTER)?;
    Ok(dir)
}

fn depot() -> Coordinate {
    Coordinate::new(30.2127, -85.8350)
}

/// 完整流程：讀名冊 → 排序 → 逐站查路線
#[tokio::test]
async fn test_monday_route_end_to_end() -> Result<()> {
    let dir = roster_dir()?;
    let server = MockServer::start();
    let directions_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/directions/driving-car/json")
            .header("Authorization", "ors-key");
        then.status(200).json_body(serde_json::json!({
            "routes": [{"segments": [{"steps": [
                {"instruction": "Head north on Hutchison Blvd", "distance": 1200.0},
                {"instruction": "Arrive at destination", "distance": 0.0}
            ]}]}]
        }));
    });

    let store = CsvCustomerStore::new(LocalStorage::new(dir.path()));
    let planner = RoutePlanner::new(depot(), DistanceUnit::Miles)?;
    let directions = OrsDirections::new(
        &server.base_url(),
        "ors-key",
        DEFAULT_PROFILE,
        Duration::from_secs(5),
    )?;
    let dispatcher = RouteDispatcher::new(store, planner).with_directions(directions);

    let route = dispatcher.todays_route(ServiceDay::Monday).await?;

    // Palm Court ≈ 25 mi、Sea Breeze ≈ 10 mi；Shell Cove 停用、Bay Harbor 是週二
    let names: Vec<&str> = route.stops.iter().map(|s| s.customer.name.as_str()).collect();
    assert_eq!(names, vec!["Palm Court", "Sea Breeze"]);
    assert!((route.stops[0].distance - 25.0).abs() < 0.1);
    assert!((route.stops[1].distance - 10.0).abs() < 0.1);

    assert_eq!(route.warnings.len(), 1);
    assert_eq!(route.warnings[0].customer_id, CustomerId(5));
    assert_eq!(route.warnings[0].kind, WarningKind::MissingCoordinate);

    directions_mock.assert_hits(2);
    for stop in &route.stops {
        assert!(matches!(&stop.directions, Directions::Available(steps) if steps.len() == 2));
    }

    Ok(())
}

#[tokio::test]
async fn test_directions_outage_keeps_route() -> Result<()> {
    let dir = roster_dir()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v2/directions/driving-car/json");
        then.status(500);
    });

    let store = CsvCustomerStore::new(LocalStorage::new(dir.path()));
    let planner = RoutePlanner::new(depot(), DistanceUnit::Kilometers)?;
    let directions = OrsDirections::new(
        &server.base_url(),
        "ors-key",
        DEFAULT_PROFILE,
        Duration::from_secs(5),
    )?;
    let dispatcher = RouteDispatcher::new(store, planner).with_directions(directions);

    let route = dispatcher.todays_route(ServiceDay::Tuesday).await?;

    assert_eq!(route.stops.len(), 1);
    assert_eq!(route.stops[0].customer.name, "Bay Harbor");
    assert!((route.stops[0].distance - 64.4).abs() < 0.2);
    assert!(matches!(&route.stops[0].directions, Directions::Unavailable(_)));

    Ok(())
}

/// 一列 service_day 空白或無法辨識，不影響其他客戶
#[tokio::test]
async fn test_unrecognized_service_day_does_not_block_route() -> Result<()> {
    let dir = TempDir::new()?;
    std::fs::write(
        dir.path().join(ROSTER_FILE),
        "id,name,address,email,lat,lon,service_day,active,cleaning_started\n\
         1,Sea Breeze,10 Beach Dr,breeze@example.com,30.3574,-85.8350,Monday,true,false\n\
         2,Blank Day,3 Dune Ct,blank@example.com,30.4000,-85.8350,,true,false\n",
    )?;

    let store = CsvCustomerStore::new(LocalStorage::new(dir.path()));
    let dispatcher = RouteDispatcher::new(store, RoutePlanner::new(depot(), DistanceUnit::Miles)?);

    let route = dispatcher.todays_route(ServiceDay::Monday).await?;
    assert_eq!(route.stops.len(), 1);
    assert_eq!(route.stops[0].customer.name, "Sea Breeze");
    assert_eq!(route.warnings.len(), 1);
    assert_eq!(route.warnings[0].customer_id, CustomerId(2));
    assert_eq!(route.warnings[0].kind, WarningKind::UnknownServiceDay);

    // 其他客戶仍可開工
    dispatcher.start_cleaning(CustomerId(1)).await?;
    let saved = std::fs::read_to_string(dir.path().join(ROSTER_FILE))?;
    assert!(saved.contains("2,Blank Day,3 Dune Ct,blank@example.com,30.4,-85.835,,true,false"));

    Ok(())
}

#[tokio::test]
async fn test_route_serializes_to_json() -> Result<()> {
    let dir = roster_dir()?;
    let store = CsvCustomerStore::new(LocalStorage::new(dir.path()));
    let dispatcher = RouteDispatcher::new(store, RoutePlanner::new(depot(), DistanceUnit::Miles)?);

    let route = dispatcher.todays_route(ServiceDay::Monday).await?;
    let json = serde_json::to_value(&route)?;

    assert_eq!(json["day"], "Monday");
    assert_eq!(json["unit"], "miles");
    assert_eq!(json["stops"][0]["customer"]["id"], 2);
    assert_eq!(json["stops"][0]["directions"]["status"], "not_requested");
    assert_eq!(json["warnings"][0]["kind"], "missing_coordinate");

    Ok(())
}

#[tokio::test]
async fn test_start_and_finish_stop() -> Result<()> {
    let dir = roster_dir()?;
    let server = MockServer::start();
    let email_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/send")
            .header("Authorization", "Bearer mail-key")
            .body_contains("Bayco Pools Service Report: Palm Court")
            .body_contains("palm@example.com");
        then.status(200);
    });

    let store = CsvCustomerStore::new(LocalStorage::new(dir.path()));
    let notifier = HttpEmailNotifier::new(
        &server.url("/send"),
        "mail-key",
        "crew@baycopools.example",
        Duration::from_secs(5),
    )?;
    let dispatcher = RouteDispatcher::new(store, RoutePlanner::new(depot(), DistanceUnit::Miles)?)
        .with_notifier(notifier);

    dispatcher.start_cleaning(CustomerId(2)).await?;
    let sent = dispatcher
        .finish_stop(CustomerId(2), "Cleaned filter, pH 7.4", None)
        .await?;

    assert!(sent);
    email_mock.assert();

    let saved = std::fs::read_to_string(dir.path().join(ROSTER_FILE))?;
    assert!(saved.contains("2,Palm Court,22 Palm Ct,palm@example.com,30.5745,-85.835,Monday,true,true"));

    Ok(())
}
