use crate::domain::model::{Coordinate, DistanceUnit};
use geo::{line_string, Haversine, Length, LineString, Point};
use uom::si::f64::Length as LengthQuantity;
use uom::si::length::{kilometer, meter, mile};

/// 兩點間的大圓距離（公尺），使用平均地球半徑的 haversine 公式
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> f64 {
    let src_point = Point::new(from.longitude, from.latitude);
    let dst_point = Point::new(to.longitude, to.latitude);
    let line: LineString<f64> = line_string![src_point.0, dst_point.0];
    Haversine.length(&line)
}

pub fn convert_meters(meters: f64, unit: DistanceUnit) -> f64 {
    let length = LengthQuantity::new::<meter>(meters);
    match unit {
        DistanceUnit::Miles => length.get::<mile>(),
        DistanceUnit::Kilometers => length.get::<kilometer>(),
    }
}

pub fn distance(from: Coordinate, to: Coordinate, unit: DistanceUnit) -> f64 {
    convert_meters(haversine_meters(from, to), unit)
}
