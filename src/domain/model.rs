use crate::utils::error::RouteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// WGS-84 經緯度（度）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// 解析 "lat,lon" 格式
impl FromStr for Coordinate {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| {
            RouteError::invalid_argument(format!("Expected 'lat,lon' but got '{}'", s))
        })?;
        let parse = |part: &str| {
            part.trim().parse::<f64>().map_err(|_| {
                RouteError::invalid_argument(format!("'{}' is not a number", part.trim()))
            })
        };
        let coordinate = Coordinate::new(parse(lat)?, parse(lon)?);
        if !coordinate.is_valid() {
            return Err(RouteError::invalid_argument(format!(
                "Coordinate out of range: {}",
                s
            )));
        }
        Ok(coordinate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl ServiceDay {
    pub const ALL: [ServiceDay; 5] = [
        ServiceDay::Monday,
        ServiceDay::Tuesday,
        ServiceDay::Wednesday,
        ServiceDay::Thursday,
        ServiceDay::Friday,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceDay::Monday => "Monday",
            ServiceDay::Tuesday => "Tuesday",
            ServiceDay::Wednesday => "Wednesday",
            ServiceDay::Thursday => "Thursday",
            ServiceDay::Friday => "Friday",
        }
    }
}

impl fmt::Display for ServiceDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for ServiceDay {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Some(day) = Self::ALL
            .iter()
            .find(|day| day.label().eq_ignore_ascii_case(wanted))
        {
            return Ok(*day);
        }

        let message = if wanted.eq_ignore_ascii_case("saturday") || wanted.eq_ignore_ascii_case("sunday")
        {
            format!("{} is not a service day", wanted)
        } else {
            format!(
                "'{}' is not a recognized weekday (expected Monday through Friday)",
                s
            )
        };
        Err(RouteError::invalid_argument(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub coordinate: Option<Coordinate>,
    pub service_day: ServiceDay,
    pub active: bool,
    pub cleaning_started: bool,
}

impl Customer {
    pub fn is_due_on(&self, day: ServiceDay) -> bool {
        self.active && self.service_day == day
    }
}

/// 新增客戶時尚未有 id，由 store 指派
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub email: String,
    pub coordinate: Coordinate,
    pub service_day: ServiceDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteEntry<'a> {
    pub customer: &'a Customer,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingCoordinate,
    InvalidCoordinate,
    /// 名冊列的 service_day 無法辨識，整列略過
    UnknownServiceDay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub kind: WarningKind,
}

impl DataQualityWarning {
    pub fn new(customer: &Customer, kind: WarningKind) -> Self {
        Self {
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            kind,
        }
    }
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            WarningKind::MissingCoordinate => "has no coordinate",
            WarningKind::InvalidCoordinate => "has an out-of-range coordinate",
            WarningKind::UnknownServiceDay => "has an unrecognized service day",
        };
        write!(
            f,
            "{} (#{}) {} and was left off the route",
            self.customer_name, self.customer_id, reason
        )
    }
}

/// 讀取名冊的結果；無法解析的列不在 `customers` 中，改以警告回報
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub customers: Vec<Customer>,
    pub warnings: Vec<DataQualityWarning>,
}

/// 已依距離由遠到近排序
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan<'a> {
    pub day: ServiceDay,
    pub unit: DistanceUnit,
    pub entries: Vec<RouteEntry<'a>>,
    pub warnings: Vec<DataQualityWarning>,
}

impl RoutePlan<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionStep {
    pub instruction: String,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReport {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}
