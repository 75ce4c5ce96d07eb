use crate::domain::model::{
    Coordinate, Customer, CustomerId, DataQualityWarning, NewCustomer, Roster, ServiceDay,
    WarningKind,
};
use crate::domain::ports::{CustomerStore, Storage};
use crate::utils::error::{Result, RouteError};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::Mutex;

pub const ROSTER_FILE: &str = "customers.csv";

/// customers.csv 的一列；lat/lon 空白代表尚未定位
#[derive(Debug, Serialize, Deserialize)]
struct CustomerRow {
    id: u64,
    name: String,
    address: String,
    email: String,
    lat: Option<f64>,
    lon: Option<f64>,
    service_day: String,
    #[serde(deserialize_with = "deserialize_flag")]
    active: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    cleaning_started: bool,
}

/// 舊資料庫匯出的檔案以 1/0 表示布林值
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean flag, got '{}'",
            other
        ))),
    }
}

impl CustomerRow {
    /// service_day 無法辨識時回傳 `None`
    fn to_customer(&self) -> Option<Customer> {
        let service_day: ServiceDay = self.service_day.parse().ok()?;
        let coordinate = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        };

        Some(Customer {
            id: CustomerId(self.id),
            name: self.name.clone(),
            address: self.address.clone(),
            email: self.email.clone(),
            coordinate,
            service_day,
            active: self.active,
            cleaning_started: self.cleaning_started,
        })
    }

    fn unknown_day_error(&self) -> RouteError {
        RouteError::data(format!(
            "Customer #{} has unrecognized service_day '{}'",
            self.id, self.service_day
        ))
    }

    fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id.0,
            name: customer.name.clone(),
            address: customer.address.clone(),
            email: customer.email.clone(),
            lat: customer.coordinate.map(|c| c.latitude),
            lon: customer.coordinate.map(|c| c.longitude),
            service_day: customer.service_day.label().to_string(),
            active: customer.active,
            cleaning_started: customer.cleaning_started,
        }
    }
}

fn into_roster(rows: &[CustomerRow]) -> Roster {
    let mut roster = Roster::default();
    for row in rows {
        match row.to_customer() {
            Some(customer) => roster.customers.push(customer),
            None => {
                tracing::warn!(
                    "⚠️ Skipping customer #{} ({}): unrecognized service_day '{}'",
                    row.id,
                    row.name,
                    row.service_day
                );
                roster.warnings.push(DataQualityWarning {
                    customer_id: CustomerId(row.id),
                    customer_name: row.name.clone(),
                    kind: WarningKind::UnknownServiceDay,
                });
            }
        }
    }
    roster
}

pub struct CsvCustomerStore<S: Storage> {
    storage: S,
    // 讀-改-寫期間持有，避免同時寫入互相覆蓋
    write_lock: Mutex<()>,
}

impl<S: Storage> CsvCustomerStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_rows(&self) -> Result<Vec<CustomerRow>> {
        let data = match self.storage.read_file(ROSTER_FILE).await {
            Ok(data) => data,
            Err(RouteError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} not found, starting with an empty roster", ROSTER_FILE);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut reader = csv::Reader::from_reader(data.as_slice());
        let mut rows = Vec::new();
        for row in reader.deserialize::<CustomerRow>() {
            rows.push(row?);
        }
        Ok(rows)
    }

    // 無法辨識的列原樣寫回，不會因更新其他客戶而遺失
    async fn write_rows(&self, rows: &[CustomerRow]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| RouteError::IoError(e.into_error()))?;

        tracing::debug!("Writing {} customer(s) to {}", rows.len(), ROSTER_FILE);
        self.storage.write_file(ROSTER_FILE, &data).await
    }

    async fn update<F>(&self, id: CustomerId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut CustomerRow) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_rows().await?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id.0)
            .ok_or_else(|| RouteError::not_found(format!("Customer #{} does not exist", id)))?;
        apply(row);
        self.write_rows(&rows).await
    }
}

impl<S: Storage> CustomerStore for CsvCustomerStore<S> {
    async fn load_all(&self) -> Result<Roster> {
        let rows = self.read_rows().await?;
        Ok(into_roster(&rows))
    }

    async fn find(&self, id: CustomerId) -> Result<Option<Customer>> {
        let rows = self.read_rows().await?;
        match rows.iter().find(|row| row.id == id.0) {
            Some(row) => row
                .to_customer()
                .map(Some)
                .ok_or_else(|| row.unknown_day_error()),
            None => Ok(None),
        }
    }

    async fn insert(&self, new_customer: NewCustomer) -> Result<Customer> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_rows().await?;
        let next_id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;

        let customer = Customer {
            id: CustomerId(next_id),
            name: new_customer.name,
            address: new_customer.address,
            email: new_customer.email,
            coordinate: Some(new_customer.coordinate),
            service_day: new_customer.service_day,
            active: true,
            cleaning_started: false,
        };
        rows.push(CustomerRow::from_customer(&customer));
        self.write_rows(&rows).await?;
        Ok(customer)
    }

    async fn set_active(&self, id: CustomerId, active: bool) -> Result<()> {
        self.update(id, |row| row.active = active).await
    }

    async fn mark_cleaning_started(&self, id: CustomerId) -> Result<()> {
        self.update(id, |row| row.cleaning_started = true).await
    }
}
