use crate::domain::model::{
    Coordinate, Customer, CustomerId, DirectionStep, NewCustomer, Roster, ServiceReport,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 客戶名冊的存取介面
pub trait CustomerStore: Send + Sync {
    /// 無法解析的列不會讓整份名冊失敗，而是列在 `Roster::warnings`
    fn load_all(&self) -> impl std::future::Future<Output = Result<Roster>> + Send;
    fn find(
        &self,
        id: CustomerId,
    ) -> impl std::future::Future<Output = Result<Option<Customer>>> + Send;
    fn insert(
        &self,
        customer: NewCustomer,
    ) -> impl std::future::Future<Output = Result<Customer>> + Send;
    fn set_active(
        &self,
        id: CustomerId,
        active: bool,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn mark_cleaning_started(
        &self,
        id: CustomerId,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// 查無地址時回傳 `Ok(None)`
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>>;
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn directions(&self, from: Coordinate, to: Coordinate) -> Result<Vec<DirectionStep>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// `Ok(false)` 表示服務拒收；傳輸錯誤則回傳 `Err`
    async fn send(&self, report: &ServiceReport) -> Result<bool>;
}
