use crate::domain::model::{Customer, CustomerId, NewCustomer, Roster, ServiceDay};
use crate::domain::ports::{CustomerStore, Geocoder};
use crate::utils::error::{Result, RouteError};
use crate::utils::validation::{validate_email, validate_non_empty_string};

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomerRequest {
    pub name: String,
    pub address: String,
    pub email: String,
    pub service_day: ServiceDay,
}

pub struct RosterManager<S: CustomerStore, G: Geocoder> {
    store: S,
    geocoder: G,
}

impl<S: CustomerStore, G: Geocoder> RosterManager<S, G> {
    pub fn new(store: S, geocoder: G) -> Self {
        Self { store, geocoder }
    }

    /// 整份名冊，含無法解析而略過的列
    pub async fn list(&self) -> Result<Roster> {
        self.store.load_all().await
    }

    /// 先驗證欄位，再查地址座標，最後寫入名冊
    pub async fn add_customer(&self, request: NewCustomerRequest) -> Result<Customer> {
        for (field, value) in [
            ("name", &request.name),
            ("address", &request.address),
            ("email", &request.email),
        ] {
            if validate_non_empty_string(field, value).is_err() {
                return Err(RouteError::ValidationError {
                    message: "All fields are required.".to_string(),
                });
            }
        }
        validate_email("email", &request.email).map_err(|e| RouteError::ValidationError {
            message: e.to_string(),
        })?;

        tracing::debug!("Geocoding address: {}", request.address);
        let coordinate = self
            .geocoder
            .geocode(request.address.trim())
            .await?
            .ok_or_else(|| RouteError::not_found(format!("Address not found: {}", request.address)))?;

        let customer = self
            .store
            .insert(NewCustomer {
                name: request.name.trim().to_string(),
                address: request.address.trim().to_string(),
                email: request.email.trim().to_string(),
                coordinate,
                service_day: request.service_day,
            })
            .await?;

        tracing::info!("➕ Added {} (#{}) on {}", customer.name, customer.id, customer.service_day);
        Ok(customer)
    }

    pub async fn set_active(&self, id: CustomerId, active: bool) -> Result<()> {
        self.store.set_active(id, active).await?;
        tracing::info!("Customer #{} active = {}", id, active);
        Ok(())
    }
}
