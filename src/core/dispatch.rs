use crate::core::planner::RoutePlanner;
use crate::domain::model::{
    Attachment, Customer, CustomerId, DataQualityWarning, DirectionStep, DistanceUnit,
    ServiceDay, ServiceReport,
};
use crate::domain::ports::{CustomerStore, DirectionsProvider, Notifier};
use crate::utils::error::{Result, RouteError};
use serde::Serialize;

pub const DEFAULT_COMPANY_NAME: &str = "Bayco Pools";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "steps", rename_all = "snake_case")]
pub enum Directions {
    NotRequested,
    Available(Vec<DirectionStep>),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    pub position: usize,
    pub customer: Customer,
    pub distance: f64,
    pub directions: Directions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRoute {
    pub day: ServiceDay,
    pub unit: DistanceUnit,
    pub stops: Vec<RouteStop>,
    pub warnings: Vec<DataQualityWarning>,
}

impl DailyRoute {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// 排好當日路線後逐站查路線指引，並在完工時寄送服務報告
pub struct RouteDispatcher<S: CustomerStore> {
    store: S,
    planner: RoutePlanner,
    directions: Option<Box<dyn DirectionsProvider>>,
    notifier: Option<Box<dyn Notifier>>,
    company_name: String,
}

impl<S: CustomerStore> RouteDispatcher<S> {
    pub fn new(store: S, planner: RoutePlanner) -> Self {
        Self {
            store,
            planner,
            directions: None,
            notifier: None,
            company_name: DEFAULT_COMPANY_NAME.to_string(),
        }
    }

    pub fn with_directions(mut self, provider: impl DirectionsProvider + 'static) -> Self {
        self.directions = Some(Box::new(provider));
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = company_name.into();
        self
    }

    pub async fn todays_route(&self, day: ServiceDay) -> Result<DailyRoute> {
        tracing::info!("🧹 Building route for {}", day);
        let roster = self.store.load_all().await?;
        tracing::debug!(
            "Loaded {} customer(s) from the roster ({} skipped)",
            roster.customers.len(),
            roster.warnings.len()
        );

        let plan = self.planner.plan(&roster.customers, day);
        for warning in &plan.warnings {
            tracing::warn!("⚠️ {}", warning);
        }

        let mut stops = Vec::with_capacity(plan.len());
        for (index, entry) in plan.entries.iter().enumerate() {
            let directions = self.directions_for(entry.customer).await;
            stops.push(RouteStop {
                position: index + 1,
                customer: entry.customer.clone(),
                distance: entry.distance,
                directions,
            });
        }

        // 名冊略過的列排在規劃警告之前
        let mut warnings = roster.warnings;
        warnings.extend(plan.warnings);

        tracing::info!("✅ {} stop(s) scheduled for {}", stops.len(), day);
        Ok(DailyRoute {
            day: plan.day,
            unit: plan.unit,
            stops,
            warnings,
        })
    }

    async fn directions_for(&self, customer: &Customer) -> Directions {
        let (Some(provider), Some(destination)) = (&self.directions, customer.coordinate) else {
            return Directions::NotRequested;
        };

        match provider.directions(self.planner.depot(), destination).await {
            Ok(steps) => Directions::Available(steps),
            Err(e) => {
                // 單站失敗不影響整條路線
                tracing::warn!("Directions unavailable for {}: {}", customer.name, e);
                Directions::Unavailable(format!("Directions unavailable: {}", e))
            }
        }
    }

    pub async fn start_cleaning(&self, id: CustomerId) -> Result<Customer> {
        let customer = self.require_customer(id).await?;
        self.store.mark_cleaning_started(id).await?;
        tracing::info!("🚿 Started cleaning {}", customer.name);
        Ok(customer)
    }

    pub async fn finish_stop(
        &self,
        id: CustomerId,
        notes: &str,
        attachment: Option<Attachment>,
    ) -> Result<bool> {
        let notifier = self.notifier.as_ref().ok_or_else(|| RouteError::ConfigError {
            message: "No notifier configured; add a [notifier] section".to_string(),
        })?;
        let customer = self.require_customer(id).await?;
        let report = service_report(&self.company_name, &customer, notes, attachment);

        let sent = notifier.send(&report).await?;
        if sent {
            tracing::info!("📧 Service report sent to {}", customer.name);
        } else {
            tracing::warn!("Service report for {} was not accepted", customer.name);
        }
        Ok(sent)
    }

    async fn require_customer(&self, id: CustomerId) -> Result<Customer> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| RouteError::not_found(format!("Customer #{} does not exist", id)))
    }
}

pub fn service_report(
    company_name: &str,
    customer: &Customer,
    notes: &str,
    attachment: Option<Attachment>,
) -> ServiceReport {
    ServiceReport {
        recipient: customer.email.clone(),
        subject: format!("{} Service Report: {}", company_name, customer.name),
        body: format!(
            "Hi {},\n\nYour pool service is complete!\n\nNotes:\n{}\n\nHave a great day!",
            customer.name, notes
        ),
        attachment,
    }
}
