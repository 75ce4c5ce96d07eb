// Adapters layer: concrete implementations for external systems (storage, roster file, http services).

pub mod customer_store;
pub mod directions;
pub mod geocoder;
pub mod notifier;
pub mod storage;
