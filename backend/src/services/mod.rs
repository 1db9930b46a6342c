pub mod dashboard;
pub mod store;

pub use dashboard::{ConnectionStatus, DashboardOptions, DashboardService, LoadReport, StatusReport};
pub use store::{DashboardStore, FilterKey, RecordView, SaveCommand, StoreSettings};
