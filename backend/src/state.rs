use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::hospital::HospitalApi;
use crate::services::{DashboardOptions, DashboardService, DashboardStore, StoreSettings};

#[derive(Clone)]
pub struct AppState {
    pub hospital: Arc<dyn HospitalApi>,
    pub store: Arc<Mutex<DashboardStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(hospital: Arc<dyn HospitalApi>, config: AppConfig) -> Self {
        Self {
            hospital,
            store: Arc::new(Mutex::new(DashboardStore::new(StoreSettings::from_config(&config)))),
            config: Arc::new(config),
        }
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(
            self.hospital.clone(),
            self.store.clone(),
            DashboardOptions::from_config(&self.config),
        )
    }
}
