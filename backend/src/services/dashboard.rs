use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::export::{export_rows, generate_workbook, ExportFile, ExportOptions};
use crate::hospital::{placeholder, HospitalApi};
use crate::models::Collections;
use crate::services::store::{DashboardStore, SaveCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub doctors: usize,
    pub specialties: usize,
    pub schedule_entries: usize,
    pub rooms: usize,
    pub buildings: usize,
    pub records: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub connection: ConnectionStatus,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub placeholder_fallback: bool,
    pub export: ExportOptions,
}

impl DashboardOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            placeholder_fallback: config.placeholder_fallback,
            export: config.export_options(),
        }
    }
}

/// Keep the fetched collection, or the prior one on failure. An empty prior
/// collection is replaced by placeholder data when the fallback is enabled.
fn settle<T>(
    name: &str,
    result: Result<Vec<T>, AppError>,
    prior: &mut Vec<T>,
    placeholder: impl FnOnce() -> Vec<T>,
    fallback: bool,
    errors: &mut Vec<String>,
) {
    match result {
        Ok(items) => *prior = items,
        Err(e) => {
            warn!(collection = name, error = %e, "load failed, keeping previous data");
            errors.push(format!("{}: {}", name, e));
            if fallback && prior.is_empty() {
                warn!(target: "agenda::fallback", collection = name, "using placeholder data");
                *prior = placeholder();
            }
        }
    }
}

pub struct DashboardService {
    hospital: Arc<dyn HospitalApi>,
    store: Arc<Mutex<DashboardStore>>,
    options: DashboardOptions,
}

impl DashboardService {
    pub fn new(
        hospital: Arc<dyn HospitalApi>,
        store: Arc<Mutex<DashboardStore>>,
        options: DashboardOptions,
    ) -> Self {
        Self {
            hospital,
            store,
            options,
        }
    }

    /// Fetch all five collections concurrently and rebuild the rows. A failed
    /// collection keeps its previous contents and sets the store's error.
    pub async fn load_all(&self) -> LoadReport {
        info!("Loading dashboard collections...");
        let (doctors, specialties, entries, rooms, buildings) = tokio::join!(
            self.hospital.fetch_doctors(),
            self.hospital.fetch_specialties(),
            self.hospital.fetch_schedule_entries(),
            self.hospital.fetch_rooms(),
            self.hospital.fetch_buildings(),
        );

        let mut store = self.store.lock().await;
        let mut next: Collections = store.collections().clone();
        let mut errors = Vec::new();
        let fallback = self.options.placeholder_fallback;

        settle("doctors", doctors, &mut next.doctors, placeholder::doctors, fallback, &mut errors);
        settle("specialties", specialties, &mut next.specialties, placeholder::specialties, fallback, &mut errors);
        settle("schedule", entries, &mut next.schedule_entries, placeholder::schedule_entries, fallback, &mut errors);
        settle("rooms", rooms, &mut next.rooms, placeholder::rooms, fallback, &mut errors);
        settle("buildings", buildings, &mut next.buildings, placeholder::buildings, fallback, &mut errors);

        store.replace_all(next);
        match errors.last() {
            Some(message) => store.set_error(message.clone()),
            None => store.clear_error(),
        }

        let collections = store.collections();
        let report = LoadReport {
            doctors: collections.doctors.len(),
            specialties: collections.specialties.len(),
            schedule_entries: collections.schedule_entries.len(),
            rooms: collections.rooms.len(),
            buildings: collections.buildings.len(),
            records: store.records().len(),
            errors,
        };
        info!(
            records = report.records,
            failed = report.errors.len(),
            "Dashboard collections loaded"
        );
        report
    }

    /// Writes are followed by a full reload so the rows reflect upstream.
    pub async fn reload_schedule(&self) -> LoadReport {
        self.load_all().await
    }

    pub async fn save(&self, id: &str) -> Result<(), AppError> {
        let command = self.store.lock().await.prepare_save(id)?;

        let result = match &command {
            SaveCommand::Create(payload) => self.hospital.create_agenda(payload).await,
            SaveCommand::Update(schedule_id, payload) => {
                self.hospital.update_agenda(*schedule_id, payload).await
            }
        };

        if let Err(e) = result {
            warn!(id, error = %e, "save failed, record stays in edit mode");
            self.store.lock().await.set_error(e.to_string());
            return Err(e);
        }

        info!(id, "record saved");
        self.store.lock().await.finish_save(id);
        self.reload_schedule().await;
        Ok(())
    }

    /// Drafts are only dropped locally; persisted rows are deleted upstream.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let schedule_id = {
            let mut store = self.store.lock().await;
            let record = store.record(id).ok_or(AppError::NotFound)?;
            if record.is_new() {
                store.remove_local(id)?;
                return Ok(());
            }
            record.schedule_id
        };

        if let Err(e) = self.hospital.delete_agenda(schedule_id).await {
            warn!(id, schedule_id, error = %e, "delete failed");
            self.store.lock().await.set_error(e.to_string());
            return Err(e);
        }

        info!(id, schedule_id, "record deleted");
        // the reload below drops it anyway
        let _ = self.store.lock().await.remove_local(id);
        self.reload_schedule().await;
        Ok(())
    }

    /// The currently filtered rows as a staff sheet.
    pub async fn export(&self) -> ExportFile {
        let records = self.store.lock().await.filtered();
        let rows = export_rows(&records);
        generate_workbook(&rows, &self.options.export)
    }

    pub async fn health(&self) -> ConnectionStatus {
        match self.hospital.health().await {
            Ok(()) => ConnectionStatus::Connected,
            Err(e) => {
                warn!(error = %e, "hospital service health check failed");
                ConnectionStatus::Disconnected
            }
        }
    }

    pub async fn status(&self) -> StatusReport {
        let connection = self.health().await;
        let last_error = self.store.lock().await.last_error().map(str::to_string);
        StatusReport {
            connection,
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hospital::InMemoryHospital;
    use crate::models::RecordPatch;
    use crate::services::store::StoreSettings;

    fn setup(fallback: bool) -> (Arc<InMemoryHospital>, Arc<Mutex<DashboardStore>>, DashboardService) {
        let hospital = Arc::new(InMemoryHospital::new(placeholder::collections()));
        let store = Arc::new(Mutex::new(DashboardStore::new(StoreSettings::default())));
        let service = DashboardService::new(
            hospital.clone(),
            store.clone(),
            DashboardOptions {
                placeholder_fallback: fallback,
                ..DashboardOptions::default()
            },
        );
        (hospital, store, service)
    }

    #[tokio::test]
    async fn test_load_all() {
        let (_, store, service) = setup(false);
        let report = service.load_all().await;
        assert!(report.errors.is_empty());
        assert_eq!(report.records, 4);
        assert_eq!(store.lock().await.last_error(), None);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_prior_state() {
        let (hospital, store, service) = setup(false);
        service.load_all().await;

        hospital.set_online(false);
        let report = service.load_all().await;
        assert_eq!(report.errors.len(), 5);
        assert_eq!(report.records, 4);
        assert!(store.lock().await.last_error().is_some());

        hospital.set_online(true);
        service.load_all().await;
        assert_eq!(store.lock().await.last_error(), None);
    }

    #[tokio::test]
    async fn test_failed_first_load_without_fallback_is_empty() {
        let (hospital, _, service) = setup(false);
        hospital.set_online(false);
        let report = service.load_all().await;
        assert_eq!(report.records, 0);
    }

    #[tokio::test]
    async fn test_failed_first_load_uses_placeholders() {
        let (hospital, _, service) = setup(true);
        hospital.set_online(false);
        let report = service.load_all().await;
        assert_eq!(report.records, 4);
        assert_eq!(report.doctors, 4);
    }

    #[tokio::test]
    async fn test_save_new_record_creates_and_reloads() {
        let (hospital, store, service) = setup(false);
        service.load_all().await;

        let draft_id = {
            let mut store = store.lock().await;
            let draft = store.add_record_for_doctor(4).unwrap();
            store
                .update_field(
                    &draft.id,
                    RecordPatch {
                        floor_label: Some("Piso 1".to_string()),
                        start_time: Some("07:00".to_string()),
                        end_time: Some("09:00".to_string()),
                        ..RecordPatch::default()
                    },
                )
                .unwrap();
            draft.id
        };

        service.save(&draft_id).await.unwrap();

        assert_eq!(hospital.schedule_entries().len(), 5);
        let store = store.lock().await;
        assert!(store.record(&draft_id).is_none());
        let saved = store.record("105-4").expect("persisted row");
        assert_eq!(saved.start_time, "07:00");
        assert!(!saved.is_editing);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_editing() {
        let (hospital, store, service) = setup(false);
        service.load_all().await;
        store.lock().await.begin_edit("101-1").unwrap();

        hospital.set_online(false);
        assert!(service.save("101-1").await.is_err());

        let store = store.lock().await;
        assert!(store.record("101-1").unwrap().is_editing);
        assert!(store.last_error().is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let (hospital, store, service) = setup(false);
        service.load_all().await;

        let draft = store.lock().await.add_record();
        service.delete(&draft.id).await.unwrap();
        assert_eq!(hospital.schedule_entries().len(), 4);

        service.delete("104-4").await.unwrap();
        assert_eq!(hospital.schedule_entries().len(), 3);
        assert!(store.lock().await.record("104-4").is_none());

        assert!(matches!(service.delete("104-4").await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_export_and_status() {
        let (hospital, _, service) = setup(false);
        service.load_all().await;

        let file = service.export().await;
        assert!(matches!(file, ExportFile::Xlsx(_)));

        assert_eq!(service.status().await.connection, ConnectionStatus::Connected);
        hospital.set_online(false);
        assert_eq!(service.health().await, ConnectionStatus::Disconnected);
    }
}
