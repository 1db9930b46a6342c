use std::sync::Mutex;

use async_trait::async_trait;

use super::HospitalApi;
use crate::error::AppError;
use crate::models::{AgendaPayload, Building, Collections, Doctor, Room, ScheduleEntry, Specialty};

/// In-process stand-in for the hospital service. Backs the offline mode and
/// the tests; writes behave like the real endpoints (ids are assigned on
/// create, unknown ids are rejected).
pub struct InMemoryHospital {
    data: Mutex<Collections>,
    online: Mutex<bool>,
}

impl InMemoryHospital {
    pub fn new(collections: Collections) -> Self {
        Self {
            data: Mutex::new(collections),
            online: Mutex::new(true),
        }
    }

    /// Simulate the service going away; every call fails until restored.
    pub fn set_online(&self, online: bool) {
        if let Ok(mut flag) = self.online.lock() {
            *flag = online;
        }
    }

    pub fn schedule_entries(&self) -> Vec<ScheduleEntry> {
        self.data
            .lock()
            .map(|d| d.schedule_entries.clone())
            .unwrap_or_default()
    }

    fn with_data<T>(&self, f: impl FnOnce(&mut Collections) -> Result<T, AppError>) -> Result<T, AppError> {
        let online = self.online.lock().map(|f| *f).unwrap_or(false);
        if !online {
            return Err(AppError::Upstream("Servicio no disponible".to_string()));
        }
        let mut data = self.data.lock().map_err(|_| AppError::InternalServerError)?;
        f(&mut data)
    }
}

fn entry_from_payload(id: i64, payload: &AgendaPayload) -> ScheduleEntry {
    ScheduleEntry {
        codigo_agenda: id,
        codigo_consultorio: payload.codigo_consultorio,
        codigo_prestador: payload.codigo_prestador,
        codigo_item_agendamiento: payload.codigo_item_agendamiento,
        codigo_dia: payload.codigo_dia,
        hora_inicio: payload.hora_inicio.clone(),
        hora_fin: payload.hora_fin.clone(),
        tipo: payload.tipo.clone(),
        estado: None,
    }
}

#[async_trait]
impl HospitalApi for InMemoryHospital {
    async fn health(&self) -> Result<(), AppError> {
        self.with_data(|_| Ok(()))
    }

    async fn fetch_doctors(&self) -> Result<Vec<Doctor>, AppError> {
        self.with_data(|d| Ok(d.doctors.clone()))
    }

    async fn fetch_specialties(&self) -> Result<Vec<Specialty>, AppError> {
        self.with_data(|d| Ok(d.specialties.clone()))
    }

    async fn fetch_schedule_entries(&self) -> Result<Vec<ScheduleEntry>, AppError> {
        self.with_data(|d| Ok(d.schedule_entries.clone()))
    }

    async fn fetch_rooms(&self) -> Result<Vec<Room>, AppError> {
        self.with_data(|d| Ok(d.rooms.clone()))
    }

    async fn fetch_buildings(&self) -> Result<Vec<Building>, AppError> {
        self.with_data(|d| Ok(d.buildings.clone()))
    }

    async fn create_agenda(&self, payload: &AgendaPayload) -> Result<(), AppError> {
        if payload.codigo_agenda.is_some() {
            return Err(AppError::BadRequest(
                "codigo_agenda must not be sent on create".to_string(),
            ));
        }
        self.with_data(|d| {
            let next_id = d
                .schedule_entries
                .iter()
                .map(|e| e.codigo_agenda)
                .max()
                .unwrap_or(0)
                + 1;
            d.schedule_entries.push(entry_from_payload(next_id, payload));
            Ok(())
        })
    }

    async fn update_agenda(&self, id: i64, payload: &AgendaPayload) -> Result<(), AppError> {
        self.with_data(|d| {
            let entry = d
                .schedule_entries
                .iter_mut()
                .find(|e| e.codigo_agenda == id)
                .ok_or(AppError::NotFound)?;
            *entry = entry_from_payload(id, payload);
            Ok(())
        })
    }

    async fn delete_agenda(&self, id: i64) -> Result<(), AppError> {
        self.with_data(|d| {
            let before = d.schedule_entries.len();
            d.schedule_entries.retain(|e| e.codigo_agenda != id);
            if d.schedule_entries.len() == before {
                Err(AppError::NotFound)
            } else {
                Ok(())
            }
        })
    }
}
