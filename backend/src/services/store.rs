use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{
    AgendaKind, AgendaPayload, Building, Collections, CombinedRecord, Doctor, Filters,
    PaginationInfo, RecordPatch, RecordState, Room, ScheduleEntry, Specialty,
};
use crate::schedule::reconcile::{
    available_floors, choose_room, default_building_floors, doctors_by_specialty,
    ACTIVE_STATUS,
};
use crate::schedule::{
    filter_records, is_valid_time, name_to_day_code, paginate, reconcile, to_backend_time,
    total_pages, ReconcileDefaults, WEEK_DAYS,
};

const NEW_ID_PREFIX: &str = "new-";
const DEFAULT_DAY: &str = "Lunes";

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub items_per_page: usize,
    pub default_building_id: i64,
    pub defaults: ReconcileDefaults,
}

impl StoreSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            items_per_page: config.items_per_page,
            default_building_id: config.default_building_id,
            defaults: config.reconcile_defaults(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Specialty,
    Building,
    Kind,
    Search,
}

/// What a save turns into upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveCommand {
    Create(AgendaPayload),
    Update(i64, AgendaPayload),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub records: Vec<CombinedRecord>,
    pub pagination: PaginationInfo,
    pub editing: Option<String>,
}

/// All dashboard state: the loaded collections, the reconciled rows plus any
/// local drafts, per-row edit state, filters, page and the last load error.
pub struct DashboardStore {
    collections: Collections,
    base: Vec<CombinedRecord>,
    records: Vec<CombinedRecord>,
    states: HashMap<String, RecordState>,
    filters: Filters,
    page: usize,
    last_error: Option<String>,
    settings: StoreSettings,
}

impl DashboardStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            collections: Collections::default(),
            base: Vec::new(),
            records: Vec::new(),
            states: HashMap::new(),
            filters: Filters::default(),
            page: 1,
            last_error: None,
            settings,
        }
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn records(&self) -> &[CombinedRecord] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&CombinedRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    // --- collections -------------------------------------------------------

    pub fn replace_all(&mut self, collections: Collections) {
        self.collections = collections;
        self.rebuild();
    }

    pub fn replace_doctors(&mut self, doctors: Vec<Doctor>) {
        self.collections.doctors = doctors;
        self.rebuild();
    }

    pub fn replace_specialties(&mut self, specialties: Vec<Specialty>) {
        self.collections.specialties = specialties;
        self.rebuild();
    }

    pub fn replace_schedule_entries(&mut self, entries: Vec<ScheduleEntry>) {
        self.collections.schedule_entries = entries;
        self.rebuild();
    }

    pub fn replace_rooms(&mut self, rooms: Vec<Room>) {
        self.collections.rooms = rooms;
        self.rebuild();
    }

    pub fn replace_buildings(&mut self, buildings: Vec<Building>) {
        self.collections.buildings = buildings;
        self.rebuild();
    }

    /// Re-derive the rows from the collections. Unsaved drafts stay on top
    /// and rows still being edited keep their local copy.
    fn rebuild(&mut self) {
        self.base = reconcile(&self.collections, &self.settings.defaults);

        let mut local: HashMap<String, CombinedRecord> = self
            .records
            .drain(..)
            .filter(|r| self.states.get(&r.id) == Some(&RecordState::Editing) || r.is_new())
            .map(|r| (r.id.clone(), r))
            .collect();

        let mut records: Vec<CombinedRecord> = Vec::with_capacity(self.base.len() + local.len());
        let mut drafts: Vec<CombinedRecord> = local
            .values()
            .filter(|r| r.is_new())
            .cloned()
            .collect();
        // newest draft first, ids are `new-<millis>`
        drafts.sort_by(|a, b| b.id.cmp(&a.id));
        for draft in &drafts {
            local.remove(&draft.id);
        }
        records.extend(drafts);

        for record in &self.base {
            match local.remove(&record.id) {
                Some(edited) => records.push(edited),
                None => records.push(record.clone()),
            }
        }

        self.states.retain(|id, _| records.iter().any(|r| &r.id == id));
        for record in records.iter_mut() {
            record.is_editing = self.states.get(&record.id) == Some(&RecordState::Editing);
        }

        debug!(records = records.len(), "records rebuilt");
        self.records = records;
    }

    // --- filters and pages ---------------------------------------------------

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            FilterKey::Specialty => self.filters.specialty = value,
            FilterKey::Building => self.filters.building = value,
            FilterKey::Kind => self.filters.kind = value,
            FilterKey::Search => self.filters.search_text = value,
        }
        self.page = 1;
    }

    /// Replace every filter at once; the page only resets when something
    /// actually changed.
    pub fn apply_filters(&mut self, filters: Filters) {
        if self.filters != filters {
            self.filters = filters;
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), AppError> {
        if page == 0 {
            return Err(AppError::BadRequest("page starts at 1".to_string()));
        }
        self.page = page;
        Ok(())
    }

    pub fn filtered(&self) -> Vec<CombinedRecord> {
        filter_records(&self.records, &self.filters)
    }

    pub fn view(&self) -> RecordView {
        let filtered = self.filtered();
        let page_size = self.settings.items_per_page;
        RecordView {
            records: paginate(&filtered, self.page, page_size).to_vec(),
            pagination: PaginationInfo {
                current_page: self.page,
                total_pages: total_pages(filtered.len(), page_size),
                items_per_page: page_size,
                total_items: filtered.len(),
            },
            editing: self.editing_id().map(str::to_string),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.states
            .iter()
            .find(|(_, state)| **state == RecordState::Editing)
            .map(|(id, _)| id.as_str())
    }

    // --- catalog helpers -----------------------------------------------------

    pub fn doctors_for(&self, specialty: &str) -> Vec<Doctor> {
        doctors_by_specialty(&self.collections.doctors, &self.collections.specialties, specialty)
    }

    /// Floors for a building; with no building, those of the default one.
    pub fn floors_for(&self, building: &str) -> Vec<String> {
        if building.is_empty() {
            default_building_floors(
                &self.collections.buildings,
                &self.collections.rooms,
                self.settings.default_building_id,
            )
        } else {
            available_floors(&self.collections.buildings, &self.collections.rooms, building)
        }
    }

    fn default_building_name(&self) -> String {
        self.collections
            .buildings
            .iter()
            .find(|b| b.codigo_edificio == self.settings.default_building_id)
            .map(|b| b.descripcion_edificio.clone())
            .unwrap_or_else(|| self.settings.defaults.building_name.clone())
    }

    // --- edit state ----------------------------------------------------------

    fn set_editing(&mut self, id: &str) {
        self.states.clear();
        self.states.insert(id.to_string(), RecordState::Editing);
        for record in self.records.iter_mut() {
            record.is_editing = record.id == id;
        }
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut CombinedRecord, AppError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound)
    }

    /// One row is edited at a time; every other row drops back to viewing.
    pub fn begin_edit(&mut self, id: &str) -> Result<(), AppError> {
        if self.record(id).is_none() {
            return Err(AppError::NotFound);
        }
        self.set_editing(id);
        Ok(())
    }

    /// Drafts disappear; persisted rows go back to their reconciled values.
    pub fn cancel_edit(&mut self, id: &str) -> Result<(), AppError> {
        let is_new = self.record(id).ok_or(AppError::NotFound)?.is_new();
        self.states.remove(id);

        if is_new {
            self.records.retain(|r| r.id != id);
            return Ok(());
        }

        let restored = self.base.iter().find(|r| r.id == id).cloned();
        let record = self.record_mut(id)?;
        match restored {
            Some(base) => *record = base,
            None => record.is_editing = false,
        }
        Ok(())
    }

    pub fn update_field(&mut self, id: &str, patch: RecordPatch) -> Result<CombinedRecord, AppError> {
        if self.states.get(id) != Some(&RecordState::Editing) {
            if self.record(id).is_none() {
                return Err(AppError::NotFound);
            }
            return Err(AppError::Conflict(format!("record {} is not being edited", id)));
        }

        if let Some(day) = &patch.day_name {
            if !WEEK_DAYS.iter().any(|(_, name)| name == day) {
                return Err(AppError::Validation(format!("unknown day: {}", day)));
            }
        }

        let doctor = match patch.doctor_id {
            Some(doctor_id) => Some(
                self.collections
                    .doctors
                    .iter()
                    .find(|d| d.id == doctor_id)
                    .cloned()
                    .ok_or_else(|| AppError::Validation(format!("unknown doctor: {}", doctor_id)))?,
            ),
            None => None,
        };
        let specialty_code = patch.specialty.as_ref().map(|description| {
            self.collections
                .specialties
                .iter()
                .find(|s| &s.descripcion == description)
                .map(|s| s.especialidad_id)
                .unwrap_or(0)
        });

        let buildings = &self.collections.buildings;
        let rooms = &self.collections.rooms;
        // applied to a copy so a rejected patch leaves the row untouched
        let mut record = self.record(id).cloned().ok_or(AppError::NotFound)?;

        if let (Some(description), Some(code)) = (patch.specialty, specialty_code) {
            record.specialty = description;
            record.scheduling_item_code = code;
            record.doctor_name.clear();
            record.doctor_id = 0;
        }
        if let Some(code) = patch.scheduling_item_code {
            record.scheduling_item_code = code;
        }
        if let Some(doctor) = doctor {
            record.doctor_name = doctor.nombres.clone();
            record.doctor_id = doctor.id;
            let matching = doctor
                .especialidades
                .iter()
                .find(|s| !record.specialty.is_empty() && s.descripcion == record.specialty)
                .or_else(|| doctor.especialidades.first());
            record.scheduling_item_code = matching.map(|s| s.especialidad_id).unwrap_or(0);
        }
        if let Some(building) = patch.building_name {
            record.building_name = building;
            record.floor_label.clear();
        }
        if let Some(floor) = patch.floor_label {
            record.floor_label = floor;
        }
        if let Some(day) = patch.day_name {
            record.day_name = day;
        }
        if let Some(start) = patch.start_time {
            record.start_time = start.trim().to_string();
        }
        if let Some(end) = patch.end_time {
            record.end_time = end.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            record.kind = kind;
        }

        let room = match patch.room_code {
            Some(code) => {
                let chosen = choose_room(
                    buildings,
                    rooms,
                    &record.building_name,
                    &record.floor_label,
                    Some(code),
                );
                if chosen != Some(code) {
                    return Err(AppError::Validation(format!(
                        "room {} is not on {} / {}",
                        code, record.building_name, record.floor_label
                    )));
                }
                chosen
            }
            None => choose_room(
                buildings,
                rooms,
                &record.building_name,
                &record.floor_label,
                record.room_code,
            ),
        };
        record.room_code = room;
        record.room_description = room.and_then(|code| {
            rooms
                .iter()
                .find(|r| r.codigo_consultorio == code)
                .and_then(|r| r.descripcion_consultorio.clone())
        });

        *self.record_mut(id)? = record.clone();
        Ok(record)
    }

    // --- drafts --------------------------------------------------------------

    fn next_draft_id(&self) -> String {
        let base = format!("{}{}", NEW_ID_PREFIX, Utc::now().timestamp_millis());
        if self.record(&base).is_none() {
            return base;
        }
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| self.record(candidate).is_none())
            .unwrap_or(base)
    }

    fn blank_draft(&self) -> CombinedRecord {
        CombinedRecord {
            id: self.next_draft_id(),
            doctor_id: 0,
            schedule_id: 0,
            doctor_name: String::new(),
            specialty: String::new(),
            kind: AgendaKind::Consulta,
            scheduling_item_code: 0,
            building_name: self.default_building_name(),
            floor_label: String::new(),
            room_code: None,
            room_description: None,
            day_name: DEFAULT_DAY.to_string(),
            start_time: String::new(),
            end_time: String::new(),
            status: ACTIVE_STATUS.to_string(),
            is_editing: true,
        }
    }

    fn push_draft(&mut self, draft: CombinedRecord) -> CombinedRecord {
        let id = draft.id.clone();
        self.records.insert(0, draft.clone());
        self.set_editing(&id);
        info!(id = %id, "draft record added");
        draft
    }

    pub fn add_record(&mut self) -> CombinedRecord {
        let draft = self.blank_draft();
        self.push_draft(draft)
    }

    pub fn add_record_for_doctor(&mut self, doctor_id: i64) -> Result<CombinedRecord, AppError> {
        let doctor = self
            .collections
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .cloned()
            .ok_or(AppError::NotFound)?;

        let mut draft = self.blank_draft();
        draft.doctor_id = doctor.id;
        draft.doctor_name = doctor.nombres;
        if let Some(first) = doctor.especialidades.first() {
            draft.specialty = first.descripcion.clone();
            draft.scheduling_item_code = first.especialidad_id;
        }
        Ok(self.push_draft(draft))
    }

    /// Copy of a row as a new draft in the default building, floor unset.
    pub fn duplicate(&mut self, id: &str) -> Result<CombinedRecord, AppError> {
        let source = self.record(id).cloned().ok_or(AppError::NotFound)?;
        let blank = self.blank_draft();
        let draft = CombinedRecord {
            id: blank.id,
            schedule_id: 0,
            building_name: blank.building_name,
            floor_label: String::new(),
            room_code: None,
            room_description: None,
            is_editing: true,
            ..source
        };
        Ok(self.push_draft(draft))
    }

    // --- persistence ---------------------------------------------------------

    /// Validate a row and build the upstream call for it.
    pub fn prepare_save(&self, id: &str) -> Result<SaveCommand, AppError> {
        let record = self.record(id).ok_or(AppError::NotFound)?;

        if record.scheduling_item_code == 0 {
            return Err(AppError::Validation("a specialty is required".to_string()));
        }
        if record.doctor_id == 0 {
            return Err(AppError::Validation("a doctor is required".to_string()));
        }
        if record.start_time.is_empty() || record.end_time.is_empty() {
            return Err(AppError::Validation("start and end times are required".to_string()));
        }
        if record.day_name.is_empty() {
            return Err(AppError::Validation("a day is required".to_string()));
        }
        if !is_valid_time(&record.start_time) || !is_valid_time(&record.end_time) {
            return Err(AppError::Validation("times must be in HH:MM format".to_string()));
        }
        let room = choose_room(
            &self.collections.buildings,
            &self.collections.rooms,
            &record.building_name,
            &record.floor_label,
            record.room_code,
        )
        .ok_or_else(|| {
            warn!(
                id = %record.id,
                building = %record.building_name,
                floor = %record.floor_label,
                "no room for building and floor"
            );
            AppError::Validation(format!(
                "no room found for {} / {}",
                record.building_name, record.floor_label
            ))
        })?;

        let payload = AgendaPayload {
            codigo_prestador: record.doctor_id,
            codigo_consultorio: room,
            codigo_item_agendamiento: record.scheduling_item_code,
            codigo_dia: i64::from(name_to_day_code(&record.day_name)),
            hora_inicio: to_backend_time(&record.start_time),
            hora_fin: to_backend_time(&record.end_time),
            tipo: record.kind.encode().to_string(),
            codigo_agenda: None,
        };

        if record.is_new() {
            Ok(SaveCommand::Create(payload))
        } else {
            Ok(SaveCommand::Update(
                record.schedule_id,
                AgendaPayload {
                    codigo_agenda: Some(record.schedule_id),
                    ..payload
                },
            ))
        }
    }

    /// After a successful write: the row leaves edit mode and a saved draft
    /// gives way to the persisted row the next reload brings in.
    pub fn finish_save(&mut self, id: &str) {
        self.states.remove(id);
        let is_draft = self.record(id).is_some_and(CombinedRecord::is_new);
        if is_draft {
            self.records.retain(|r| r.id != id);
        } else if let Ok(record) = self.record_mut(id) {
            record.is_editing = false;
        }
    }

    pub fn remove_local(&mut self, id: &str) -> Result<CombinedRecord, AppError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(AppError::NotFound)?;
        self.states.remove(id);
        Ok(self.records.remove(index))
    }

    // --- errors --------------------------------------------------------------

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hospital::placeholder;

    fn store() -> DashboardStore {
        let mut store = DashboardStore::new(StoreSettings {
            items_per_page: 2,
            ..StoreSettings::default()
        });
        store.replace_all(placeholder::collections());
        store
    }

    #[test]
    fn test_records_newest_first() {
        let store = store();
        let ids: Vec<i64> = store.records().iter().map(|r| r.schedule_id).collect();
        assert_eq!(ids, vec![104, 103, 102, 101]);
    }

    #[test]
    fn test_view_paginates() {
        let mut store = store();
        let view = store.view();
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.pagination.total_pages, 2);
        assert_eq!(view.pagination.total_items, 4);

        store.set_page(2).unwrap();
        assert_eq!(store.view().records[0].schedule_id, 102);
        store.set_page(3).unwrap();
        assert!(store.view().records.is_empty());
        assert!(store.set_page(0).is_err());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut store = store();
        store.set_page(2).unwrap();
        store.set_filter(FilterKey::Building, "Bless");
        assert_eq!(store.page(), 1);
        assert_eq!(store.view().pagination.total_items, 2);

        store.set_page(2).unwrap();
        store.apply_filters(store.filters().clone());
        assert_eq!(store.page(), 2);

        store.clear_filters();
        assert_eq!(store.page(), 1);
        assert_eq!(store.view().pagination.total_items, 4);
    }

    #[test]
    fn test_single_row_in_edit() {
        let mut store = store();
        store.begin_edit("101-1").unwrap();
        store.begin_edit("102-2").unwrap();
        assert_eq!(store.editing_id(), Some("102-2"));
        assert!(!store.record("101-1").unwrap().is_editing);
        assert!(store.record("102-2").unwrap().is_editing);
        assert!(matches!(store.begin_edit("nope"), Err(AppError::NotFound)));
    }

    #[test]
    fn test_update_requires_edit_mode() {
        let mut store = store();
        let patch = RecordPatch {
            start_time: Some("07:00".to_string()),
            ..RecordPatch::default()
        };
        assert!(matches!(store.update_field("101-1", patch), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_building_change_clears_floor() {
        let mut store = store();
        store.begin_edit("101-1").unwrap();
        let updated = store
            .update_field(
                "101-1",
                RecordPatch {
                    building_name: Some("Bless".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.floor_label, "");
        assert_eq!(updated.room_code, None);

        let updated = store
            .update_field(
                "101-1",
                RecordPatch {
                    floor_label: Some("Piso 3".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.room_code, Some(201));
        assert_eq!(updated.room_description.as_deref(), Some("Consultorio 201"));
    }

    #[test]
    fn test_specialty_change_clears_doctor() {
        let mut store = store();
        store.begin_edit("101-1").unwrap();
        let updated = store
            .update_field(
                "101-1",
                RecordPatch {
                    specialty: Some("Neurología".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.doctor_id, 0);
        assert_eq!(updated.doctor_name, "");
        assert_eq!(updated.scheduling_item_code, 3);

        let updated = store
            .update_field(
                "101-1",
                RecordPatch {
                    doctor_id: Some(3),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.doctor_name, "Dr. Carlos Mendoza");
        assert_eq!(updated.scheduling_item_code, 3);
    }

    #[test]
    fn test_update_rejects_unknown_day() {
        let mut store = store();
        store.begin_edit("101-1").unwrap();
        let patch = RecordPatch {
            day_name: Some("Funday".to_string()),
            ..RecordPatch::default()
        };
        assert!(matches!(store.update_field("101-1", patch), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_cancel_restores_persisted_row() {
        let mut store = store();
        store.begin_edit("101-1").unwrap();
        store
            .update_field(
                "101-1",
                RecordPatch {
                    start_time: Some("06:30".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        store.cancel_edit("101-1").unwrap();

        let record = store.record("101-1").unwrap();
        assert_eq!(record.start_time, "08:00");
        assert!(!record.is_editing);
        assert_eq!(store.editing_id(), None);
    }

    #[test]
    fn test_cancel_drops_draft() {
        let mut store = store();
        let draft = store.add_record();
        assert_eq!(store.records().len(), 5);
        store.cancel_edit(&draft.id).unwrap();
        assert_eq!(store.records().len(), 4);
    }

    #[test]
    fn test_add_record_defaults() {
        let mut store = store();
        let draft = store.add_record();
        assert!(draft.id.starts_with("new-"));
        assert_eq!(draft.schedule_id, 0);
        assert_eq!(draft.building_name, "Hospital Principal");
        assert_eq!(draft.floor_label, "");
        assert_eq!(draft.day_name, "Lunes");
        assert_eq!(draft.kind, AgendaKind::Consulta);
        assert_eq!(store.records()[0].id, draft.id);
        assert_eq!(store.editing_id(), Some(draft.id.as_str()));

        let second = store.add_record();
        assert_ne!(second.id, draft.id);
    }

    #[test]
    fn test_add_record_for_doctor() {
        let mut store = store();
        let draft = store.add_record_for_doctor(2).unwrap();
        assert_eq!(draft.doctor_name, "Dra. María Torres");
        assert_eq!(draft.specialty, "Pediatría");
        assert_eq!(draft.scheduling_item_code, 2);
        assert!(matches!(store.add_record_for_doctor(99), Err(AppError::NotFound)));
    }

    #[test]
    fn test_duplicate_resets_location() {
        let mut store = store();
        let copy = store.duplicate("102-2").unwrap();
        assert_eq!(copy.schedule_id, 0);
        assert_eq!(copy.doctor_id, 2);
        assert_eq!(copy.specialty, "Pediatría");
        assert_eq!(copy.building_name, "Hospital Principal");
        assert_eq!(copy.floor_label, "");
        assert_eq!(copy.room_code, None);
        assert!(copy.is_editing);
    }

    #[test]
    fn test_prepare_save_create_and_update() {
        let mut store = store();
        let draft = store.add_record_for_doctor(1).unwrap();
        store
            .update_field(
                &draft.id,
                RecordPatch {
                    floor_label: Some("Piso 2".to_string()),
                    day_name: Some("Miércoles".to_string()),
                    start_time: Some("8:15".to_string()),
                    end_time: Some("10:00".to_string()),
                    kind: Some(AgendaKind::Procedimiento),
                    ..RecordPatch::default()
                },
            )
            .unwrap();

        let command = store.prepare_save(&draft.id).unwrap();
        assert_eq!(
            command,
            SaveCommand::Create(AgendaPayload {
                codigo_prestador: 1,
                codigo_consultorio: 102,
                codigo_item_agendamiento: 1,
                codigo_dia: 3,
                hora_inicio: "1900-01-01 08:15".to_string(),
                hora_fin: "1900-01-01 10:00".to_string(),
                tipo: "P".to_string(),
                codigo_agenda: None,
            })
        );

        match store.prepare_save("101-1").unwrap() {
            SaveCommand::Update(id, payload) => {
                assert_eq!(id, 101);
                assert_eq!(payload.codigo_agenda, Some(101));
                assert_eq!(payload.codigo_consultorio, 101);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    fn store_with_second_room() -> DashboardStore {
        let mut collections = placeholder::collections();
        collections.rooms.push(Room {
            codigo_consultorio: 205,
            codigo_edificio: 3,
            codigo_piso: 3,
            descripcion_consultorio: Some("Consultorio 205".to_string()),
        });
        for entry in collections.schedule_entries.iter_mut() {
            if entry.codigo_agenda == 102 {
                entry.codigo_consultorio = 205;
            }
        }
        let mut store = DashboardStore::new(StoreSettings::default());
        store.replace_all(collections);
        store
    }

    #[test]
    fn test_edit_keeps_room_on_shared_floor() {
        let mut store = store_with_second_room();
        assert_eq!(store.record("102-2").unwrap().room_code, Some(205));

        store.begin_edit("102-2").unwrap();
        let updated = store
            .update_field(
                "102-2",
                RecordPatch {
                    start_time: Some("07:30".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.room_code, Some(205));
        assert_eq!(updated.room_description.as_deref(), Some("Consultorio 205"));

        match store.prepare_save("102-2").unwrap() {
            SaveCommand::Update(id, payload) => {
                assert_eq!(id, 102);
                assert_eq!(payload.codigo_consultorio, 205);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_room_patch_is_checked_against_floor() {
        let mut store = store_with_second_room();
        store.begin_edit("102-2").unwrap();

        let updated = store
            .update_field(
                "102-2",
                RecordPatch {
                    room_code: Some(201),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.room_code, Some(201));

        // 202 is on Piso 5
        let patch = RecordPatch {
            room_code: Some(202),
            ..RecordPatch::default()
        };
        assert!(matches!(store.update_field("102-2", patch), Err(AppError::Validation(_))));
        assert_eq!(store.record("102-2").unwrap().room_code, Some(201));

        let updated = store
            .update_field(
                "102-2",
                RecordPatch {
                    floor_label: Some("Piso 5".to_string()),
                    room_code: Some(202),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.room_code, Some(202));
    }

    #[test]
    fn test_prepare_save_validation() {
        let mut store = store();
        let draft = store.add_record();
        assert!(matches!(store.prepare_save(&draft.id), Err(AppError::Validation(_))));

        let draft = store.add_record_for_doctor(1).unwrap();
        store
            .update_field(
                &draft.id,
                RecordPatch {
                    start_time: Some("9.00".to_string()),
                    end_time: Some("10:00".to_string()),
                    floor_label: Some("Piso 1".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert!(matches!(store.prepare_save(&draft.id), Err(AppError::Validation(_))));

        store
            .update_field(
                &draft.id,
                RecordPatch {
                    start_time: Some("09:00".to_string()),
                    floor_label: Some("Piso 9".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();
        assert!(matches!(store.prepare_save(&draft.id), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rebuild_keeps_drafts_and_edits() {
        let mut store = store();
        let draft = store.add_record();
        store.begin_edit("103-3").unwrap();
        store
            .update_field(
                "103-3",
                RecordPatch {
                    end_time: Some("19:00".to_string()),
                    ..RecordPatch::default()
                },
            )
            .unwrap();

        let mut entries = store.collections().schedule_entries.clone();
        entries.retain(|e| e.codigo_agenda != 104);
        store.replace_schedule_entries(entries);

        assert_eq!(store.records()[0].id, draft.id);
        assert_eq!(store.records().len(), 4);
        let edited = store.record("103-3").unwrap();
        assert_eq!(edited.end_time, "19:00");
        assert!(edited.is_editing);
        assert!(store.record("104-4").is_none());
    }

    #[test]
    fn test_finish_save_and_remove_local() {
        let mut store = store();
        let draft = store.add_record();
        store.finish_save(&draft.id);
        assert!(store.record(&draft.id).is_none());

        store.begin_edit("101-1").unwrap();
        store.finish_save("101-1");
        assert!(!store.record("101-1").unwrap().is_editing);
        assert_eq!(store.editing_id(), None);

        store.remove_local("102-2").unwrap();
        assert!(store.record("102-2").is_none());
        assert!(store.remove_local("102-2").is_err());
    }

    #[test]
    fn test_floors_for() {
        let store = store();
        assert_eq!(store.floors_for(""), vec!["Piso 1", "Piso 2"]);
        assert_eq!(store.floors_for("Bless"), vec!["Piso 3", "Piso 5"]);
        assert!(store.floors_for("Nowhere").is_empty());
    }

    #[test]
    fn test_error_slot() {
        let mut store = store();
        assert_eq!(store.last_error(), None);
        store.set_error("boom");
        assert_eq!(store.last_error(), Some("boom"));
        store.clear_error();
        assert_eq!(store.last_error(), None);
    }
}
