//! Joins the upstream collections into dashboard rows.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{
    AgendaKind, Building, CombinedRecord, Collections, Doctor, Room, ScheduleEntry, Specialty,
    ALL_SPECIALTIES,
};
use crate::schedule::days::day_code_to_name;
use crate::schedule::time::to_display_time;

pub const DOCTOR_NOT_FOUND: &str = "Doctor no encontrado";
pub const NO_SPECIALTY: &str = "Sin especialidad";
pub const ACTIVE_STATUS: &str = "Activa";
pub const UNRESOLVED_FLOOR: &str = "1";

#[derive(Debug, Clone)]
pub struct ReconcileDefaults {
    pub building_name: String,
}

impl Default for ReconcileDefaults {
    fn default() -> Self {
        Self {
            building_name: "Hospital Principal".to_string(),
        }
    }
}

pub fn floor_label(floor: i64) -> String {
    format!("Piso {}", floor)
}

/// Index by id. On duplicate ids the first occurrence wins.
fn first_by_key<T>(items: &[T], key: impl Fn(&T) -> i64) -> HashMap<i64, &T> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.entry(key(item)).or_insert(item);
    }
    map
}

/// Build one record per schedule entry, newest schedule first.
///
/// Returns nothing until both schedule entries and rooms are loaded: without
/// rooms every row would show the fallback building.
pub fn reconcile(collections: &Collections, defaults: &ReconcileDefaults) -> Vec<CombinedRecord> {
    if collections.schedule_entries.is_empty() || collections.rooms.is_empty() {
        debug!(
            entries = collections.schedule_entries.len(),
            rooms = collections.rooms.len(),
            "skipping reconcile until schedule entries and rooms are loaded"
        );
        return Vec::new();
    }

    let doctors = first_by_key(&collections.doctors, |d| d.id);
    let rooms = first_by_key(&collections.rooms, |r| r.codigo_consultorio);
    let buildings = first_by_key(&collections.buildings, |b| b.codigo_edificio);

    let mut records: Vec<CombinedRecord> = collections
        .schedule_entries
        .iter()
        .map(|entry| {
            combine(
                entry,
                doctors.get(&entry.codigo_prestador).copied(),
                rooms.get(&entry.codigo_consultorio).copied(),
                &buildings,
                &collections.specialties,
                defaults,
            )
        })
        .collect();

    // stable: equal ids keep their upstream order
    records.sort_by(|a, b| b.schedule_id.cmp(&a.schedule_id));
    records
}

fn combine(
    entry: &ScheduleEntry,
    doctor: Option<&Doctor>,
    room: Option<&Room>,
    buildings: &HashMap<i64, &Building>,
    specialties: &[Specialty],
    defaults: &ReconcileDefaults,
) -> CombinedRecord {
    let schedule_id = entry.codigo_agenda;

    let (doctor_id, doctor_name) = match doctor {
        Some(d) => (d.id, d.nombres.clone()),
        None => {
            warn!(
                target: "agenda::fallback",
                schedule_id,
                provider = entry.codigo_prestador,
                "doctor not found"
            );
            (0, DOCTOR_NOT_FOUND.to_string())
        }
    };

    let specialty = resolve_specialty(entry.codigo_item_agendamiento, doctor, specialties)
        .unwrap_or_else(|| {
            warn!(target: "agenda::fallback", schedule_id, "no specialty resolved");
            NO_SPECIALTY.to_string()
        });

    let building = room.and_then(|r| buildings.get(&r.codigo_edificio).copied());
    let building_name = match building {
        Some(b) if !b.descripcion_edificio.is_empty() => b.descripcion_edificio.clone(),
        _ => {
            warn!(
                target: "agenda::fallback",
                schedule_id,
                room = entry.codigo_consultorio,
                "building not resolved, using default label"
            );
            defaults.building_name.clone()
        }
    };

    let floor = match room {
        Some(r) => floor_label(r.codigo_piso),
        None => {
            warn!(
                target: "agenda::fallback",
                schedule_id,
                room = entry.codigo_consultorio,
                "room not found"
            );
            UNRESOLVED_FLOOR.to_string()
        }
    };

    CombinedRecord {
        id: format!("{}-{}", schedule_id, doctor_id),
        doctor_id,
        schedule_id,
        doctor_name,
        specialty,
        kind: AgendaKind::decode(&entry.tipo),
        scheduling_item_code: entry.codigo_item_agendamiento,
        building_name,
        floor_label: floor,
        room_code: (entry.codigo_consultorio != 0).then_some(entry.codigo_consultorio),
        room_description: room.and_then(|r| r.descripcion_consultorio.clone()),
        day_name: day_code_to_name(entry.codigo_dia).to_string(),
        start_time: to_display_time(&entry.hora_inicio),
        end_time: to_display_time(&entry.hora_fin),
        status: ACTIVE_STATUS.to_string(),
        is_editing: false,
    }
}

/// Catalog by item code, then the doctor's own list by item code, then the
/// doctor's first specialty.
fn resolve_specialty(
    item_code: i64,
    doctor: Option<&Doctor>,
    specialties: &[Specialty],
) -> Option<String> {
    if item_code != 0 {
        if let Some(s) = specialties.iter().find(|s| s.especialidad_id == item_code) {
            return Some(s.descripcion.clone());
        }
        if let Some(s) = doctor
            .and_then(|d| d.especialidades.iter().find(|s| s.especialidad_id == item_code))
        {
            return Some(s.descripcion.clone());
        }
    }

    doctor
        .and_then(|d| d.especialidades.first())
        .map(|s| s.descripcion.clone())
}

fn sorted_by_name(mut doctors: Vec<Doctor>) -> Vec<Doctor> {
    doctors.sort_by(|a, b| a.nombres.cmp(&b.nombres));
    doctors
}

/// Doctors offering a specialty, by catalog description. Empty or `todas`
/// lists everyone.
pub fn doctors_by_specialty(
    doctors: &[Doctor],
    specialties: &[Specialty],
    description: &str,
) -> Vec<Doctor> {
    if description.is_empty() || description == ALL_SPECIALTIES {
        return sorted_by_name(doctors.to_vec());
    }

    let Some(specialty_id) = specialties
        .iter()
        .find(|s| s.descripcion == description)
        .map(|s| s.especialidad_id)
    else {
        return Vec::new();
    };

    sorted_by_name(
        doctors
            .iter()
            .filter(|d| d.especialidades.iter().any(|s| s.especialidad_id == specialty_id))
            .cloned()
            .collect(),
    )
}

fn find_building<'a>(buildings: &'a [Building], building: &str) -> Option<&'a Building> {
    buildings.iter().find(|b| {
        b.descripcion_edificio == building || b.codigo_edificio.to_string() == building
    })
}

fn floors_of(rooms: &[Room], building_code: i64) -> Vec<String> {
    let mut floors: Vec<String> = rooms
        .iter()
        .filter(|r| r.codigo_edificio == building_code)
        .map(|r| floor_label(r.codigo_piso))
        .collect();
    floors.sort();
    floors.dedup();
    floors
}

/// Distinct `Piso N` labels with at least one room in the building, matched by
/// description or by code.
pub fn available_floors(buildings: &[Building], rooms: &[Room], building: &str) -> Vec<String> {
    if building.is_empty() || rooms.is_empty() {
        return Vec::new();
    }
    find_building(buildings, building)
        .map(|b| floors_of(rooms, b.codigo_edificio))
        .unwrap_or_default()
}

pub fn default_building_floors(buildings: &[Building], rooms: &[Room], default_id: i64) -> Vec<String> {
    if buildings.iter().any(|b| b.codigo_edificio == default_id) {
        floors_of(rooms, default_id)
    } else {
        Vec::new()
    }
}

fn rooms_on_floor<'a>(
    buildings: &[Building],
    rooms: &'a [Room],
    building: &str,
    floor: &str,
) -> Vec<&'a Room> {
    let Some(building) = buildings.iter().find(|b| b.descripcion_edificio == building) else {
        return Vec::new();
    };
    let Ok(floor) = floor.trim().trim_start_matches("Piso").trim().parse::<i64>() else {
        return Vec::new();
    };
    rooms
        .iter()
        .filter(|r| r.codigo_edificio == building.codigo_edificio && r.codigo_piso == floor)
        .collect()
}

/// Room for a building description and a `Piso N` label. The first room on
/// that floor wins.
pub fn resolve_room_code(
    buildings: &[Building],
    rooms: &[Room],
    building: &str,
    floor: &str,
) -> Option<i64> {
    choose_room(buildings, rooms, building, floor, None)
}

/// Like [`resolve_room_code`], but `preferred` is kept while it is one of the
/// rooms on that floor.
pub fn choose_room(
    buildings: &[Building],
    rooms: &[Room],
    building: &str,
    floor: &str,
    preferred: Option<i64>,
) -> Option<i64> {
    let candidates = rooms_on_floor(buildings, rooms, building, floor);
    preferred
        .filter(|code| candidates.iter().any(|r| r.codigo_consultorio == *code))
        .or_else(|| candidates.first().map(|r| r.codigo_consultorio))
}
