//! Static collections shown when the hospital service cannot be reached and
//! the placeholder fallback is enabled, and used to seed the offline mode.

use crate::models::{Building, Collections, Doctor, DoctorSpecialty, Room, ScheduleEntry, Specialty};

const SPECIALTIES: [(i64, &str); 8] = [
    (1, "Cardiología"),
    (2, "Pediatría"),
    (3, "Neurología"),
    (4, "Ginecología"),
    (5, "Traumatología"),
    (6, "Dermatología"),
    (7, "Oftalmología"),
    (8, "Otorrinolaringología"),
];

pub fn specialties() -> Vec<Specialty> {
    SPECIALTIES
        .iter()
        .map(|(id, desc)| Specialty {
            especialidad_id: *id,
            descripcion: desc.to_string(),
        })
        .collect()
}

pub fn doctors() -> Vec<Doctor> {
    [
        (1, "Dr. Juan Pérez", 1),
        (2, "Dra. María Torres", 2),
        (3, "Dr. Carlos Mendoza", 3),
        (4, "Dra. Ana Rodríguez", 4),
    ]
    .into_iter()
    .map(|(id, name, specialty)| Doctor {
        id,
        nombres: name.to_string(),
        especialidades: vec![DoctorSpecialty {
            especialidad_id: specialty,
            descripcion: SPECIALTIES[(specialty - 1) as usize].1.to_string(),
            tipo: "C".to_string(),
        }],
    })
    .collect()
}

pub fn buildings() -> Vec<Building> {
    vec![
        Building {
            codigo_edificio: 2,
            descripcion_edificio: "Hospital Principal".to_string(),
        },
        Building {
            codigo_edificio: 3,
            descripcion_edificio: "Bless".to_string(),
        },
    ]
}

pub fn rooms() -> Vec<Room> {
    [(101, 2, 1), (102, 2, 2), (201, 3, 3), (202, 3, 5)]
        .into_iter()
        .map(|(code, building, floor)| Room {
            codigo_consultorio: code,
            codigo_edificio: building,
            codigo_piso: floor,
            descripcion_consultorio: Some(format!("Consultorio {}", code)),
        })
        .collect()
}

pub fn schedule_entries() -> Vec<ScheduleEntry> {
    [
        (101, 1, 101, 1, 1, "08:00", "12:00", "C"),
        (102, 2, 201, 2, 2, "09:00", "11:00", "P"),
        (103, 3, 102, 3, 3, "14:00", "18:00", "C"),
        (104, 4, 202, 4, 4, "10:00", "12:00", "P"),
    ]
    .into_iter()
    .map(|(id, doctor, room, item, day, start, end, kind)| ScheduleEntry {
        codigo_agenda: id,
        codigo_consultorio: room,
        codigo_prestador: doctor,
        codigo_item_agendamiento: item,
        codigo_dia: day,
        hora_inicio: format!("1900-01-01 {}", start),
        hora_fin: format!("1900-01-01 {}", end),
        tipo: kind.to_string(),
        estado: Some("Activa".to_string()),
    })
    .collect()
}

pub fn collections() -> Collections {
    Collections {
        doctors: doctors(),
        schedule_entries: schedule_entries(),
        rooms: rooms(),
        buildings: buildings(),
        specialties: specialties(),
    }
}
