pub mod agenda;
pub mod catalog;
pub(crate) mod de;
pub mod doctor;
pub mod record;

pub use agenda::{AgendaPayload, ScheduleEntry};
pub use catalog::{Building, Room};
pub use doctor::{Doctor, DoctorSpecialty, Specialty};
pub use record::{
    AgendaKind, CombinedRecord, Filters, PaginationInfo, RecordPatch, RecordState,
    ALL_SPECIALTIES, ALL_VALUES,
};

/// The five upstream collections the dashboard is built from.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub doctors: Vec<Doctor>,
    pub schedule_entries: Vec<ScheduleEntry>,
    pub rooms: Vec<Room>,
    pub buildings: Vec<Building>,
    pub specialties: Vec<Specialty>,
}
