use serde::{Deserialize, Serialize};

/// Kind of agenda slot. The upstream column is free text; anything that is
/// not recognisably a consultation is treated as a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgendaKind {
    #[default]
    Consulta,
    Procedimiento,
}

impl AgendaKind {
    pub fn decode(raw: &str) -> Self {
        let t = raw.trim().to_uppercase();
        if t.is_empty() || t.starts_with('C') {
            AgendaKind::Consulta
        } else {
            AgendaKind::Procedimiento
        }
    }

    pub fn encode(self) -> &'static str {
        match self {
            AgendaKind::Consulta => "C",
            AgendaKind::Procedimiento => "P",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgendaKind::Consulta => "Consulta",
            AgendaKind::Procedimiento => "Procedimiento",
        }
    }
}

/// One row of the dashboard: a schedule entry joined with its doctor, room,
/// building and specialty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRecord {
    pub id: String,
    pub doctor_id: i64,
    /// `0` until the record has been persisted upstream.
    pub schedule_id: i64,
    pub doctor_name: String,
    pub specialty: String,
    pub kind: AgendaKind,
    pub scheduling_item_code: i64,
    pub building_name: String,
    pub floor_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_description: Option<String>,
    pub day_name: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub is_editing: bool,
}

impl CombinedRecord {
    pub fn is_new(&self) -> bool {
        self.schedule_id == 0
    }
}

pub const ALL_SPECIALTIES: &str = "todas";
pub const ALL_VALUES: &str = "todos";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, rename = "especialidad")]
    pub specialty: String,
    #[serde(default, rename = "edificio")]
    pub building: String,
    #[serde(default, rename = "tipo")]
    pub kind: String,
    #[serde(default, rename = "search")]
    pub search_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub total_items: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    #[default]
    Viewing,
    Editing,
}

/// Field changes coming from the edit form. Absent fields stay untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    pub specialty: Option<String>,
    pub scheduling_item_code: Option<i64>,
    pub doctor_id: Option<i64>,
    pub building_name: Option<String>,
    pub floor_label: Option<String>,
    /// Must be one of the rooms on the row's building and floor.
    pub room_code: Option<i64>,
    pub day_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub kind: Option<AgendaKind>,
}
