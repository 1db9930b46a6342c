use serde::{Deserialize, Serialize};

use super::de::{lenient_i64, string_or_number};

/// Raw schedule row as returned by `/api/agnd-agenda`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(deserialize_with = "lenient_i64", default)]
    pub codigo_agenda: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub codigo_consultorio: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub codigo_prestador: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub codigo_item_agendamiento: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub codigo_dia: i64,
    #[serde(deserialize_with = "string_or_number", default)]
    pub hora_inicio: String,
    #[serde(deserialize_with = "string_or_number", default)]
    pub hora_fin: String,
    #[serde(deserialize_with = "string_or_number", default)]
    pub tipo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
}

/// Body sent to the upstream service on create and update.
///
/// `codigo_agenda` is only present on updates; a create never carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaPayload {
    pub codigo_prestador: i64,
    pub codigo_consultorio: i64,
    pub codigo_item_agendamiento: i64,
    pub codigo_dia: i64,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub tipo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_agenda: Option<i64>,
}
