use serde::{Deserialize, Serialize};

use super::de::{lenient_i64, string_or_number};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(deserialize_with = "lenient_i64", default)]
    pub id: i64,
    #[serde(default, alias = "nombre")]
    pub nombres: String,
    #[serde(default)]
    pub especialidades: Vec<DoctorSpecialty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSpecialty {
    #[serde(deserialize_with = "lenient_i64", default)]
    pub especialidad_id: i64,
    #[serde(default)]
    pub descripcion: String,
    #[serde(deserialize_with = "string_or_number", default)]
    pub tipo: String,
}

/// Catalog entry from the specialties endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialty {
    #[serde(deserialize_with = "lenient_i64", default)]
    pub especialidad_id: i64,
    #[serde(default)]
    pub descripcion: String,
}

impl Specialty {
    /// Rows without an id or a description cannot be matched and are dropped
    /// by the loader.
    pub fn is_usable(&self) -> bool {
        self.especialidad_id != 0 && !self.descripcion.trim().is_empty()
    }
}
