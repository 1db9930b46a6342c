use serde::{Deserialize, Serialize};

use super::de::{lenient_i64, lenient_opt_string};

/// A consultorio. The catalog endpoint has shipped lower-case, upper-case
/// `CD_*` and short `cd_*` column names over time; all are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(
        alias = "CD_CONSULTORIO",
        alias = "cd_consultorio",
        deserialize_with = "lenient_i64",
        default
    )]
    pub codigo_consultorio: i64,
    #[serde(
        alias = "CD_EDIFICIO",
        alias = "cd_edificio",
        deserialize_with = "lenient_i64",
        default
    )]
    pub codigo_edificio: i64,
    #[serde(
        alias = "CD_PISO",
        alias = "cd_piso",
        deserialize_with = "lenient_i64",
        default
    )]
    pub codigo_piso: i64,
    #[serde(
        alias = "DES_CONSULTORIO",
        alias = "des_consultorio",
        alias = "descripcion",
        deserialize_with = "lenient_opt_string",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub descripcion_consultorio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    #[serde(deserialize_with = "lenient_i64", default)]
    pub codigo_edificio: i64,
    #[serde(default)]
    pub descripcion_edificio: String,
}
