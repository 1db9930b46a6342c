use tracing::warn;

pub const NO_DAY: &str = "Sin día";

/// Day codes as stored upstream, Monday first.
pub const WEEK_DAYS: [(u8, &str); 7] = [
    (1, "Lunes"),
    (2, "Martes"),
    (3, "Miércoles"),
    (4, "Jueves"),
    (5, "Viernes"),
    (6, "Sábado"),
    (7, "Domingo"),
];

pub fn day_code_to_name(code: i64) -> &'static str {
    WEEK_DAYS
        .iter()
        .find(|(c, _)| i64::from(*c) == code)
        .map(|(_, name)| *name)
        .unwrap_or(NO_DAY)
}

/// Unknown names fall back to Monday so dirty rows can still be saved.
pub fn name_to_day_code(name: &str) -> u8 {
    match WEEK_DAYS.iter().find(|(_, n)| *n == name) {
        Some((code, _)) => *code,
        None => {
            warn!(target: "agenda::fallback", day = name, "unknown day name, defaulting to Lunes");
            1
        }
    }
}
