//! Plain-text fallback for the staff sheet: the rows split in half and laid
//! out as two blocks side by side, separated by an empty column.

use super::{ExportRow, HEADERS};

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn block(row: Option<&ExportRow>) -> Vec<String> {
    match row {
        Some(r) => r.cells().iter().map(|v| quote(v)).collect(),
        None => vec![String::new(); HEADERS.len()],
    }
}

pub fn export_csv(items: &[ExportRow]) -> String {
    let half = items.len().div_ceil(2);
    let (left, right) = items.split_at(half);

    let mut header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    header.push(String::new());
    header.extend(HEADERS.iter().map(|h| h.to_string()));

    let mut lines = vec![header.join(",")];
    for i in 0..left.len().max(right.len()) {
        let mut cells = block(left.get(i));
        cells.push(String::new());
        cells.extend(block(right.get(i)));
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(doctor: &str) -> ExportRow {
        ExportRow {
            specialty: "NEFROLOGÍA".to_string(),
            doctor_name: doctor.to_string(),
            day: "Lunes".to_string(),
            building: "Torre A".to_string(),
            floor: "Piso 2".to_string(),
            room: "227".to_string(),
            start_time: "16:00".to_string(),
            end_time: "19:00".to_string(),
            kind: "Consulta".to_string(),
        }
    }

    #[test]
    fn test_two_blocks_side_by_side() {
        let csv = export_csv(&[row("A"), row("B"), row("C")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ESPECIALIDAD,NOMBRE DEL MÉDICO"));
        assert_eq!(lines[0].split(',').count(), 19);

        let first: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(first[1], "\"A\"");
        assert_eq!(first[9], "");
        assert_eq!(first[11], "\"C\"");

        let second: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(second[1], "\"B\"");
        assert_eq!(second[10], "");
        assert_eq!(second.len(), 19);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let csv = export_csv(&[row("Dr. \"Pepe\"")]);
        assert!(csv.contains("\"Dr. \"\"Pepe\"\"\""));
    }

    #[test]
    fn test_empty_items_yield_header_only() {
        assert_eq!(export_csv(&[]).lines().count(), 1);
    }
}
