//! Fixed "STAFF" sheet layout: title row, header row, one row per item.

use umya_spreadsheet::{Border, HorizontalAlignmentValues, Spreadsheet, Style, Worksheet};

use super::{ExportError, ExportOptions, ExportRow};

pub const HEADERS: [&str; 9] = [
    "ESPECIALIDAD",
    "NOMBRE DEL MÉDICO",
    "DÍA",
    "EDIFICIO",
    "PISO",
    "CONSULTORIO",
    "HORA INICIO",
    "HORA FIN",
    "TIPO DE AGENDA",
];

pub const COLUMN_COUNT: u32 = 9;
pub const TITLE_ROW: u32 = 1;
pub const HEADER_ROW: u32 = 2;
pub const FIRST_DATA_ROW: u32 = 3;
pub const CLEANUP_LAST_ROW: u32 = 500;

const COLOR_HEADER: &str = "FF7F0C43";
const COLOR_HEADER_FONT: &str = "FFFFFFFF";
const COLOR_BODY_LIGHT: &str = "FFF9F4F6";
const TITLE_FONT_SIZE: f64 = 20.0;

const COLUMN_WIDTHS: [(&str, f64); 9] = [
    ("A", 45.71),
    ("B", 45.71),
    ("C", 14.71),
    ("D", 25.71),
    ("E", 10.71),
    ("F", 16.71),
    ("G", 14.71),
    ("H", 14.71),
    ("I", 20.71),
];

// CONSULTORIO, HORA INICIO, HORA FIN share the header colours
const HIGHLIGHTED_COLUMNS: [u32; 3] = [6, 7, 8];

fn border_all(style: &mut Style) {
    let borders = style.get_borders_mut();
    borders.get_left_mut().set_border_style(Border::BORDER_THIN);
    borders.get_right_mut().set_border_style(Border::BORDER_THIN);
    borders.get_top_mut().set_border_style(Border::BORDER_THIN);
    borders.get_bottom_mut().set_border_style(Border::BORDER_THIN);
}

fn header_style(style: &mut Style) {
    style.set_background_color(COLOR_HEADER);
    let font = style.get_font_mut();
    font.set_bold(true);
    font.get_color_mut().set_argb(COLOR_HEADER_FONT);
    style
        .get_alignment_mut()
        .set_horizontal(HorizontalAlignmentValues::Center);
    border_all(style);
}

fn body_style(style: &mut Style) {
    style.set_background_color(COLOR_BODY_LIGHT);
    border_all(style);
}

fn highlighted_body_style(style: &mut Style) {
    style.set_background_color(COLOR_HEADER);
    style.get_font_mut().get_color_mut().set_argb(COLOR_HEADER_FONT);
    style
        .get_alignment_mut()
        .set_horizontal(HorizontalAlignmentValues::Center);
    border_all(style);
}

/// Excel refuses sheet names that are empty, longer than 31 characters or
/// that contain any of `[]:*?/\`.
fn check_sheet_name(name: &str) -> Result<(), ExportError> {
    let len = name.chars().count();
    if len == 0 || len > 31 || name.chars().any(|c| "[]:*?/\\".contains(c)) {
        return Err(ExportError::SheetName(name.to_string()));
    }
    Ok(())
}

fn write_title(sheet: &mut Worksheet, title: &str) {
    sheet.add_merge_cells("A1:I1");
    sheet.get_cell_mut((1, TITLE_ROW)).set_value(title);
    for col in 1..=COLUMN_COUNT {
        let style = sheet.get_style_mut((col, TITLE_ROW));
        let font = style.get_font_mut();
        font.set_bold(true);
        font.set_size(TITLE_FONT_SIZE);
        style
            .get_alignment_mut()
            .set_horizontal(HorizontalAlignmentValues::Center);
        border_all(style);
    }
}

fn write_headers(sheet: &mut Worksheet) {
    for (idx, text) in HEADERS.iter().enumerate() {
        let col = idx as u32 + 1;
        sheet.get_cell_mut((col, HEADER_ROW)).set_value(*text);
        header_style(sheet.get_style_mut((col, HEADER_ROW)));
    }
}

fn write_rows(sheet: &mut Worksheet, items: &[ExportRow]) {
    for (i, item) in items.iter().enumerate() {
        let row = FIRST_DATA_ROW + i as u32;
        for (idx, value) in item.cells().into_iter().enumerate() {
            let col = idx as u32 + 1;
            sheet.get_cell_mut((col, row)).set_value(value);
            let style = sheet.get_style_mut((col, row));
            if HIGHLIGHTED_COLUMNS.contains(&col) {
                highlighted_body_style(style);
            } else {
                body_style(style);
            }
        }
    }
}

/// Blank every cell from the first unused row to the cleanup boundary so a
/// sheet reused as a template never shows a previous export's tail.
fn clear_tail(sheet: &mut Worksheet, first_unused_row: u32) {
    for row in first_unused_row.max(FIRST_DATA_ROW)..=CLEANUP_LAST_ROW {
        for col in 1..=COLUMN_COUNT {
            sheet.get_cell_mut((col, row)).set_value("");
        }
    }
}

pub fn build_workbook(items: &[ExportRow], options: &ExportOptions) -> Result<Spreadsheet, ExportError> {
    check_sheet_name(&options.sheet_name)?;

    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(options.sheet_name.as_str())
        .map_err(|e| ExportError::SheetName(format!("{}: {}", options.sheet_name, e)))?;

    write_title(sheet, &options.title);
    write_headers(sheet);
    write_rows(sheet, items);
    clear_tail(sheet, FIRST_DATA_ROW + items.len() as u32);

    for (column, width) in COLUMN_WIDTHS {
        sheet.get_column_dimension_mut(column).set_width(width);
    }

    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(specialty: &str, doctor: &str) -> ExportRow {
        ExportRow {
            specialty: specialty.to_string(),
            doctor_name: doctor.to_string(),
            day: "Martes".to_string(),
            building: "Torre A".to_string(),
            floor: "Piso 2".to_string(),
            room: "228".to_string(),
            start_time: "17:00".to_string(),
            end_time: "18:30".to_string(),
            kind: "Consulta".to_string(),
        }
    }

    fn value(sheet: &Worksheet, col: u32, row: u32) -> String {
        sheet
            .get_cell((col, row))
            .map(|c| c.get_value().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_layout_for_three_rows() {
        let items = vec![
            row("ALERGOLOGÍA", "Acosta Gabriela"),
            row("ALERGOLOGÍA", "Molinet Ansberto"),
            row("NEFROLOGÍA", "Chediak Cristina"),
        ];
        let book = build_workbook(&items, &ExportOptions::default()).expect("workbook");
        let sheet = book.get_sheet_by_name("STAFF 2025").expect("sheet");

        assert_eq!(value(sheet, 1, TITLE_ROW), "STAFF DE MÉDICOS");
        for (idx, header) in HEADERS.iter().enumerate() {
            assert_eq!(value(sheet, idx as u32 + 1, HEADER_ROW), *header);
        }

        assert_eq!(value(sheet, 1, 3), "ALERGOLOGÍA");
        assert_eq!(value(sheet, 2, 4), "Molinet Ansberto");
        assert_eq!(value(sheet, 2, 5), "Chediak Cristina");
        assert_eq!(value(sheet, 6, 5), "228");
        assert_eq!(value(sheet, 9, 5), "Consulta");

        for r in 6..=CLEANUP_LAST_ROW {
            for c in 1..=COLUMN_COUNT {
                assert_eq!(value(sheet, c, r), "", "cell ({c},{r}) should be blank");
            }
        }
    }

    #[test]
    fn test_custom_options() {
        let options = ExportOptions {
            sheet_name: "Agenda".to_string(),
            title: "Turnos".to_string(),
        };
        let book = build_workbook(&[], &options).expect("workbook");
        let sheet = book.get_sheet_by_name("Agenda").expect("sheet");
        assert_eq!(value(sheet, 1, TITLE_ROW), "Turnos");
        assert_eq!(value(sheet, 1, FIRST_DATA_ROW), "");
    }

    #[test]
    fn test_invalid_sheet_name_is_rejected() {
        let options = ExportOptions {
            sheet_name: "STAFF/2025".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            build_workbook(&[], &options),
            Err(ExportError::SheetName(_))
        ));
    }
}
