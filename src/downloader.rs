use crate::schedule::ScheduleEntry;
use std::error::Error;

/// Column order of the exported artifact.
pub const EXPORT_COLUMNS: [&str; 7] = ["Date", "Day", "Session", "Subject", "Div", "Faculty", "Venue"];

/// Name of the artifact handed to the requester.
pub fn export_filename(roll_no: &str) -> String {
    format!("{}_timetable.xlsx", roll_no)
}

/// Convert an assembled schedule to XLSX format
///
/// This function exports the ordered schedule to XLSX (Excel) format using
/// the rust_xlsxwriter library, one row per schedule entry under a header
/// row. Dates are written in ISO form so re-reading the artifact yields
/// the same values.
///
/// # Arguments
/// * `entries` - The ordered schedule entries to export
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - XLSX file content as bytes or an error
pub fn to_xlsx(entries: &[ScheduleEntry]) -> Result<Vec<u8>, Box<dyn Error>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    // Create a new workbook and worksheet
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (c, header) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header)?;
    }
    for (r, entry) in entries.iter().enumerate() {
        for (c, field) in row_fields(entry).iter().enumerate() {
            worksheet.write_string((r + 1) as u32, c as u16, field.as_str())?;
        }
    }

    workbook.push_worksheet(worksheet);

    // Save to memory buffer
    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Convert an assembled schedule to CSV format
///
/// Values are comma-separated under the same header row as the XLSX
/// export; commas, quotes and newlines inside a field are quoted and
/// escaped.
///
/// # Arguments
/// * `entries` - The ordered schedule entries to export
///
/// # Returns
/// * `String` - CSV content
pub fn to_csv(entries: &[ScheduleEntry]) -> String {
    let mut csv_content = String::new();

    for (c, header) in EXPORT_COLUMNS.iter().enumerate() {
        if c > 0 {
            csv_content.push(',');
        }
        csv_content.push_str(header);
    }
    csv_content.push('\n');

    for entry in entries {
        for (c, field) in row_fields(entry).iter().enumerate() {
            if c > 0 {
                csv_content.push(',');
            }
            if field.contains(',') || field.contains('"') || field.contains('\n') {
                let escaped = field.replace('"', "\"\"");
                csv_content.push_str(&format!("\"{}\"", escaped));
            } else {
                csv_content.push_str(field);
            }
        }
        csv_content.push('\n');
    }

    csv_content
}

fn row_fields(entry: &ScheduleEntry) -> [String; 7] {
    [
        entry.date.format("%Y-%m-%d").to_string(),
        entry.day.clone(),
        entry.session.clone(),
        entry.subject.clone(),
        entry.division.clone(),
        entry.faculty.clone(),
        entry.venue.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Reader, Xlsx};
    use chrono::{NaiveDate, NaiveTime};
    use std::io::Cursor;

    fn entry(date: (i32, u32, u32), subject: &str, faculty: &str) -> ScheduleEntry {
        ScheduleEntry {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            day: "Mon".to_string(),
            session: "10:00-11:00 AM".to_string(),
            subject: subject.to_string(),
            division: "A".to_string(),
            faculty: faculty.to_string(),
            venue: "Room 5".to_string(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0),
        }
    }

    #[test]
    fn export_filename_uses_the_roll_number() {
        assert_eq!(export_filename("21BCM014"), "21BCM014_timetable.xlsx");
    }

    #[test]
    fn xlsx_round_trips_the_schedule() {
        let entries = vec![
            entry((2025, 8, 4), "CS101", "Dr. Rao"),
            entry((2025, 8, 5), "MGT205", "Dr. Shah"),
        ];

        let bytes = to_xlsx(&entries).unwrap();
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let sheet_names = workbook.sheet_names();
        let first_sheet = sheet_names[0].clone();
        let range = workbook.worksheet_range(&first_sheet).unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();

        assert_eq!(rows[0], EXPORT_COLUMNS.to_vec());
        assert_eq!(
            rows[1],
            vec!["2025-08-04", "Mon", "10:00-11:00 AM", "CS101", "A", "Dr. Rao", "Room 5"]
        );
        assert_eq!(rows[2][0], "2025-08-05");
        assert_eq!(rows[2][3], "MGT205");
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn csv_escapes_embedded_commas_and_quotes() {
        let mut e = entry((2025, 8, 4), "CS101", "Rao, \"PhD\"");
        e.venue = "Block A\nRoom 5".to_string();
        let csv = to_csv(&[e]);

        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Date,Day,Session,Subject,Div,Faculty,Venue");
        let body: String = csv.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert!(body.contains("\"Rao, \"\"PhD\"\"\""));
        assert!(body.contains("\"Block A\nRoom 5\""));
    }

    #[test]
    fn empty_schedule_exports_headers_only() {
        let csv = to_csv(&[]);
        assert_eq!(csv, "Date,Day,Session,Subject,Div,Faculty,Venue\n");
        assert!(to_xlsx(&[]).is_ok());
    }
}
