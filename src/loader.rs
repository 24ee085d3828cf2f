use crate::course::{CourseId, CourseInfo};
use crate::roster::RosterEntry;
use crate::timetable::TimetableRow;
use calamine::{Data, DataType, Reader, Xlsx, open_workbook};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Column headers the reference spreadsheets are expected to carry.
pub const ROLL_HEADER: &str = "Roll No.";
pub const ABBREVIATION_HEADER: &str = "Abbre.";
pub const FACULTY_HEADER: &str = "Faculty";
pub const VENUE_HEADER: &str = "Venue";
pub const DATE_HEADER: &str = "Date";
pub const DAY_HEADER: &str = "Day";

// String date formats accepted in the weekly grid alongside native Excel
// datetime cells.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d %b %Y"];

/// Load every roster file in the directory, in sorted filename order.
///
/// Each file's stem encodes the course identifier (`CS101_A.xlsx`).
/// Files whose stem encodes no identifier, files without the roll-number
/// column and unreadable files are skipped with a warning, never an
/// error.
///
/// # Arguments
/// * `dir` - The roster directory to scan
///
/// # Returns
/// * `Result<Vec<RosterEntry>, Box<dyn Error>>` - One entry per usable roster file
pub fn load_rosters(dir: &Path) -> Result<Vec<RosterEntry>, Box<dyn Error>> {
    let mut entries = Vec::new();

    for path in roster_files(dir)? {
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem,
            None => continue,
        };
        let course = match CourseId::from_stem(stem) {
            Some(course) => course,
            None => {
                log::warn!("roster {} encodes no course identifier, skipping", path.display());
                continue;
            }
        };

        match load_roll_column(&path) {
            Ok(Some(rolls)) => entries.push(RosterEntry { course, rolls }),
            Ok(None) => {
                log::warn!(
                    "roster {} has no {:?} column, skipping",
                    path.display(),
                    ROLL_HEADER
                );
            }
            Err(e) => {
                log::warn!("roster {} is unreadable ({}), skipping", path.display(), e);
            }
        }
    }

    Ok(entries)
}

/// The `.xlsx` files of a roster directory in sorted filename order.
/// Sorting keeps resolver output deterministic across platforms.
pub fn roster_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Load the master course table.
///
/// Requires the abbreviation column; faculty and venue columns are
/// optional and default to empty. Rows with an empty abbreviation are
/// skipped. Duplicate abbreviations are preserved in row order so the
/// assembler's first-match-wins lookup sees them as the sheet does.
///
/// # Arguments
/// * `path` - Path to the master course spreadsheet
///
/// # Returns
/// * `Result<Vec<CourseInfo>, Box<dyn Error>>` - One entry per well-formed row
pub fn load_master(path: &Path) -> Result<Vec<CourseInfo>, Box<dyn Error>> {
    let rows = open_rows(path)?;
    let header = match rows.first() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    let abbr_col = match find_column(header, ABBREVIATION_HEADER) {
        Some(col) => col,
        None => {
            log::warn!(
                "master table {} has no {:?} column, no courses loaded",
                path.display(),
                ABBREVIATION_HEADER
            );
            return Ok(Vec::new());
        }
    };
    let faculty_col = find_column(header, FACULTY_HEADER);
    let venue_col = find_column(header, VENUE_HEADER);

    let mut courses = Vec::new();
    for row in rows.iter().skip(1) {
        let abbreviation = row.get(abbr_col).map(data_to_string).unwrap_or_default();
        if abbreviation.is_empty() {
            continue;
        }
        courses.push(CourseInfo {
            abbreviation,
            faculty: cell_at(row, faculty_col),
            venue: cell_at(row, venue_col),
        });
    }
    Ok(courses)
}

/// Load the weekly timetable grid.
///
/// Requires the `Date` and `Day` columns; every other labeled column is
/// a session slot. Rows whose date cannot be read (neither an Excel
/// datetime cell nor a recognized date string) are skipped with a
/// warning. Empty session cells are not carried.
///
/// # Arguments
/// * `path` - Path to the weekly timetable spreadsheet
///
/// # Returns
/// * `Result<Vec<TimetableRow>, Box<dyn Error>>` - One row per timetable day
pub fn load_timetable(path: &Path) -> Result<Vec<TimetableRow>, Box<dyn Error>> {
    let rows = open_rows(path)?;
    let header = match rows.first() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    let (date_col, day_col) = match (
        find_column(header, DATE_HEADER),
        find_column(header, DAY_HEADER),
    ) {
        (Some(date_col), Some(day_col)) => (date_col, day_col),
        _ => {
            log::warn!(
                "timetable {} is missing the {:?}/{:?} columns, no rows loaded",
                path.display(),
                DATE_HEADER,
                DAY_HEADER
            );
            return Ok(Vec::new());
        }
    };

    // Every other labeled column is a session slot.
    let session_cols: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != date_col && i != day_col)
        .map(|(i, cell)| (i, data_to_string(cell)))
        .filter(|(_, label)| !label.is_empty())
        .collect();

    let mut timetable = Vec::new();
    for row in rows.iter().skip(1) {
        let date = match row.get(date_col).and_then(parse_date) {
            Some(date) => date,
            None => {
                log::warn!("timetable {} row with unreadable date, skipping", path.display());
                continue;
            }
        };
        let day = row.get(day_col).map(data_to_string).unwrap_or_default();

        let sessions: Vec<(String, String)> = session_cols
            .iter()
            .filter_map(|(col, label)| {
                let text = row.get(*col).map(data_to_string).unwrap_or_default();
                if text.is_empty() {
                    None
                } else {
                    Some((label.clone(), text))
                }
            })
            .collect();

        timetable.push(TimetableRow { date, day, sessions });
    }
    Ok(timetable)
}

// Reads the first worksheet of a workbook into owned rows.
fn open_rows(path: &Path) -> Result<Vec<Vec<Data>>, Box<dyn Error>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .ok_or("no sheets found in workbook")?
        .clone();
    let range = workbook.worksheet_range(&sheet_name)?;
    Ok(range.rows().map(|row| row.to_vec()).collect())
}

fn load_roll_column(path: &Path) -> Result<Option<HashSet<String>>, Box<dyn Error>> {
    let rows = open_rows(path)?;
    let header = match rows.first() {
        Some(header) => header,
        None => return Ok(None),
    };
    let roll_col = match find_column(header, ROLL_HEADER) {
        Some(col) => col,
        None => return Ok(None),
    };

    let mut rolls = HashSet::new();
    for row in rows.iter().skip(1) {
        if let Some(cell) = row.get(roll_col) {
            let roll = data_to_string(cell);
            if !roll.is_empty() {
                rolls.insert(roll);
            }
        }
    }
    Ok(Some(rolls))
}

fn find_column(header: &[Data], name: &str) -> Option<usize> {
    header.iter().position(|cell| data_to_string(cell) == name)
}

fn cell_at(row: &[Data], col: Option<usize>) -> String {
    col.and_then(|c| row.get(c)).map(data_to_string).unwrap_or_default()
}

// Renders a cell the way it reads in the sheet: integral floats lose the
// trailing ".0" so numeric roll numbers compare as strings.
fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn parse_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(_) => cell.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()),
        other => {
            let text = data_to_string(other);
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
        }
    }
}
