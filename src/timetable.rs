use crate::course::CourseId;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One row of the weekly timetable grid: a calendar day plus the cell
/// text found under each session column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimetableRow {
    pub date: NaiveDate,
    pub day: String,
    /// `(session label, cell text)` pairs in column order. Empty cells
    /// are not carried.
    pub sessions: Vec<(String, String)>,
}

/// A single (row, session, course) hit, before enrichment. Duplicates
/// across identical cells are possible and are resolved by the
/// assembler.
#[derive(Clone, Debug, PartialEq)]
pub struct RawMatch {
    pub date: NaiveDate,
    pub day: String,
    pub session: String,
    pub subject: String,
    pub division: String,
    pub cell_text: String,
}

/// Compiled matching rule for one course section.
///
/// Two modes, depending on whether the section carries a division code:
///
/// - Division-qualified: the cell must contain the subject code
///   immediately followed by `(`, an optional straight or typographic
///   apostrophe, optional whitespace, the division code and `)`, as in
///   `CS101('A)` or `CS101(’A)`. The subject code is anchored on a
///   leading token boundary so `XCS101(A)` does not match.
/// - Unqualified: the cell must contain the subject code on token
///   boundaries on both sides and NOT immediately followed by `(`; a
///   division-qualified reference never satisfies a no-division lookup,
///   and `CS1010` never matches `CS101`.
pub struct CoursePattern {
    course: CourseId,
    regex: Regex,
    qualified: bool,
}

impl CoursePattern {
    /// Compile the rule for one section. `None` only if the escaped
    /// pattern fails to compile, in which case the section is skipped.
    pub fn compile(course: &CourseId) -> Option<Self> {
        let pattern = if course.has_division() {
            format!(
                r"\b{}\(['’]?\s*{}\)",
                regex::escape(&course.subject),
                regex::escape(&course.division)
            )
        } else {
            format!(r"\b{}\b", regex::escape(&course.subject))
        };
        let regex = Regex::new(&pattern).ok()?;
        Some(CoursePattern {
            course: course.clone(),
            regex,
            qualified: course.has_division(),
        })
    }

    /// True when the cell text references this course section.
    pub fn matches(&self, cell: &str) -> bool {
        if self.qualified {
            self.regex.is_match(cell)
        } else {
            // The regex crate has no lookahead, so "not followed by an
            // opening parenthesis" is checked on each candidate match.
            self.regex
                .find_iter(cell)
                .any(|m| !cell[m.end()..].starts_with('('))
        }
    }

    pub fn course(&self) -> &CourseId {
        &self.course
    }
}

/// Scan the whole grid for references to any enrolled course section.
///
/// Every (row, session, course) triple is tested; a single cell may
/// yield several matches when it lists more than one enrolled course.
/// An empty result is a valid "no classes found" outcome.
pub fn find_matches(enrolled: &[CourseId], rows: &[TimetableRow]) -> Vec<RawMatch> {
    let patterns: Vec<CoursePattern> = enrolled.iter().filter_map(CoursePattern::compile).collect();

    let mut matches = Vec::new();
    for row in rows {
        for (label, cell) in &row.sessions {
            for pattern in &patterns {
                if pattern.matches(cell) {
                    matches.push(RawMatch {
                        date: row.date,
                        day: row.day.clone(),
                        session: clean_label(label),
                        subject: pattern.course().subject.clone(),
                        division: pattern.course().division.clone(),
                        cell_text: cell.clone(),
                    });
                }
            }
        }
    }
    matches
}

/// Session labels arrive with embedded newlines from wrapped header
/// cells; flatten them before they reach the output table.
pub fn clean_label(label: &str) -> String {
    label.replace('\n', " ").trim().to_string()
}
