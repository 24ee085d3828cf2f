use crate::course::CourseInfo;
use crate::timetable::RawMatch;
use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static! {
    // A clock reading glued to a range dash is the session's start; its
    // meridiem appears later in the label ("10:00-11:00 AM").
    static ref RANGE_START: Regex = Regex::new(r"\b(\d{1,2})[:.]?(\d{0,2})\s*[-–]").unwrap();
    // A clock reading carrying its own meridiem ("2 PM", "10.30am").
    static ref CLOCK: Regex = Regex::new(r"(?i)\b(\d{1,2})[:.]?(\d{0,2})\s*([AP]M)\b").unwrap();
    static ref MERIDIEM: Regex = Regex::new(r"(?i)\b([AP]M)\b").unwrap();
}

/// One row of the final personalized schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    /// Day name abbreviated to three characters ("Mon").
    pub day: String,
    pub session: String,
    pub subject: String,
    pub division: String,
    pub faculty: String,
    pub venue: String,
    /// Sortable start time derived from the session label, when one
    /// could be extracted.
    pub start_time: Option<NaiveTime>,
}

impl ScheduleEntry {
    /// Date as rendered in the schedule cards ("04 Aug"). The underlying
    /// `date` value stays available for sorting and highlighting.
    pub fn display_date(&self) -> String {
        self.date.format("%d %b").to_string()
    }

    /// Whether the entry falls on the given calendar day. The render
    /// layers pass today's date to highlight current classes.
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

/// Derive a sortable start time from a free-text session label.
///
/// Two rules, tried in order:
///
/// 1. Range start: a 1-2 digit hour (optional `:` or `.` minutes)
///    immediately before a dash, with the meridiem taken from the first
///    `AM`/`PM` later in the label. `"10:00-11:00 AM"` -> 10:00.
/// 2. Plain token: the first hour (optional minutes) directly followed
///    by its own meridiem. `"2 PM"` -> 14:00.
///
/// Labels without a resolvable time ("Lunch Break") yield `None`; such
/// entries still appear in the schedule and sort last within their date.
pub fn extract_start_time(session: &str) -> Option<NaiveTime> {
    let label = session.replace('\n', " ");
    let label = label.trim();

    if let Some(caps) = RANGE_START.captures(label) {
        let tail = &label[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
        if let Some(mer) = MERIDIEM.captures(tail) {
            return parse_clock(&caps[1], &caps[2], &mer[1]);
        }
    }

    let caps = CLOCK.captures(label)?;
    parse_clock(&caps[1], &caps[2], &caps[3])
}

// Normalizes to "H:MM AM" and parses on the 12-hour clock, retrying as a
// bare hour when the label carries no minutes.
fn parse_clock(hour: &str, minutes: &str, meridiem: &str) -> Option<NaiveTime> {
    let token = if minutes.is_empty() {
        format!("{} {}", hour, meridiem.to_uppercase())
    } else {
        format!("{}:{} {}", hour, minutes, meridiem.to_uppercase())
    };
    NaiveTime::parse_from_str(&token, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(&token, "%I %p"))
        .ok()
}

/// Assemble the final schedule: deduplicate the raw matches, enrich them
/// from the master course table, derive start times and sort.
///
/// - Dedup key is `(date, day, session, subject, division)`; the first
///   occurrence wins.
/// - The first master row whose abbreviation equals the subject code
///   wins; unmatched codes still produce an entry with empty
///   faculty/venue.
/// - Ordering is date ascending then start time ascending; entries with
///   no extractable start time sort last within their date. The sort is
///   stable, so equal keys keep input order.
pub fn assemble(matches: &[RawMatch], master: &[CourseInfo]) -> Vec<ScheduleEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for m in matches {
        let key = (
            m.date,
            m.day.clone(),
            m.session.clone(),
            m.subject.clone(),
            m.division.clone(),
        );
        if !seen.insert(key) {
            continue;
        }

        let info = master.iter().find(|c| c.abbreviation == m.subject);
        entries.push(ScheduleEntry {
            date: m.date,
            day: abbreviate_day(&m.day),
            session: m.session.clone(),
            subject: m.subject.clone(),
            division: m.division.clone(),
            faculty: info.map(|c| c.faculty.clone()).unwrap_or_default(),
            venue: info.map(|c| c.venue.clone()).unwrap_or_default(),
            start_time: extract_start_time(&m.session),
        });
    }

    entries.sort_by(|a, b| {
        (a.date, a.start_time.is_none(), a.start_time)
            .cmp(&(b.date, b.start_time.is_none(), b.start_time))
    });
    entries
}

fn abbreviate_day(day: &str) -> String {
    day.chars().take(3).collect()
}
