use crate::course::CourseId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The contents of one roster file: a course section and the roll
/// numbers enrolled in it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RosterEntry {
    pub course: CourseId,
    pub rolls: HashSet<String>,
}

/// Enrollment index over a roster directory.
///
/// Built once per directory scan instead of re-reading every roster file
/// on each lookup. Holds the forward list of course sections in scan
/// order and a reverse map from roll number to the sections it appears
/// in. Resolver output preserves the scan order, which the loader keeps
/// deterministic by sorting filenames.
#[derive(Clone, Debug, Default)]
pub struct RosterIndex {
    courses: Vec<CourseId>,
    by_roll: HashMap<String, Vec<usize>>,
}

impl RosterIndex {
    pub fn build(entries: Vec<RosterEntry>) -> Self {
        let mut index = RosterIndex::default();
        for entry in entries {
            let slot = index.courses.len();
            for roll in &entry.rolls {
                index.by_roll.entry(roll.clone()).or_default().push(slot);
            }
            index.courses.push(entry.course);
        }
        index
    }

    /// Every course section the given roll number is enrolled in.
    ///
    /// An empty result means "no enrollment found", not a fault.
    pub fn resolve(&self, roll_no: &str) -> Vec<CourseId> {
        match self.by_roll.get(roll_no) {
            Some(slots) => slots.iter().map(|&i| self.courses[i].clone()).collect(),
            None => Vec::new(),
        }
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(stem: &str, rolls: &[&str]) -> RosterEntry {
        RosterEntry {
            course: CourseId::from_stem(stem).unwrap(),
            rolls: rolls.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn resolves_all_enrollments_in_scan_order() {
        let index = RosterIndex::build(vec![
            entry("CS101_A", &["21BCM014", "21BCM020"]),
            entry("MGT205", &["21BCM014"]),
            entry("STAT301_B", &["21BCM099"]),
        ]);

        let courses = index.resolve("21BCM014");
        assert_eq!(
            courses,
            vec![
                CourseId::new("CS101", "A"),
                CourseId::new("MGT205", ""),
            ]
        );
    }

    #[test]
    fn unknown_roll_resolves_to_empty() {
        let index = RosterIndex::build(vec![entry("CS101_A", &["21BCM014"])]);
        assert!(index.resolve("99XYZ000").is_empty());
    }

    #[test]
    fn sections_are_distinct_enrollments() {
        let index = RosterIndex::build(vec![
            entry("CS101_A", &["21BCM014"]),
            entry("CS101_B", &["21BCM020"]),
        ]);

        assert_eq!(index.course_count(), 2);
        assert_eq!(index.resolve("21BCM014"), vec![CourseId::new("CS101", "A")]);
        assert_eq!(index.resolve("21BCM020"), vec![CourseId::new("CS101", "B")]);
    }

    #[test]
    fn empty_index() {
        let index = RosterIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.resolve("anything").is_empty());
    }
}
