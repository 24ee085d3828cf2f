use serde::{Deserialize, Serialize};
use std::fmt;

/// One course section: a subject code plus an optional division code.
///
/// Roster filenames encode the identifier in their stem, `CS101_A.xlsx`
/// for subject `CS101` division `A`, or `MGT205.xlsx` for an undivided
/// course. The subject code is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId {
    pub subject: String,
    pub division: String,
}

impl CourseId {
    pub fn new(subject: impl Into<String>, division: impl Into<String>) -> Self {
        CourseId {
            subject: subject.into(),
            division: division.into(),
        }
    }

    /// Parse a roster filename stem into a course identifier.
    ///
    /// The first underscore-separated segment is the subject code, the
    /// second (if present) the division code; any further segments are
    /// ignored. Returns `None` when the subject code would be empty.
    pub fn from_stem(stem: &str) -> Option<Self> {
        let mut parts = stem.split('_');
        let subject = parts.next().unwrap_or("").trim();
        if subject.is_empty() {
            return None;
        }
        let division = parts.next().unwrap_or("").trim();
        Some(CourseId::new(subject, division))
    }

    pub fn has_division(&self) -> bool {
        !self.division.is_empty()
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.division.is_empty() {
            write!(f, "{}", self.subject)
        } else {
            write!(f, "{}_{}", self.subject, self.division)
        }
    }
}

/// One row of the master course table: the subject abbreviation with its
/// faculty and venue. Abbreviations are not guaranteed unique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub abbreviation: String,
    pub faculty: String,
    pub venue: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_with_division() {
        let course = CourseId::from_stem("CS101_A").unwrap();
        assert_eq!(course.subject, "CS101");
        assert_eq!(course.division, "A");
        assert!(course.has_division());
    }

    #[test]
    fn stem_without_division() {
        let course = CourseId::from_stem("MGT205").unwrap();
        assert_eq!(course.subject, "MGT205");
        assert_eq!(course.division, "");
        assert!(!course.has_division());
    }

    #[test]
    fn stem_extra_segments_are_ignored() {
        let course = CourseId::from_stem("CS101_A_final").unwrap();
        assert_eq!(course.subject, "CS101");
        assert_eq!(course.division, "A");
    }

    #[test]
    fn empty_subject_is_rejected() {
        assert_eq!(CourseId::from_stem(""), None);
        assert_eq!(CourseId::from_stem("_A"), None);
        assert_eq!(CourseId::from_stem("  _A"), None);
    }

    #[test]
    fn display_round_trips_the_stem() {
        assert_eq!(CourseId::from_stem("CS101_A").unwrap().to_string(), "CS101_A");
        assert_eq!(CourseId::from_stem("MGT205").unwrap().to_string(), "MGT205");
    }
}
