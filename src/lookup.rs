use crate::cache::{DirCache, FileCache};
use crate::config::AppConfig;
use crate::course::{CourseId, CourseInfo};
use crate::loader;
use crate::roster::RosterIndex;
use crate::schedule::{self, ScheduleEntry};
use crate::timetable::{self, TimetableRow};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Result of one roll-number lookup: the enrollment that was found and
/// the assembled, chronologically ordered schedule.
#[derive(Clone, Debug, Serialize)]
pub struct StudentSchedule {
    pub roll_no: String,
    pub courses: Vec<CourseId>,
    pub entries: Vec<ScheduleEntry>,
}

/// The user-visible lookup conditions, plus reference-data failure.
/// Only `Data` indicates something actually wrong with the deployment.
#[derive(Debug)]
pub enum LookupError {
    /// The roll number appears in no roster.
    NotEnrolled(String),
    /// Enrollment was found, but no timetable cell references any of it.
    NoScheduleMatch {
        roll_no: String,
        courses: Vec<CourseId>,
    },
    /// A reference dataset could not be read.
    Data(Box<dyn Error>),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotEnrolled(roll_no) => {
                write!(f, "No courses found for roll number {}. Please check again.", roll_no)
            }
            LookupError::NoScheduleMatch { .. } => {
                write!(f, "No matching classes found in the current weekly timetable.")
            }
            LookupError::Data(e) => write!(f, "reference data unavailable: {}", e),
        }
    }
}

impl Error for LookupError {}

/// Shared, read-only reference data behind mtime-checked caches.
///
/// One lookup reads three datasets: the roster index (built from the
/// roster directory), the master course table and the weekly grid. Each
/// is cached against its source's modification time, so edits to the
/// spreadsheets are picked up on the next request without a restart.
pub struct DataStore {
    config: AppConfig,
    rosters: DirCache<RosterIndex>,
    master: FileCache<Vec<CourseInfo>>,
    weekly: FileCache<Vec<TimetableRow>>,
}

impl DataStore {
    pub fn new(config: AppConfig) -> Self {
        DataStore {
            config,
            rosters: DirCache::new(),
            master: FileCache::new(),
            weekly: FileCache::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn roster_index(&self) -> Result<Arc<RosterIndex>, Box<dyn Error>> {
        self.rosters.get_or_build(&self.config.roster_dir, |dir| {
            loader::load_rosters(dir).map(RosterIndex::build)
        })
    }

    pub fn master(&self) -> Result<Arc<Vec<CourseInfo>>, Box<dyn Error>> {
        self.master.get_or_load(&self.config.master_file, loader::load_master)
    }

    pub fn weekly(&self) -> Result<Arc<Vec<TimetableRow>>, Box<dyn Error>> {
        self.weekly.get_or_load(&self.config.weekly_file, loader::load_timetable)
    }

    /// Drop every cached dataset; the next lookup reloads from disk.
    pub fn reload(&self) {
        self.rosters.clear();
        self.master.clear();
        self.weekly.clear();
    }

    /// One full lookup: resolve enrollment, match the weekly grid,
    /// assemble the ordered schedule.
    pub fn lookup(&self, roll_no: &str) -> Result<StudentSchedule, LookupError> {
        let index = self.roster_index().map_err(LookupError::Data)?;
        let courses = index.resolve(roll_no);
        if courses.is_empty() {
            return Err(LookupError::NotEnrolled(roll_no.to_string()));
        }
        log::debug!("roll {} enrolled in {} course(s)", roll_no, courses.len());

        let weekly = self.weekly().map_err(LookupError::Data)?;
        let matches = timetable::find_matches(&courses, &weekly);
        if matches.is_empty() {
            return Err(LookupError::NoScheduleMatch {
                roll_no: roll_no.to_string(),
                courses,
            });
        }

        let master = self.master().map_err(LookupError::Data)?;
        let entries = schedule::assemble(&matches, &master);
        Ok(StudentSchedule {
            roll_no: roll_no.to_string(),
            courses,
            entries,
        })
    }
}
