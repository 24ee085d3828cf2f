use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};

/// Locations of the three reference datasets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory of per-course roster files, one `.xlsx` per section.
    pub roster_dir: PathBuf,
    /// Master course table (abbreviation, faculty, venue).
    pub master_file: PathBuf,
    /// Weekly timetable grid.
    pub weekly_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from_data_dir(Path::new("data"))
    }
}

impl AppConfig {
    /// Conventional layout under a single data directory:
    /// `roll_lists/`, `master_course_info.xlsx` and
    /// `weekly_timetable.xlsx`.
    pub fn from_data_dir(dir: &Path) -> Self {
        AppConfig {
            roster_dir: dir.join("roll_lists"),
            master_file: dir.join("master_course_info.xlsx"),
            weekly_file: dir.join("weekly_timetable.xlsx"),
        }
    }

    /// Startup check. A missing reference dataset is the only fatal
    /// condition in the system; everything past this point degrades by
    /// skipping.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !self.roster_dir.is_dir() {
            return Err(format!("roster directory {} not found", self.roster_dir.display()).into());
        }
        for file in [&self.master_file, &self.weekly_file] {
            if !file.is_file() {
                return Err(format!("reference file {} not found", file.display()).into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_layout_lives_under_data() {
        let config = AppConfig::default();
        assert_eq!(config.roster_dir, Path::new("data/roll_lists"));
        assert_eq!(config.master_file, Path::new("data/master_course_info.xlsx"));
        assert_eq!(config.weekly_file, Path::new("data/weekly_timetable.xlsx"));
    }

    #[test]
    fn validate_requires_all_three_datasets() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::from_data_dir(dir.path());
        assert!(config.validate().is_err());

        std::fs::create_dir(&config.roster_dir).unwrap();
        std::fs::write(&config.master_file, "stub").unwrap();
        assert!(config.validate().is_err());

        std::fs::write(&config.weekly_file, "stub").unwrap();
        assert!(config.validate().is_ok());
    }
}
