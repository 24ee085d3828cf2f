use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Read-through cache for parsed spreadsheet files, keyed by path.
///
/// Each entry is tied to the file's modification time: an unchanged file
/// is served from memory, a changed file is reloaded on the next access.
/// `invalidate` and `clear` are the explicit hooks for a hosting process
/// that wants to force a reload without touching the file.
pub struct FileCache<T> {
    entries: Mutex<HashMap<PathBuf, (SystemTime, Arc<T>)>>,
}

impl<T> FileCache<T> {
    pub fn new() -> Self {
        FileCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<T>, Box<dyn Error>>
    where
        F: FnOnce(&Path) -> Result<T, Box<dyn Error>>,
    {
        let modified = fs::metadata(path)?.modified()?;

        let mut entries = self.entries.lock().unwrap();
        if let Some((cached_at, value)) = entries.get(path) {
            if *cached_at == modified {
                return Ok(Arc::clone(value));
            }
            log::debug!("{} changed on disk, reloading", path.display());
        }

        let value = Arc::new(load(path)?);
        entries.insert(path.to_path_buf(), (modified, Arc::clone(&value)));
        Ok(value)
    }

    pub fn invalidate(&self, path: &Path) {
        self.entries.lock().unwrap().remove(path);
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl<T> Default for FileCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

// The roster index is derived from a whole directory, so its cache key
// is the sorted (path, mtime) listing of the directory's .xlsx files.
type DirFingerprint = Vec<(PathBuf, SystemTime)>;

/// Read-through cache for one directory-derived value.
///
/// Rebuilds when a roster file is added, removed or touched.
pub struct DirCache<T> {
    entry: Mutex<Option<(PathBuf, DirFingerprint, Arc<T>)>>,
}

impl<T> DirCache<T> {
    pub fn new() -> Self {
        DirCache {
            entry: Mutex::new(None),
        }
    }

    pub fn get_or_build<F>(&self, dir: &Path, build: F) -> Result<Arc<T>, Box<dyn Error>>
    where
        F: FnOnce(&Path) -> Result<T, Box<dyn Error>>,
    {
        let fingerprint = dir_fingerprint(dir)?;

        let mut entry = self.entry.lock().unwrap();
        if let Some((cached_dir, cached_fingerprint, value)) = entry.as_ref() {
            if cached_dir == dir && *cached_fingerprint == fingerprint {
                return Ok(Arc::clone(value));
            }
            log::debug!("{} changed on disk, rebuilding index", dir.display());
        }

        let value = Arc::new(build(dir)?);
        *entry = Some((dir.to_path_buf(), fingerprint, Arc::clone(&value)));
        Ok(value)
    }

    pub fn clear(&self) {
        *self.entry.lock().unwrap() = None;
    }
}

impl<T> Default for DirCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn dir_fingerprint(dir: &Path) -> Result<DirFingerprint, Box<dyn Error>> {
    let mut fingerprint = Vec::new();
    for path in crate::loader::roster_files(dir)? {
        let modified = fs::metadata(&path)?.modified()?;
        fingerprint.push((path, modified));
    }
    Ok(fingerprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn serves_unchanged_files_from_memory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        fs::write(&path, "one").unwrap();

        let cache: FileCache<String> = FileCache::new();
        let loads = Cell::new(0);
        let load = |p: &Path| -> Result<String, Box<dyn Error>> {
            loads.set(loads.get() + 1);
            Ok(fs::read_to_string(p)?)
        };

        assert_eq!(*cache.get_or_load(&path, load).unwrap(), "one");
        assert_eq!(*cache.get_or_load(&path, load).unwrap(), "one");
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn reloads_when_the_mtime_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        fs::write(&path, "one").unwrap();

        let cache: FileCache<String> = FileCache::new();
        let loads = Cell::new(0);
        let load = |p: &Path| -> Result<String, Box<dyn Error>> {
            loads.set(loads.get() + 1);
            Ok(fs::read_to_string(p)?)
        };

        cache.get_or_load(&path, load).unwrap();
        fs::write(&path, "two").unwrap();
        let bumped = SystemTime::now() + Duration::from_secs(60);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(bumped)
            .unwrap();

        assert_eq!(*cache.get_or_load(&path, load).unwrap(), "two");
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        fs::write(&path, "one").unwrap();

        let cache: FileCache<String> = FileCache::new();
        let loads = Cell::new(0);
        let load = |p: &Path| -> Result<String, Box<dyn Error>> {
            loads.set(loads.get() + 1);
            Ok(fs::read_to_string(p)?)
        };

        cache.get_or_load(&path, load).unwrap();
        cache.invalidate(&path);
        cache.get_or_load(&path, load).unwrap();
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn missing_file_is_an_error_not_a_cache_entry() {
        let dir = TempDir::new().unwrap();
        let cache: FileCache<String> = FileCache::new();
        let result = cache.get_or_load(&dir.path().join("absent.xlsx"), |_| Ok(String::new()));
        assert!(result.is_err());
    }

    #[test]
    fn dir_cache_rebuilds_when_a_file_appears() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CS101_A.xlsx"), "stub").unwrap();

        let cache: DirCache<usize> = DirCache::new();
        let builds = Cell::new(0);
        let build = |d: &Path| -> Result<usize, Box<dyn Error>> {
            builds.set(builds.get() + 1);
            Ok(crate::loader::roster_files(d)?.len())
        };

        assert_eq!(*cache.get_or_build(dir.path(), build).unwrap(), 1);
        assert_eq!(*cache.get_or_build(dir.path(), build).unwrap(), 1);
        assert_eq!(builds.get(), 1);

        fs::write(dir.path().join("CS101_B.xlsx"), "stub").unwrap();
        assert_eq!(*cache.get_or_build(dir.path(), build).unwrap(), 2);
        assert_eq!(builds.get(), 2);
    }

    #[test]
    fn dir_cache_clear_forces_a_rebuild() {
        let dir = TempDir::new().unwrap();
        let cache: DirCache<usize> = DirCache::new();
        let builds = Cell::new(0);
        let build = |_: &Path| -> Result<usize, Box<dyn Error>> {
            builds.set(builds.get() + 1);
            Ok(0)
        };

        cache.get_or_build(dir.path(), build).unwrap();
        cache.clear();
        cache.get_or_build(dir.path(), build).unwrap();
        assert_eq!(builds.get(), 2);
    }
}
