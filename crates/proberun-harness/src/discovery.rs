//! Module discovery - find and load eligible probe-module files
//!
//! One directory level only, no recursion. Eligibility is the loader's
//! extension, matched case-insensitively. Any per-item failure — a file
//! that fails to load, an entry that cannot be enumerated — is recorded
//! and skipped; the rest of the directory still loads.

use crate::loader::{LoadError, ModuleLoader};
use crate::module::TestModule;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of scanning one directory for probe modules.
#[derive(Debug, Default)]
pub struct DiscoveredModules {
    /// Modules that loaded, in file-name order.
    pub modules: Vec<TestModule>,
    /// Eligible files that failed to load.
    pub load_errors: Vec<(PathBuf, LoadError)>,
}

impl DiscoveredModules {
    /// Scan `dir` and load every eligible file through `loader`.
    pub fn discover(dir: &Path, loader: &mut dyn ModuleLoader) -> Self {
        let mut found = Self::default();
        let wanted = loader.extension().to_ascii_lowercase();

        // An unenumerable directory (missing, permission denied) is a
        // discovery error, not an empty run.
        if let Err(e) = fs::read_dir(dir) {
            found.load_errors.push((
                dir.to_path_buf(),
                LoadError::ListFailed {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                },
            ));
            return found;
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| dir.to_path_buf());
                    let reason = e.to_string();
                    found
                        .load_errors
                        .push((path.clone(), LoadError::ListFailed { path, reason }));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let eligible = path
                .extension()
                .and_then(OsStr::to_str)
                .map(|ext| ext.eq_ignore_ascii_case(&wanted))
                .unwrap_or(false);
            if eligible {
                files.push(path);
            }
        }

        // Raw directory-listing order is platform-dependent; sort file
        // names for reproducible runs.
        files.sort();

        for path in files {
            match loader.load(&path) {
                Ok(module) => found.modules.push(module),
                Err(e) => found.load_errors.push((path, e)),
            }
        }

        found
    }

    /// Check if anything loaded.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Total probes across all loaded modules.
    pub fn probe_count(&self) -> usize {
        self.modules.iter().map(TestModule::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use crate::module::Probe;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn discover_loads_eligible_files_in_name_order() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.test");
        touch(dir.path(), "a.test");
        touch(dir.path(), "notes.txt");

        let mut loader = MemoryLoader::new("test")
            .register("a.test", || {
                Ok(TestModule::new("a.test").with_probe(Probe::new("passes", || Ok(()))))
            })
            .register("b.test", || {
                Ok(TestModule::new("b.test").with_probe(Probe::new("passes2", || Ok(()))))
            });

        let found = DiscoveredModules::discover(dir.path(), &mut loader);
        assert!(found.load_errors.is_empty());
        assert_eq!(found.module_count(), 2);
        assert_eq!(found.probe_count(), 2);
        let ids: Vec<_> = found.modules.iter().map(|m| m.id().to_string()).collect();
        assert_eq!(ids, vec!["a.test", "b.test"]);
    }

    #[test]
    fn discover_matches_extension_case_insensitively() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "upper.TEST");

        let mut loader = MemoryLoader::new("test")
            .register("upper.TEST", || Ok(TestModule::new("upper.TEST")));

        let found = DiscoveredModules::discover(dir.path(), &mut loader);
        assert_eq!(found.module_count(), 1);
    }

    #[test]
    fn discover_skips_failing_file_and_keeps_going() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "bad.test");
        touch(dir.path(), "good.test");

        let mut loader = MemoryLoader::new("test")
            .register("bad.test", || {
                Err(LoadError::LoadFailed {
                    path: PathBuf::from("bad.test"),
                    reason: "syntax error".to_string(),
                })
            })
            .register("good.test", || {
                Ok(TestModule::new("good.test").with_probe(Probe::new("still_runs", || Ok(()))))
            });

        let found = DiscoveredModules::discover(dir.path(), &mut loader);
        assert_eq!(found.load_errors.len(), 1);
        assert_eq!(found.module_count(), 1);
        assert_eq!(found.modules[0].id(), "good.test");
    }

    #[test]
    fn discover_does_not_recurse() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "deep.test");

        let mut loader =
            MemoryLoader::new("test").register("deep.test", || Ok(TestModule::new("deep.test")));

        let found = DiscoveredModules::discover(dir.path(), &mut loader);
        assert!(found.is_empty());
        assert!(found.load_errors.is_empty());
    }

    #[test]
    fn discover_missing_directory_is_a_discovery_error() {
        let mut loader = MemoryLoader::new("test");

        let found =
            DiscoveredModules::discover(Path::new("/nonexistent/never-created"), &mut loader);
        assert!(found.is_empty());
        assert_eq!(found.load_errors.len(), 1);
        assert!(matches!(
            found.load_errors[0].1,
            LoadError::ListFailed { .. }
        ));
    }

    #[test]
    fn discover_on_a_file_path_is_a_discovery_error() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "plain.test");

        let mut loader = MemoryLoader::new("test");
        let found = DiscoveredModules::discover(&dir.path().join("plain.test"), &mut loader);
        assert!(found.is_empty());
        assert!(matches!(
            found.load_errors[0].1,
            LoadError::ListFailed { .. }
        ));
    }

    #[test]
    fn discover_empty_directory_is_empty() {
        let dir = tempdir().unwrap();
        let mut loader = MemoryLoader::new("test");

        let found = DiscoveredModules::discover(dir.path(), &mut loader);
        assert!(found.is_empty());
        assert_eq!(found.probe_count(), 0);
    }
}
