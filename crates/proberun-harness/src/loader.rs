//! Module loading abstraction
//!
//! Discovery only needs two capabilities from the outside world: "list the
//! entries of a directory" (see [`crate::discovery`]) and "load file F as a
//! module". The latter is the [`ModuleLoader`] trait, kept injectable so the
//! runner and reporter are testable against the in-memory [`MemoryLoader`]
//! instead of real dynamic libraries.

use crate::module::TestModule;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Module discovery and loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("module file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to list directory {path}: {reason}")]
    ListFailed { path: PathBuf, reason: String },

    #[error("symbol '{symbol}' not found in module '{module}'")]
    SymbolNotFound { module: String, symbol: String },

    #[error("failed to load {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
}

/// Capability: turn one eligible file into a [`TestModule`].
///
/// Loading may run the module's own top-level code and is allowed to fail;
/// discovery treats a per-file failure as skippable and keeps going.
pub trait ModuleLoader {
    /// File extension this loader accepts (without the dot). Discovery
    /// matches it case-insensitively.
    fn extension(&self) -> &str;

    /// Load one file as a fresh module.
    fn load(&mut self, path: &Path) -> Result<TestModule, LoadError>;
}

type ModuleFactory = Box<dyn FnMut() -> Result<TestModule, LoadError>>;

/// In-memory fixture loader keyed by file name.
///
/// Pairs with a directory of marker files in tests: discovery does the real
/// directory walk and extension filtering, while the module contents come
/// from registered factories rather than the filesystem.
pub struct MemoryLoader {
    extension: String,
    factories: HashMap<String, ModuleFactory>,
}

impl MemoryLoader {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            factories: HashMap::new(),
        }
    }

    /// Register the factory invoked when `file_name` is loaded.
    pub fn register(
        mut self,
        file_name: impl Into<String>,
        factory: impl FnMut() -> Result<TestModule, LoadError> + 'static,
    ) -> Self {
        self.factories.insert(file_name.into(), Box::new(factory));
        self
    }
}

impl ModuleLoader for MemoryLoader {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn load(&mut self, path: &Path) -> Result<TestModule, LoadError> {
        let name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        match self.factories.get_mut(&name) {
            Some(factory) => factory(),
            None => Err(LoadError::NotFound(path.to_path_buf())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Probe;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_loader_serves_registered_factory() {
        let mut loader = MemoryLoader::new("test").register("a.test", || {
            Ok(TestModule::new("a.test").with_probe(Probe::new("passes", || Ok(()))))
        });

        let module = loader.load(Path::new("/anywhere/a.test")).unwrap();
        assert_eq!(module.id(), "a.test");
        assert_eq!(module.len(), 1);
    }

    #[test]
    fn memory_loader_unknown_file_is_not_found() {
        let mut loader = MemoryLoader::new("test");
        let err = loader.load(Path::new("missing.test")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn memory_loader_factory_error_propagates() {
        let mut loader = MemoryLoader::new("test").register("bad.test", || {
            Err(LoadError::LoadFailed {
                path: PathBuf::from("bad.test"),
                reason: "unexpected token".to_string(),
            })
        });

        let err = loader.load(Path::new("bad.test")).unwrap_err();
        assert!(err.to_string().contains("unexpected token"));
    }
}
