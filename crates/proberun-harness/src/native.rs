//! Native probe modules loaded as dynamic libraries
//!
//! Provides cross-platform dynamic loading of probe modules using
//! `libloading`. A probe module is a dynamic library (`.so`/`.dylib`/`.dll`)
//! exporting the [`REGISTER_SYMBOL`] entry point, which receives a fresh
//! [`TestModule`] and pushes its probes into it. The [`export_probes!`]
//! macro writes that entry point for module crates.
//!
//! Probes cross the library boundary as Rust types, so module crates must
//! be built with the same compiler as the harness.

use crate::loader::{LoadError, ModuleLoader};
use crate::module::TestModule;
use libloading::{Library, Symbol};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Name of the registration entry point every probe module exports.
pub const REGISTER_SYMBOL: &[u8] = b"proberun_register";

/// Signature of the registration entry point.
///
/// # Safety
///
/// The pointee is a live, exclusively borrowed [`TestModule`]; the callee
/// must only push probes into it.
pub type RegisterFn = unsafe extern "C" fn(*mut TestModule);

/// Declares the registration entry point for a probe-module crate.
///
/// ```ignore
/// fn register(module: &mut proberun_harness::TestModule) {
///     module.push(Probe::new("passes", || Ok(())));
/// }
/// proberun_harness::export_probes!(register);
/// ```
#[macro_export]
macro_rules! export_probes {
    ($register:path) => {
        #[no_mangle]
        pub unsafe extern "C" fn proberun_register(module: *mut $crate::TestModule) {
            let module = &mut *module;
            $register(module);
        }
    };
}

/// Loads probe modules as platform dynamic libraries.
///
/// Loaded libraries are cached by canonical path for the loader's lifetime,
/// which keeps their code mapped while the probes they registered run: the
/// loader must outlive every module it produced.
///
/// # Safety
///
/// Loading a dynamic library runs its initializers in-process; probe
/// modules are trusted code, the same way the scripts a test harness
/// executes are.
pub struct NativeLoader {
    loaded: HashMap<PathBuf, Library>,
}

impl NativeLoader {
    pub fn new() -> Self {
        Self {
            loaded: HashMap::new(),
        }
    }
}

impl Default for NativeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader for NativeLoader {
    fn extension(&self) -> &str {
        std::env::consts::DLL_EXTENSION
    }

    fn load(&mut self, path: &Path) -> Result<TestModule, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let canonical = path.canonicalize().map_err(|e| LoadError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !self.loaded.contains_key(&canonical) {
            // Safety: see the type-level note; malformed files surface as a
            // LoadFailed instead of loading.
            let library =
                unsafe { Library::new(&canonical) }.map_err(|e| LoadError::LoadFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            self.loaded.insert(canonical.clone(), library);
        }
        let library = &self.loaded[&canonical];

        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();

        // Safety: the symbol carries the published registration signature.
        let register: Symbol<RegisterFn> =
            unsafe { library.get(REGISTER_SYMBOL) }.map_err(|_| LoadError::SymbolNotFound {
                module: file_name.clone(),
                symbol: String::from_utf8_lossy(REGISTER_SYMBOL).into_owned(),
            })?;

        let mut module = TestModule::new(file_name);
        // Safety: `module` is alive and exclusively borrowed for the call;
        // the library stays cached (and mapped) as long as the loader lives.
        unsafe { register(&mut module) };
        Ok(module)
    }
}
