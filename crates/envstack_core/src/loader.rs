//! Environment file loading.
//!
//! The loader resolves an ordered list of file names against a root
//! directory, parses every file that exists and merges the results. Files are
//! listed from lowest to highest precedence; missing files are expected (local
//! override files are usually absent) and are skipped.
//!
//! # Architecture
//!
//! ```text
//! EnvLoader
//!     ↓ depends on (abstraction)
//! FileSource trait
//!     ↑ implemented by
//! FsFileSource (std::fs) / InMemoryFileSource (embedding, tests)
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use envstack_core::{load_environment, LoadOptions};
//!
//! let env = load_environment(None, &[".env", ".env.local"], LoadOptions::default())?;
//! for (key, value) in env.iter() {
//!     println!("{key}={value}");
//! }
//! # Ok::<(), envstack_core::EnvError>(())
//! ```

use crate::{
    environment::EnvironmentMapping,
    errors::{EnvError, EnvResult},
    merger::merge_into,
    parser::parse,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Read access to environment files.
///
/// The loader only asks whether a path holds a file and for its text. How
/// paths map onto storage is up to the implementation.
pub trait FileSource {
    /// Returns `true` if `path` refers to a readable file.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// * `EnvError::FileAccess` - The file cannot be read or is not UTF-8
    fn read_text(&self, path: &Path) -> EnvResult<String>;
}

/// [`FileSource`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileSource;

impl FileSource for FsFileSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_text(&self, path: &Path) -> EnvResult<String> {
        fs::read_to_string(path).map_err(|e| EnvError::FileAccess {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// [`FileSource`] serving files from memory.
///
/// # Examples
///
/// ```
/// use envstack_core::{EnvLoader, InMemoryFileSource};
///
/// let source = InMemoryFileSource::new()
///     .with_file("/app/.env", "A=1\nB=1\n")
///     .with_file("/app/.env.local", "B=2\n");
///
/// let env = EnvLoader::new(source, "/app").load(&[".env", ".env.local"])?;
/// assert_eq!(env.get("B"), Some("2"));
/// # Ok::<(), envstack_core::EnvError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSource {
    files: HashMap<PathBuf, String>,
}

impl InMemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, builder style.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileSource for InMemoryFileSource {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_text(&self, path: &Path) -> EnvResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| EnvError::FileAccess {
                path: path.display().to_string(),
                reason: "file not found".to_string(),
            })
    }
}

/// Options controlling how files are parsed and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Leave out keys whose value is empty or blank. Defaults to `true`.
    pub empty_as_undefined: bool,

    /// Report skipped and loaded files at `warn`/`info` level instead of
    /// `debug`. Never changes the result. Defaults to `false`.
    pub debug: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            empty_as_undefined: true,
            debug: false,
        }
    }
}

/// Loads and merges environment files relative to a root directory.
#[derive(Debug, Clone)]
pub struct EnvLoader<S = FsFileSource> {
    source: S,
    root: PathBuf,
    options: LoadOptions,
}

impl EnvLoader<FsFileSource> {
    /// Creates a filesystem loader rooted at `root`, or at the current
    /// working directory when `root` is `None`.
    ///
    /// # Errors
    ///
    /// * `EnvError::FileAccess` - The current directory cannot be determined
    pub fn from_fs(root: Option<&Path>) -> EnvResult<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir().map_err(|e| EnvError::FileAccess {
                path: ".".to_string(),
                reason: format!("cannot determine current directory: {}", e),
            })?,
        };
        Ok(Self::new(FsFileSource, root))
    }
}

impl<S: FileSource> EnvLoader<S> {
    pub fn new(source: S, root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            root: root.into(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads `files` in order, lowest precedence first.
    ///
    /// Files are read one at a time and each is layered on top of the ones
    /// before it.
    ///
    /// # Errors
    ///
    /// * `EnvError::FileAccess` - A file exists but cannot be read
    pub fn load<P: AsRef<Path>>(&self, files: &[P]) -> EnvResult<EnvironmentMapping> {
        let mut combined = EnvironmentMapping::new();

        for file in files {
            let file = file.as_ref();
            let path = self.root.join(file);

            if !self.source.exists(&path) {
                let file = file.display();
                if self.options.debug {
                    warn!(message = "Skipping environment file, file missing", file = %file);
                } else {
                    debug!(message = "Skipping environment file, file missing", file = %file);
                }
                continue;
            }

            let content = self.source.read_text(&path)?;
            let layer = parse(&content, self.options.empty_as_undefined);
            let key_count = layer.len();
            merge_into(&mut combined, layer);

            let file = file.display();
            if self.options.debug {
                info!(message = "Loaded environment file", file = %file, keys = key_count);
            } else {
                debug!(message = "Loaded environment file", file = %file, keys = key_count);
            }
        }

        Ok(combined)
    }
}

/// Loads `files` from `root` (or the current directory) on the local
/// filesystem.
///
/// # Errors
///
/// * `EnvError::FileAccess` - A file exists but cannot be read, or the
///   current directory cannot be determined
pub fn load_environment<P: AsRef<Path>>(
    root: Option<&Path>,
    files: &[P],
    options: LoadOptions,
) -> EnvResult<EnvironmentMapping> {
    EnvLoader::from_fs(root)?.with_options(options).load(files)
}
