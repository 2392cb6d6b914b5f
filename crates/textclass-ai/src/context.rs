//! Execution context used to resolve packaged model resources.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Environment variable naming the asset root for [`AssetContext::from_env`].
pub const ASSETS_ENV: &str = "TEXTCLASS_ASSETS";

/// Asset root used when `TEXTCLASS_ASSETS` is unset.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Root directory that model resources are resolved against.
///
/// Building a context never touches the filesystem; a missing root only shows
/// up when a client tries to load from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetContext {
    root: PathBuf,
}

impl AssetContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from `TEXTCLASS_ASSETS`, or `./assets` when unset or empty.
    pub fn from_env() -> Self {
        Self::from_root_var(std::env::var_os(ASSETS_ENV))
    }

    fn from_root_var(var: Option<OsString>) -> Self {
        let root = var
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a resource name onto the root.
    ///
    /// Returns `None` for names that could leave the root: absolute paths,
    /// drive prefixes, and `..` segments.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let rel = Path::new(name);
        let mut has_normal = false;
        for comp in rel.components() {
            match comp {
                Component::Normal(_) => has_normal = true,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        has_normal.then(|| self.root.join(rel))
    }
}
