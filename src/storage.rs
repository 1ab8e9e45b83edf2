use crate::constants::{CACHE_DIR_NAME, CACHE_KEY};
use crate::models::{Theme, User};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The cached subset of the application state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedPreferences {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

/// Key-value cache holding the `{ user, theme }` entry as a JSON file
#[derive(Clone, Debug)]
pub struct PreferenceCache {
    dir: PathBuf,
}

impl PreferenceCache {
    /// Cache rooted at `dir`; the entry lives at `dir/<CACHE_KEY>.json`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PreferenceCache { dir: dir.into() }
    }

    /// Cache in the default location under the home directory
    pub fn in_home() -> Self {
        let dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_DIR_NAME);
        Self::new(dir)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", CACHE_KEY))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure cache directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("creating {}", self.dir.display()))?;
        }
        Ok(())
    }

    /// Overwrite the cached entry
    pub fn save(&self, user: &User, theme: Theme) -> Result<()> {
        self.ensure_dir()?;
        let entry = CachedPreferences {
            user: Some(user.clone()),
            theme: Some(theme),
        };
        let content = serde_json::to_string_pretty(&entry)?;
        fs::write(self.path(), content)?;
        Ok(())
    }

    /// Read the cached entry. `Ok(None)` when nothing was cached yet, an
    /// error when the entry exists but cannot be decoded.
    pub fn load(&self) -> Result<Option<CachedPreferences>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let entry = serde_json::from_str(&content)
            .with_context(|| format!("decoding {}", path.display()))?;
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use tempfile::tempdir;

    #[test]
    fn test_missing_entry_loads_as_none() {
        let dir = tempdir().unwrap();
        let cache = PreferenceCache::new(dir.path().join("nested"));
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_save_writes_user_and_theme() {
        let dir = tempdir().unwrap();
        let cache = PreferenceCache::new(dir.path().join("nested"));
        cache.save(&mock::user(), Theme::Light).unwrap();

        let entry = cache.load().unwrap().unwrap();
        assert_eq!(entry.user, Some(mock::user()));
        assert_eq!(entry.theme, Some(Theme::Light));
    }

    #[test]
    fn test_malformed_entry_is_an_error() {
        let dir = tempdir().unwrap();
        let cache = PreferenceCache::new(dir.path());
        fs::write(cache.path(), "{ not json").unwrap();
        assert!(cache.load().is_err());
    }
}
