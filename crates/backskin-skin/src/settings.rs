//! Persisted plugin settings.
//!
//! The stored skin choice lives in the `theme` field. Older installs kept it
//! in a system parameter, which is still read when `theme` is absent.

use std::collections::BTreeMap;

use backskin_types::error::{BackskinError, Result};
use backskin_vfs::Vfs;

/// Settings field holding the chosen skin code.
pub const THEME_SETTING: &str = "theme";

/// Legacy system parameter holding the chosen skin code.
pub const LEGACY_PARAMETER: &str = "backskin::skin.active";

/// Key-value setting storage.
pub trait SettingStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Settings held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingStore for MemorySettings {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings stored as a flat TOML table in a file.
pub struct TomlSettings {
    vfs: Box<dyn Vfs>,
    path: String,
}

impl TomlSettings {
    pub fn new(vfs: Box<dyn Vfs>, path: impl Into<String>) -> Self {
        Self {
            vfs,
            path: path.into(),
        }
    }

    fn load(&self) -> Result<toml::Table> {
        if !self.vfs.exists(&self.path)? {
            return Ok(toml::Table::new());
        }
        let bytes = self.vfs.read(&self.path)?;
        let text = String::from_utf8(bytes).map_err(|_| {
            BackskinError::Settings(format!("{} is not valid UTF-8", self.path))
        })?;
        Ok(toml::from_str(&text)?)
    }
}

impl SettingStore for TomlSettings {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.load()?.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(BackskinError::Settings(format!(
                "setting '{key}' must be a string, found {}",
                other.type_str()
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut table = self.load()?;
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        let text = toml::to_string(&table)?;
        if let Some((dir, _)) = self.path.rsplit_once('/') {
            if !dir.is_empty() {
                self.vfs.mkdir(dir)?;
            }
        }
        self.vfs.write(&self.path, text.as_bytes())?;
        log::debug!("Stored setting '{key}' in {}", self.path);
        Ok(())
    }
}
