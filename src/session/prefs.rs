use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::store::{StateStore, PREFERENCES_KEY};

pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Preferences {
    theme: String,
    #[serde(default)]
    flags: HashMap<String, bool>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            flags: HashMap::new(),
        }
    }
}

/// UI theme and feature-flag toggles. No invariants beyond defaults:
/// an unset flag reads as off, an unset theme reads as the default.
pub struct PreferencesStore<S: StateStore> {
    prefs: Preferences,
    store: S,
}

impl<S: StateStore> PreferencesStore<S> {
    pub fn open(store: S) -> Result<Self, ClientError> {
        let prefs = match store.load(PREFERENCES_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => Preferences::default(),
        };
        Ok(Self { prefs, store })
    }

    pub fn theme(&self) -> &str {
        &self.prefs.theme
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> Result<(), ClientError> {
        self.prefs.theme = theme.into();
        self.persist()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.prefs.flags.get(name).copied().unwrap_or(false)
    }

    pub fn flags(&self) -> &HashMap<String, bool> {
        &self.prefs.flags
    }

    pub fn set_flag(&mut self, name: impl Into<String>, enabled: bool) -> Result<(), ClientError> {
        self.prefs.flags.insert(name.into(), enabled);
        self.persist()
    }

    fn persist(&mut self) -> Result<(), ClientError> {
        let raw = serde_json::to_string_pretty(&self.prefs)?;
        self.store.save(PREFERENCES_KEY, &raw)
    }
}
