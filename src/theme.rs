//! Persisted color theme preference
//!
//! Stored as the literal `"dark"` or `"light"` under its own key,
//! independent of the task list.

use crate::storage::{StorageBackend, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Load the stored preference; unknown or absent values fall back
    /// to light.
    pub fn load(storage: &impl StorageBackend) -> Self {
        storage
            .get(THEME_KEY)
            .and_then(|v| Self::from_str(&v))
            .unwrap_or_default()
    }

    pub fn save(self, storage: &mut impl StorageBackend) {
        if let Err(err) = storage.set(THEME_KEY, self.as_str()) {
            log::warn!("Failed to persist theme: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_theme_round_trip() {
        let mut storage = MemoryStorage::new();
        Theme::Dark.save(&mut storage);
        assert_eq!(Theme::load(&storage), Theme::Dark);
        Theme::Light.save(&mut storage);
        assert_eq!(Theme::load(&storage), Theme::Light);
    }

    #[test]
    fn test_unknown_literal_falls_back_to_light() {
        let mut storage = MemoryStorage::new();
        storage.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(Theme::load(&storage), Theme::Light);
    }

    #[test]
    fn test_absent_defaults_to_light() {
        let storage = MemoryStorage::new();
        assert_eq!(Theme::load(&storage), Theme::Light);
    }

    #[test]
    fn test_toggled() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
