//! Editor-side settings
//!
//! Width and tab size come from the host's preferences. Some external tools
//! only read the global preferences, so a view's rulers can be installed
//! there for the duration of a call with [`RulerOverride`].

use crate::format::FormatConfig;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Anything that holds a ruler setting
pub trait RulerStore {
    /// Current rulers, `None` when unset
    fn rulers(&self) -> Option<Vec<usize>>;

    /// Replace the rulers; `None` unsets them
    fn set_rulers(&mut self, rulers: Option<Vec<usize>>);
}

/// Preferences as stored by the host
///
/// Keys this crate does not know are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Ruler columns; the first one is the formatting width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rulers: Option<Vec<usize>>,
    /// Columns per tab stop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<usize>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

impl Preferences {
    /// Read preferences from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write preferences as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Formatting settings, with defaults for anything missing
    pub fn format_config(&self) -> FormatConfig {
        FormatConfig::from_settings(self.rulers.as_deref(), self.tab_size)
    }
}

impl RulerStore for Preferences {
    fn rulers(&self) -> Option<Vec<usize>> {
        self.rulers.clone()
    }

    fn set_rulers(&mut self, rulers: Option<Vec<usize>>) {
        self.rulers = rulers;
    }
}

/// Rulers installed into a store until the guard is dropped
///
/// The store's previous rulers come back on every exit path, unwinding
/// included. The store stays usable through the guard.
pub struct RulerOverride<'s, S: RulerStore + ?Sized> {
    store: &'s mut S,
    original: Option<Vec<usize>>,
}

impl<'s, S: RulerStore + ?Sized> RulerOverride<'s, S> {
    /// Install `rulers` into `store`
    pub fn install(store: &'s mut S, rulers: Option<Vec<usize>>) -> Self {
        let original = store.rulers();
        log_debug!("Overriding rulers {:?} with {:?}", original, rulers);
        store.set_rulers(rulers);
        Self { store, original }
    }

    /// Rulers that will be restored
    pub fn original(&self) -> Option<&[usize]> {
        self.original.as_deref()
    }
}

impl<S: RulerStore + ?Sized> Deref for RulerOverride<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.store
    }
}

impl<S: RulerStore + ?Sized> DerefMut for RulerOverride<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.store
    }
}

impl<S: RulerStore + ?Sized> Drop for RulerOverride<'_, S> {
    fn drop(&mut self) {
        log_debug!("Restoring rulers {:?}", self.original);
        self.store.set_rulers(self.original.take());
    }
}

/// Run `f` with `rulers` installed into `store`
pub fn with_rulers<S, T>(store: &mut S, rulers: Option<Vec<usize>>, f: impl FnOnce(&mut S) -> T) -> T
where
    S: RulerStore + ?Sized,
{
    let mut guard = RulerOverride::install(store, rulers);
    f(&mut *guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_json() {
        let prefs = Preferences::from_json(r#"{"rulers": [72, 100], "font_size": 11}"#).unwrap();
        assert_eq!(prefs.rulers, Some(vec![72, 100]));
        assert_eq!(prefs.tab_size, None);
        assert_eq!(prefs.format_config().width, 72);
        assert_eq!(prefs.format_config().tab_size, 4);

        let json = prefs.to_json().unwrap();
        assert!(json.contains("\"font_size\":11"));
    }

    #[test]
    fn test_override_restores() {
        let mut prefs = Preferences {
            rulers: Some(vec![80]),
            ..Preferences::default()
        };
        {
            let guard = RulerOverride::install(&mut prefs, Some(vec![100]));
            assert_eq!(guard.rulers, Some(vec![100]));
            assert_eq!(guard.original(), Some(&[80][..]));
        }
        assert_eq!(prefs.rulers, Some(vec![80]));
    }

    #[test]
    fn test_override_restores_unset() {
        let mut prefs = Preferences::default();
        let width = with_rulers(&mut prefs, Some(vec![60]), |p| p.format_config().width);
        assert_eq!(width, 60);
        assert_eq!(prefs.rulers, None);
    }

    #[test]
    fn test_override_restores_on_panic() {
        let mut prefs = Preferences {
            rulers: Some(vec![80]),
            ..Preferences::default()
        };
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_rulers(&mut prefs, Some(vec![120]), |_| panic!("tool failed"));
        }));
        assert!(result.is_err());
        assert_eq!(prefs.rulers, Some(vec![80]));
    }
}
