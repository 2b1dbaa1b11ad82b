use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use timingkit_protocol::prelude::{Corrections, TimingType};
use tracing::{debug, info};

use crate::errors::{Result, TimingKitError};
use crate::serde_utils::{from_toml_str, to_toml_string};

/// What changed in a [`Preferences`] mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencesChange {
    Correction {
        kind: TimingType,
        previous: i32,
        current: i32,
    },
    Reset,
}

/// Delivered to every registered listener after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferencesEvent {
    pub change: PreferencesChange,
    /// Corrections after the change.
    pub corrections: Corrections,
}

type Listener = Box<dyn Fn(&PreferencesEvent) + Send + Sync>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    corrections: Corrections,
}

/// User-editable correction map backed by a TOML file.
///
/// Owners register listeners with [`Preferences::on_change`]; nothing is
/// broadcast globally.
pub struct Preferences {
    path: Option<PathBuf>,
    corrections: Corrections,
    listeners: Vec<Listener>,
}

impl Preferences {
    /// Loads preferences from `path`. A missing or empty file means no corrections.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let corrections = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Corrections::default()
            } else {
                let file: PreferencesFile = from_toml_str(&contents).map_err(|err| {
                    TimingKitError::PreferencesError(format!(
                        "invalid preferences file {}: {err}",
                        path.display()
                    ))
                })?;
                file.corrections
            }
        } else {
            Corrections::default()
        };

        debug!(path = %path.display(), ?corrections, "loaded preferences");
        Ok(Self {
            path: Some(path),
            corrections,
            listeners: Vec::new(),
        })
    }

    /// Preferences that are never written to disk.
    pub fn in_memory(corrections: Corrections) -> Self {
        Self {
            path: None,
            corrections,
            listeners: Vec::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn correction(&self, kind: TimingType) -> i32 {
        self.corrections.get(kind)
    }

    pub fn corrections(&self) -> Corrections {
        self.corrections
    }

    /// Registers a callback invoked after every successful mutation.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: Fn(&PreferencesEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Validates, stores and persists a correction, then notifies listeners.
    pub fn set_correction(&mut self, kind: TimingType, minutes: i32) -> Result<PreferencesEvent> {
        let previous = self.corrections.get(kind);
        let mut updated = self.corrections;
        updated.set(kind, minutes)?;

        self.persist(&updated)?;
        self.corrections = updated;
        info!(%kind, previous, current = minutes, "correction updated");

        Ok(self.notify(PreferencesChange::Correction {
            kind,
            previous,
            current: minutes,
        }))
    }

    /// Clears every correction.
    pub fn reset(&mut self) -> Result<PreferencesEvent> {
        let cleared = Corrections::default();
        self.persist(&cleared)?;
        self.corrections = cleared;
        info!("corrections reset");
        Ok(self.notify(PreferencesChange::Reset))
    }

    fn persist(&self, corrections: &Corrections) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = PreferencesFile {
            corrections: *corrections,
        };
        let serialized = to_toml_string(&file)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    fn notify(&self, change: PreferencesChange) -> PreferencesEvent {
        let event = PreferencesEvent {
            change,
            corrections: self.corrections,
        };
        for listener in &self.listeners {
            listener(&event);
        }
        event
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("path", &self.path)
            .field("corrections", &self.corrections)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;
    use timingkit_protocol::ProtocolError;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().expect("temp dir");
        let prefs = Preferences::load(dir.path().join("absent.toml")).expect("load");
        assert!(prefs.corrections().is_empty());
    }

    #[test]
    fn corrections_persist_across_reloads() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("preferences.toml");

        let mut prefs = Preferences::load(&path).expect("load");
        prefs.set_correction(TimingType::Fajr, 3).expect("set fajr");
        prefs.set_correction(TimingType::Isha, -10).expect("set isha");

        let contents = fs::read_to_string(&path).expect("read file");
        assert!(contents.contains("[corrections]"));
        assert!(contents.contains("fajr = 3"));

        let reloaded = Preferences::load(&path).expect("reload");
        assert_eq!(reloaded.correction(TimingType::Fajr), 3);
        assert_eq!(reloaded.correction(TimingType::Isha), -10);
        assert_eq!(reloaded.correction(TimingType::Asr), 0);
    }

    #[test]
    fn listeners_receive_every_change() {
        let mut prefs = Preferences::in_memory(Corrections::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let counter = calls.clone();
        prefs.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let log = seen.clone();
        prefs.on_change(move |event| log.lock().unwrap().push(event.change));

        prefs.set_correction(TimingType::Asr, 5).expect("set");
        prefs.reset().expect("reset");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                PreferencesChange::Correction {
                    kind: TimingType::Asr,
                    previous: 0,
                    current: 5
                },
                PreferencesChange::Reset
            ]
        );
        assert!(prefs.corrections().is_empty());
    }

    #[test]
    fn rejected_correction_changes_nothing() {
        let mut prefs = Preferences::in_memory(Corrections::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        prefs.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = prefs.set_correction(TimingType::Maghrib, 200).unwrap_err();
        assert!(matches!(
            err,
            TimingKitError::InvalidCorrection(ProtocolError::CorrectionOutOfRange { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(prefs.correction(TimingType::Maghrib), 0);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "[corrections]\nfajr = 999\n").expect("write");

        let err = Preferences::load(&path).unwrap_err();
        assert!(matches!(err, TimingKitError::PreferencesError(_)));
    }
}
