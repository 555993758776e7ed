use crate::loader::DefinitionLoader;
use crate::types::{MachineDefinition, TuringMachineError};

use std::sync::RwLock;

// Default embedded machines, keyed by catalog name
const MACHINE_TEXTS: [(&str, &str); 3] = [
    ("unary_add", include_str!("../machines/unary_add.json")),
    ("unary_sub", include_str!("../machines/unary_sub.json")),
    ("is_palindrome", include_str!("../machines/is_palindrome.json")),
];

lazy_static::lazy_static! {
    pub static ref MACHINES: RwLock<Vec<(String, MachineDefinition)>> = RwLock::new(Vec::new());
}

pub struct MachineCatalog;

impl MachineCatalog {
    /// Loads the embedded machine definitions into the catalog.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut machines = Vec::new();

        for (key, text) in MACHINE_TEXTS {
            match DefinitionLoader::load_definition_from_str(text) {
                Ok(definition) => machines.push((key.to_string(), definition)),
                Err(e) => tracing::error!(machine = key, "Failed to load built-in machine: {e}"),
            }
        }

        let mut write_guard = MACHINES.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;
        *write_guard = machines;

        Ok(())
    }

    fn ensure_loaded() {
        let loaded = MACHINES.read().map(|m| !m.is_empty()).unwrap_or(false);
        if !loaded {
            let _ = Self::load();
        }
    }

    /// Get the number of available machines
    pub fn count() -> usize {
        Self::ensure_loaded();

        MACHINES.read().map(|machines| machines.len()).unwrap_or(0)
    }

    /// Get a machine by its position in the catalog
    pub fn get_by_index(index: usize) -> Result<MachineDefinition, TuringMachineError> {
        Self::ensure_loaded();

        MACHINES
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Machine index {} out of range", index))
            })
    }

    /// Get a machine by its catalog name (e.g. `unary_add`)
    pub fn get_by_name(name: &str) -> Result<MachineDefinition, TuringMachineError> {
        Self::ensure_loaded();

        MACHINES
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Machine '{}' not found", name))
            })
    }

    /// List catalog names together with each machine's descriptive name
    pub fn list_names() -> Vec<(String, String)> {
        Self::ensure_loaded();

        MACHINES
            .read()
            .map(|machines| {
                machines
                    .iter()
                    .map(|(key, definition)| (key.clone(), definition.name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the embedded JSON source of a built-in machine
    pub fn text_by_name(name: &str) -> Result<&'static str, TuringMachineError> {
        MACHINE_TEXTS
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, text)| *text)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Machine '{}' not found", name))
            })
    }
}
