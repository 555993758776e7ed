//! This module provides the `DefinitionLoader` struct, responsible for loading machine
//! definitions from JSON sources, including files, strings and already parsed values.

use crate::analyzer::analyze;
use crate::types::{MachineDefinition, TuringMachineError, MAX_DEFINITION_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `DefinitionLoader` is a utility struct for loading machine definitions.
/// It provides methods to load a definition from a file, from string content or from a
/// `serde_json::Value`, and to discover and load all `.json` files within a directory.
///
/// Every loaded definition is linted; lints are logged as warnings and never fail a load.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Loads a single machine definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDefinition)` if the file is successfully read and deserialized.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::MalformedDefinition)` if the content is not a valid definition.
    pub fn load_definition(path: &Path) -> Result<MachineDefinition, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_definition_from_str(&content)
    }

    /// Loads a single machine definition from the provided JSON string.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineDefinition)` if the content is a valid definition.
    /// * `Err(TuringMachineError::MalformedDefinition)` if a required field is missing,
    ///   ill-typed, or the content exceeds `MAX_DEFINITION_SIZE`.
    pub fn load_definition_from_str(content: &str) -> Result<MachineDefinition, TuringMachineError> {
        if content.len() > MAX_DEFINITION_SIZE {
            return Err(TuringMachineError::MalformedDefinition(format!(
                "Definition is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_DEFINITION_SIZE
            )));
        }

        let definition: MachineDefinition = serde_json::from_str(content)?;
        Self::lint(&definition);

        Ok(definition)
    }

    /// Loads a machine definition from an already parsed JSON value.
    pub fn load_definition_from_value(
        value: serde_json::Value,
    ) -> Result<MachineDefinition, TuringMachineError> {
        let definition: MachineDefinition = serde_json::from_value(value)?;
        Self::lint(&definition);

        Ok(definition)
    }

    /// Loads all machine definition files (`.json` extension) from a given directory.
    ///
    /// Directories and non-`.json` files are skipped. Each element of the result is
    /// either the path and its definition, or the error that prevented loading it.
    pub fn load_definitions(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, MachineDefinition), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                Some(Self::load_definition(&path).map(|definition| (path, definition)))
            })
            .collect()
    }

    fn lint(definition: &MachineDefinition) {
        for lint in analyze(definition) {
            tracing::warn!(machine = %definition.name, "{lint}");
        }
    }
}
