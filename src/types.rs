//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including machine definitions, execution snapshots, run outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The blank symbol conventionally used by the built-in machines and the UTM encoding.
pub const DEFAULT_BLANK_SYMBOL: char = '_';
/// The maximum allowed size for a machine definition source in bytes.
pub const MAX_DEFINITION_SIZE: usize = 65536; // 64KB

/// Immutable description of a single-tape deterministic Turing Machine.
///
/// Field names follow the declarative definition format exactly, so a definition
/// deserializes from (and serializes back to) the same record shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineDefinition {
    /// Descriptive name of the machine.
    pub name: String,
    /// Symbols an input string may contain. Order and duplicates are kept as given.
    pub alphabet: Vec<char>,
    /// Symbol materialized in any cell the tape grows into.
    pub blank: char,
    /// All state names. Informational only; execution does not consult it.
    pub states: Vec<String>,
    /// The state a computation starts in.
    pub initial: String,
    /// Accepting states. Entering one of them halts the run.
    pub finals: Vec<String>,
    /// Rules per state, in declaration order. The first rule whose `read`
    /// matches the symbol under the head wins.
    pub transitions: HashMap<String, Vec<Transition>>,
}

impl MachineDefinition {
    /// Returns true if `state` is one of the accepting states.
    pub fn is_final(&self, state: &str) -> bool {
        self.finals.iter().any(|f| f == state)
    }

    /// Finds the first rule of `state` that reads `symbol`.
    pub fn rule(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.transitions
            .get(state)
            .and_then(|rules| rules.iter().find(|t| t.read == symbol))
    }

    /// Checks that `input` is a legal seed for this machine.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if every symbol of `input` belongs to the alphabet.
    /// * `Err(TuringMachineError::InvalidInput)` naming the first offending symbol,
    ///   or with no symbol if the input or the alphabet is empty.
    pub fn check_input(&self, input: &str) -> Result<(), TuringMachineError> {
        if validate_input(input, &self.alphabet) {
            return Ok(());
        }

        let symbol = input.chars().find(|c| !self.alphabet.contains(c));
        Err(TuringMachineError::InvalidInput {
            input: input.to_string(),
            symbol,
        })
    }

    /// Total number of rules across all states.
    pub fn rule_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }
}

/// Returns true iff `input` is non-empty, `alphabet` is non-empty, and every
/// character of `input` is a member of `alphabet`.
///
/// An empty input or an empty alphabet is never valid.
pub fn validate_input(input: &str, alphabet: &[char]) -> bool {
    !alphabet.is_empty() && !input.is_empty() && input.chars().all(|c| alphabet.contains(&c))
}

/// A single transition rule: in the owning state, reading `read` writes `write`,
/// switches to `to_state` and moves the head according to `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub read: char,
    pub write: char,
    pub to_state: String,
    pub action: Direction,
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Head offset applied by this direction.
    pub fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Snapshot of an in-progress computation.
///
/// The tape is conceptually infinite in both directions; only visited cells are stored.
/// `head` is signed because it may transiently sit at `-1` or `tape.len()` on a state
/// built by hand; the stepper materializes a blank cell before reading in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub tape: Vec<char>,
    pub head: isize,
    pub state: String,
}

impl ExecutionState {
    /// Builds the initial snapshot of a run: the input laid out on the tape,
    /// head on the first cell, machine in `initial`.
    pub fn new(input: &str, initial: &str) -> Self {
        Self {
            tape: input.chars().collect(),
            head: 0,
            state: initial.to_string(),
        }
    }

    /// Materializes blank cells until the head is inside the tape.
    ///
    /// A head at `-1` inserts one blank at the front, shifting every cell right,
    /// and the head is set to 0. A head at `tape.len()` appends one blank.
    pub fn normalize(&mut self, blank: char) {
        if self.head < 0 {
            let missing = self.head.unsigned_abs();
            self.tape.splice(0..0, std::iter::repeat(blank).take(missing));
            self.head = 0;
        } else if self.head as usize >= self.tape.len() {
            self.tape.resize(self.head as usize + 1, blank);
        }
    }

    /// Returns the symbol under the head, or `blank` if that cell is not materialized.
    pub fn symbol(&self, blank: char) -> char {
        usize::try_from(self.head)
            .ok()
            .and_then(|i| self.tape.get(i).copied())
            .unwrap_or(blank)
    }

    /// The full materialized tape as a string.
    pub fn tape_string(&self) -> String {
        self.tape.iter().collect()
    }

    /// The tape with leading and trailing blanks trimmed.
    pub fn content(&self, blank: char) -> String {
        self.tape_string().trim_matches(blank).to_string()
    }
}

/// Represents the outcome of a single step of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition was applied and the run continues.
    Continue,
    /// The run has reached a terminal condition.
    Halt(Halt),
}

/// Terminal condition of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// The machine entered an accepting state.
    Accepted,
    /// No rule matched the current state and symbol.
    Rejected(Rejection),
    /// A caller-supplied bound stopped the run before it terminated.
    Interrupted,
}

impl Halt {
    /// Returns true if the run ended in an accepting state.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Halt::Accepted)
    }
}

/// Details of a rejection outcome: the state and symbol no rule was found for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub state: String,
    pub symbol: char,
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Required definition fields are missing or structurally wrong.
    #[error("Malformed definition: {0}")]
    MalformedDefinition(String),
    /// The seed input contains a symbol outside the alphabet, or is empty.
    #[error("Invalid input {input:?}: {}", invalid_reason(.symbol))]
    InvalidInput { input: String, symbol: Option<char> },
    /// A definition cannot be expressed in the UTM encoding, or an encoding is malformed.
    #[error("Encoding error: {0}")]
    EncodingError(String),
    /// Indicates a lookup or consistency failure outside the definition source itself.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations, such as reading definition files.
    #[error("File error: {0}")]
    FileError(String),
}

fn invalid_reason(symbol: &Option<char>) -> String {
    match symbol {
        Some(c) => format!("symbol {c:?} is not in the alphabet"),
        None => "input and alphabet must be non-empty".to_string(),
    }
}

impl From<serde_json::Error> for TuringMachineError {
    fn from(error: serde_json::Error) -> Self {
        TuringMachineError::MalformedDefinition(error.to_string())
    }
}
