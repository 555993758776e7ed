//! This crate provides the core logic for a single-tape Turing Machine simulator.
//! It includes modules for loading machine definitions, stepping and running machines,
//! linting definitions, encoding tapes for a Universal Turing Machine, and a catalog of
//! built-in machines.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod runner;
pub mod types;

/// Re-exports the `analyze` function and `Lint` enum from the analyzer module.
pub use analyzer::{analyze, Lint};
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{decode, decode_utm_tape, encode, encode_utm_tape, UTM_PREFIX, UTM_SUFFIX};
/// Re-exports the `DefinitionLoader` struct from the loader module.
pub use loader::DefinitionLoader;
/// Re-exports the stepper and the `TuringMachine` driver from the machine module.
pub use machine::{step, TuringMachine};
/// Re-exports `MachineCatalog` and `MACHINES` from the programs module.
pub use programs::{MachineCatalog, MACHINES};
/// Re-exports the run helpers from the runner module.
pub use runner::{run, Execution, Run};
/// Re-exports the data model, outcome and error types from the types module.
pub use types::{
    validate_input, Direction, ExecutionState, Halt, MachineDefinition, Rejection, Step,
    Transition, TuringMachineError, MAX_DEFINITION_SIZE,
};
