//! Run-to-completion helpers built on `TuringMachine`: a lazy iterator over the snapshots
//! of a run, and `run`, which collects a whole run into an `Execution`.

use std::iter::FusedIterator;

use crate::machine::TuringMachine;
use crate::types::{ExecutionState, Halt, MachineDefinition, Step};

/// Lazy sequence of the snapshots produced by a run, in execution order.
///
/// Each call to `next` applies one transition. The sequence ends when the machine
/// halts; an infinite-looping definition yields forever, so bound it with
/// `Iterator::take` or similar when termination is not guaranteed.
pub struct Run<'m, 'd> {
    machine: &'m mut TuringMachine<'d>,
}

impl<'m, 'd> Run<'m, 'd> {
    pub(crate) fn new(machine: &'m mut TuringMachine<'d>) -> Self {
        Self { machine }
    }

    /// Returns the terminal outcome once the sequence is exhausted.
    pub fn halt(&self) -> Option<&Halt> {
        self.machine.halt()
    }

    /// Number of snapshots produced so far over the whole run.
    pub fn step_count(&self) -> usize {
        self.machine.step_count()
    }
}

impl Iterator for Run<'_, '_> {
    type Item = ExecutionState;

    fn next(&mut self) -> Option<Self::Item> {
        match self.machine.step() {
            Step::Continue => Some(self.machine.execution_state().clone()),
            Step::Halt(_) => None,
        }
    }
}

impl FusedIterator for Run<'_, '_> {}

/// A completed run: every post-step snapshot plus the terminal outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub halt: Halt,
    /// The seed snapshot, before any step.
    pub initial: ExecutionState,
    /// Snapshots after each applied transition, in order.
    pub snapshots: Vec<ExecutionState>,
    blank: char,
}

impl Execution {
    /// Number of transitions applied.
    pub fn steps(&self) -> usize {
        self.snapshots.len()
    }

    /// The last snapshot of the run (the seed if no step was taken).
    pub fn final_state(&self) -> &ExecutionState {
        self.snapshots.last().unwrap_or(&self.initial)
    }

    /// The full materialized tape at the end of the run.
    pub fn tape(&self) -> String {
        self.final_state().tape_string()
    }

    /// The final tape with leading and trailing blanks trimmed.
    pub fn content(&self) -> String {
        self.final_state().content(self.blank)
    }
}

/// Runs `definition` over `input` to completion and collects every snapshot.
///
/// The input is assumed to have passed `validate_input`. This does not return for a
/// definition that never halts; drive a `TuringMachine` with `run_while` instead when
/// a bound is needed.
pub fn run(definition: &MachineDefinition, input: &str) -> Execution {
    let mut machine = TuringMachine::new(definition, input);
    let initial = machine.execution_state().clone();
    let snapshots: Vec<_> = machine.snapshots().collect();
    let halt = machine.halt().cloned().unwrap_or(Halt::Interrupted);

    Execution {
        halt,
        initial,
        snapshots,
        blank: definition.blank,
    }
}
