//! This module implements the single-tape stepper and the `TuringMachine` run driver.
//! The stepper applies one transition to an `ExecutionState`; the driver owns a state,
//! tracks the step count and decides when a run has halted.

use crate::runner::Run;
use crate::types::{ExecutionState, Halt, MachineDefinition, Rejection, Step, Transition};

/// Applies a single transition of `definition` to `state`.
///
/// The head is normalized before reading, so a state whose head sits at `-1` or
/// `tape.len()` reads a freshly materialized blank. On a match the symbol is written,
/// the state switched and the head moved together, then the head is normalized again
/// so that `0 <= head < tape.len()` holds on return.
///
/// # Returns
///
/// * `Some(&Transition)` - the rule that was applied.
/// * `None` - no rule matches the current state and symbol (the machine is stuck).
///   The tape, head and state are left as they were apart from normalization.
pub fn step<'d>(
    definition: &'d MachineDefinition,
    state: &mut ExecutionState,
) -> Option<&'d Transition> {
    state.normalize(definition.blank);

    let symbol = state.symbol(definition.blank);
    let transition = definition.rule(&state.state, symbol)?;

    let head = state.head as usize;
    state.tape[head] = transition.write;
    state.state.clone_from(&transition.to_state);
    state.head += transition.action.offset();

    state.normalize(definition.blank);

    Some(transition)
}

/// Drives a single run of a machine definition.
///
/// The definition is borrowed, so one definition can back any number of runs;
/// the execution state is owned exclusively by this run.
pub struct TuringMachine<'d> {
    definition: &'d MachineDefinition,
    initial: ExecutionState,
    current: ExecutionState,
    step_count: usize,
    halt: Option<Halt>,
}

impl<'d> TuringMachine<'d> {
    /// Creates a run of `definition` over `input`: the input laid out on the tape,
    /// the head on its first cell and the machine in the initial state.
    ///
    /// The input is not checked against the alphabet here; callers validate it first
    /// with `MachineDefinition::check_input`.
    pub fn new(definition: &'d MachineDefinition, input: &str) -> Self {
        Self::from_state(definition, ExecutionState::new(input, &definition.initial))
    }

    /// Creates a run that starts from an arbitrary snapshot.
    pub fn from_state(definition: &'d MachineDefinition, state: ExecutionState) -> Self {
        Self {
            definition,
            initial: state.clone(),
            current: state,
            step_count: 0,
            halt: None,
        }
    }

    /// Executes a single step of the run.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(Halt::Accepted)` if the machine is in an accepting state.
    ///   This is checked before stepping, so a machine whose initial state is
    ///   accepting halts after zero steps.
    /// * `Step::Halt(Halt::Rejected(_))` if no rule matches.
    ///
    /// Once halted, every further call returns the same halt.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = &self.halt {
            return Step::Halt(halt.clone());
        }

        if self.definition.is_final(&self.current.state) {
            tracing::debug!(
                machine = %self.definition.name,
                state = %self.current.state,
                steps = self.step_count,
                "machine halted"
            );
            return self.stop(Halt::Accepted);
        }

        match step(self.definition, &mut self.current) {
            Some(transition) => {
                self.step_count += 1;
                tracing::trace!(
                    step = self.step_count,
                    read = %transition.read,
                    write = %transition.write,
                    state = %self.current.state,
                    head = self.current.head,
                    "applied transition"
                );
                Step::Continue
            }
            None => {
                let rejection = Rejection {
                    state: self.current.state.clone(),
                    symbol: self.current.symbol(self.definition.blank),
                };
                tracing::debug!(
                    machine = %self.definition.name,
                    state = %rejection.state,
                    symbol = %rejection.symbol,
                    steps = self.step_count,
                    "no transition found, machine rejected"
                );
                self.stop(Halt::Rejected(rejection))
            }
        }
    }

    fn stop(&mut self, halt: Halt) -> Step {
        self.halt = Some(halt.clone());
        Step::Halt(halt)
    }

    /// Runs the machine until it accepts or rejects.
    ///
    /// There is no step limit: a definition that never halts makes this loop forever.
    /// Use `run_while` or `run_bounded` when termination is not guaranteed.
    pub fn run(&mut self) -> Halt {
        self.run_while(|_, _| true)
    }

    /// Runs the machine, consulting `keep_going` with the current snapshot and step
    /// count before every step.
    ///
    /// Returns `Halt::Interrupted` as soon as `keep_going` answers false. An interrupted
    /// run is not halted and can be resumed by calling any run method again.
    pub fn run_while<F>(&mut self, keep_going: F) -> Halt
    where
        F: FnMut(&ExecutionState, usize) -> bool,
    {
        self.run_while_with(keep_going, |_, _| {})
    }

    /// Runs the machine for at most `max_steps` steps.
    pub fn run_bounded(&mut self, max_steps: usize) -> Halt {
        self.run_while(|_, steps| steps < max_steps)
    }

    /// Runs the machine to completion, handing every post-step snapshot to `observer`
    /// in execution order.
    pub fn run_with<F>(&mut self, mut observer: F) -> Halt
    where
        F: FnMut(&ExecutionState),
    {
        self.run_while_with(|_, _| true, |snapshot, _| observer(snapshot))
    }

    /// Combines `run_while` and `run_with`: `keep_going` is consulted before every
    /// step and `observer` receives every post-step snapshot with the new step count.
    pub fn run_while_with<P, F>(&mut self, mut keep_going: P, mut observer: F) -> Halt
    where
        P: FnMut(&ExecutionState, usize) -> bool,
        F: FnMut(&ExecutionState, usize),
    {
        tracing::debug!(
            machine = %self.definition.name,
            state = %self.current.state,
            "running machine"
        );

        loop {
            if !self.is_halted() && !keep_going(&self.current, self.step_count) {
                tracing::debug!(steps = self.step_count, "run interrupted");
                return Halt::Interrupted;
            }

            match self.step() {
                Step::Continue => observer(&self.current, self.step_count),
                Step::Halt(halt) => return halt,
            }
        }
    }

    /// Returns a lazy iterator over the snapshots produced by each step.
    ///
    /// The iterator ends when the machine halts; the outcome is then available
    /// from `halt()`.
    pub fn snapshots(&mut self) -> Run<'_, 'd> {
        Run::new(self)
    }

    /// Resets the run to its starting snapshot.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        self.step_count = 0;
        self.halt = None;
    }

    /// Returns the definition driving this run.
    pub fn definition(&self) -> &'d MachineDefinition {
        self.definition
    }

    /// Returns the current snapshot.
    pub fn execution_state(&self) -> &ExecutionState {
        &self.current
    }

    /// Returns the current state name.
    pub fn state(&self) -> &str {
        &self.current.state
    }

    /// Returns the materialized tape.
    pub fn tape(&self) -> &[char] {
        &self.current.tape
    }

    /// Returns the head position.
    pub fn head(&self) -> isize {
        self.current.head
    }

    /// Returns the symbol under the head, or the blank symbol if the cell is not materialized.
    pub fn symbol(&self) -> char {
        self.current.symbol(self.definition.blank)
    }

    /// Returns the tape content with leading and trailing blanks trimmed.
    pub fn content(&self) -> String {
        self.current.content(self.definition.blank)
    }

    /// Returns the total number of transitions applied.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the terminal outcome once the run has halted.
    pub fn halt(&self) -> Option<&Halt> {
        self.halt.as_ref()
    }

    /// Checks if the run has halted, or is in an accepting state and will halt on the next step.
    pub fn is_halted(&self) -> bool {
        self.halt.is_some() || self.definition.is_final(&self.current.state)
    }
}
