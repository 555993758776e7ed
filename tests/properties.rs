//! Property-based tests for the stepper, the runner and input validation.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated tapes and inputs.

use proptest::prelude::*;
use std::collections::HashMap;
use tmsim::{
    run, step, validate_input, Direction, ExecutionState, MachineCatalog, MachineDefinition,
    Transition,
};

const BLANK: char = '_';

/// A machine that, in state `q`, writes `write` and moves `action` whatever it reads.
fn uniform_machine(write: char, action: Direction) -> MachineDefinition {
    let rules = ['a', 'b', BLANK]
        .into_iter()
        .map(|read| Transition {
            read,
            write,
            to_state: "r".to_string(),
            action,
        })
        .collect();

    let mut transitions = HashMap::new();
    transitions.insert("q".to_string(), rules);

    MachineDefinition {
        name: "Uniform".to_string(),
        alphabet: vec!['a', 'b'],
        blank: BLANK,
        states: vec!["q".to_string(), "r".to_string()],
        initial: "q".to_string(),
        finals: vec!["r".to_string()],
        transitions,
    }
}

prop_compose! {
    fn arbitrary_direction()(right in any::<bool>()) -> Direction {
        if right { Direction::Right } else { Direction::Left }
    }
}

proptest! {
    #[test]
    fn inputs_over_the_alphabet_are_valid(input in "[1+=]{1,20}") {
        prop_assert!(validate_input(&input, &['1', '+', '=']));
    }

    #[test]
    fn inputs_with_a_foreign_symbol_are_invalid(
        prefix in "[ab]{0,10}",
        foreign in "[c-z0-9]",
        suffix in "[ab]{0,10}",
    ) {
        let input = format!("{prefix}{foreign}{suffix}");
        prop_assert!(!validate_input(&input, &['a', 'b']));
    }

    #[test]
    fn empty_alphabet_rejects_everything(input in ".{0,10}") {
        prop_assert!(!validate_input(&input, &[]));
    }

    #[test]
    fn runs_are_deterministic(input in "[ab]{1,12}") {
        let definition = MachineCatalog::get_by_name("is_palindrome").unwrap();
        prop_assert_eq!(run(&definition, &input), run(&definition, &input));
    }

    #[test]
    fn palindrome_checker_agrees_with_reversal(input in "[ab]{1,12}") {
        let definition = MachineCatalog::get_by_name("is_palindrome").unwrap();
        let reversed: String = input.chars().rev().collect();

        prop_assert_eq!(run(&definition, &input).halt.is_accepted(), input == reversed);
    }

    #[test]
    fn step_changes_one_cell_and_moves_once(
        tape in "[ab_]{1,8}",
        head_seed in any::<usize>(),
        write in "[ab_]",
        action in arbitrary_direction(),
    ) {
        let write = write.chars().next().unwrap();
        let definition = uniform_machine(write, action);
        let head = head_seed % tape.len();

        let mut state = ExecutionState {
            tape: tape.chars().collect(),
            head: head as isize,
            state: "q".to_string(),
        };
        let before = state.clone();

        prop_assert!(step(&definition, &mut state).is_some());

        let grew_front = action == Direction::Left && head == 0;
        let grew_back = action == Direction::Right && head == before.tape.len() - 1;
        let offset = usize::from(grew_front);

        // Exactly one blank is materialized at a boundary, none elsewhere
        prop_assert_eq!(
            state.tape.len(),
            before.tape.len() + usize::from(grew_front || grew_back)
        );
        if grew_front {
            prop_assert_eq!(state.tape[0], BLANK);
        }
        if grew_back {
            prop_assert_eq!(*state.tape.last().unwrap(), BLANK);
        }

        // Only the cell under the head changed, and it holds the written symbol
        for (i, &symbol) in before.tape.iter().enumerate() {
            if i == head {
                prop_assert_eq!(state.tape[i + offset], write);
            } else {
                prop_assert_eq!(state.tape[i + offset], symbol);
            }
        }

        // The head moved by exactly one cell and stays on the tape
        prop_assert_eq!(state.head - offset as isize - head as isize, action.offset());
        prop_assert!(state.head >= 0 && (state.head as usize) < state.tape.len());
        prop_assert_eq!(state.state, "r");
    }

    #[test]
    fn accepting_initial_state_takes_no_steps(input in "[ab]{1,12}") {
        let mut definition = uniform_machine('a', Direction::Right);
        definition.initial = "r".to_string();

        let execution = run(&definition, &input);

        prop_assert!(execution.halt.is_accepted());
        prop_assert_eq!(execution.steps(), 0);
        prop_assert_eq!(execution.tape(), input);
    }
}
