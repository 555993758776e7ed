//! This module inspects machine definitions for suspicious but legal constructs.
//! Findings are reported as `Lint`s; none of them prevents a definition from running.

use crate::types::MachineDefinition;
use std::collections::HashSet;
use std::fmt;

/// A non-fatal finding about a machine definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Lint {
    /// A rule that can never fire because an earlier rule of the same state reads
    /// the same symbol.
    DuplicateRule { state: String, symbol: char },
    /// A state referenced by the definition but missing from `states`.
    UndeclaredState(String),
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lint::DuplicateRule { state, symbol } => write!(
                f,
                "State '{}' has more than one rule reading {:?}; only the first is used",
                state, symbol
            ),
            Lint::UndeclaredState(state) => {
                write!(f, "State '{}' is referenced but not declared in states", state)
            }
        }
    }
}

/// Analyzes a `MachineDefinition` and returns every lint found.
///
/// Lints are ordered by kind, then by state name, so the result is stable.
pub fn analyze(definition: &MachineDefinition) -> Vec<Lint> {
    let mut lints = check_duplicate_rules(definition);
    lints.extend(check_undeclared_states(definition));
    lints
}

/// Reports every rule shadowed by an earlier rule reading the same symbol.
fn check_duplicate_rules(definition: &MachineDefinition) -> Vec<Lint> {
    let mut states: Vec<_> = definition.transitions.keys().collect();
    states.sort();

    states
        .into_iter()
        .flat_map(|state| {
            let mut seen = HashSet::new();
            definition.transitions[state]
                .iter()
                .filter(move |t| !seen.insert(t.read))
                .map(move |t| Lint::DuplicateRule {
                    state: state.clone(),
                    symbol: t.read,
                })
        })
        .collect()
}

/// Reports states used by the definition that `states` does not list.
///
/// `states` is informational, so an empty list disables this check.
fn check_undeclared_states(definition: &MachineDefinition) -> Vec<Lint> {
    if definition.states.is_empty() {
        return Vec::new();
    }

    let declared: HashSet<&str> = definition.states.iter().map(String::as_str).collect();

    let mut referenced: Vec<&str> = std::iter::once(definition.initial.as_str())
        .chain(definition.finals.iter().map(String::as_str))
        .chain(definition.transitions.keys().map(String::as_str))
        .chain(
            definition
                .transitions
                .values()
                .flatten()
                .map(|t| t.to_state.as_str()),
        )
        .filter(|state| !declared.contains(state))
        .collect();

    referenced.sort();
    referenced.dedup();

    referenced
        .into_iter()
        .map(|state| Lint::UndeclaredState(state.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Transition};
    use std::collections::HashMap;

    fn rule(read: char, to_state: &str) -> Transition {
        Transition {
            read,
            write: read,
            to_state: to_state.to_string(),
            action: Direction::Right,
        }
    }

    fn create_definition(rules: Vec<Transition>, states: &[&str]) -> MachineDefinition {
        let mut transitions = HashMap::new();
        transitions.insert("start".to_string(), rules);

        MachineDefinition {
            name: "Lint Test".to_string(),
            alphabet: vec!['a', 'b'],
            blank: '_',
            states: states.iter().map(|s| s.to_string()).collect(),
            initial: "start".to_string(),
            finals: vec!["halt".to_string()],
            transitions,
        }
    }

    #[test]
    fn test_clean_definition() {
        let definition =
            create_definition(vec![rule('a', "start"), rule('b', "halt")], &["start", "halt"]);

        assert!(analyze(&definition).is_empty());
    }

    #[test]
    fn test_duplicate_rule() {
        let definition = create_definition(
            vec![rule('a', "start"), rule('b', "halt"), rule('a', "halt")],
            &["start", "halt"],
        );

        assert_eq!(
            analyze(&definition),
            vec![Lint::DuplicateRule {
                state: "start".to_string(),
                symbol: 'a',
            }]
        );
    }

    #[test]
    fn test_undeclared_states() {
        let definition =
            create_definition(vec![rule('a', "elsewhere"), rule('b', "halt")], &["start"]);

        assert_eq!(
            analyze(&definition),
            vec![
                Lint::UndeclaredState("elsewhere".to_string()),
                Lint::UndeclaredState("halt".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_states_skips_declaration_check() {
        let definition = create_definition(vec![rule('a', "elsewhere")], &[]);

        assert!(analyze(&definition).is_empty());
    }

    #[test]
    fn test_lint_display() {
        let lint = Lint::DuplicateRule {
            state: "q0".to_string(),
            symbol: '1',
        };

        let msg = lint.to_string();
        assert!(msg.contains("q0"));
        assert!(msg.contains("only the first is used"));
    }
}
