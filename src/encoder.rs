//! This module provides encoding functionality for converting machine definitions
//! into a string format suitable for Universal Turing Machine processing, and for
//! preparing a UTM tape from a plain input string.

use crate::types::{
    Direction, MachineDefinition, Transition, TuringMachineError, DEFAULT_BLANK_SYMBOL,
};
use std::collections::{hash_map::Entry, HashMap};

/// Encoded transition table of the unary addition machine, followed by the separator
/// between the table and the sub-machine's input.
pub const UTM_PREFIX: &str = "0,1,1,R,0|0,+,1,R,1|1,1,1,R,1|1,=,_,L,2|2,1,=,L,h#";
/// Sentinel marking the end of the sub-machine's input on a UTM tape.
pub const UTM_SUFFIX: &str = "$";

/// Encoded id of the initial state.
const INITIAL_STATE_ID: &str = "0";
/// Encoded id shared by all accepting states.
const FINAL_STATE_ID: &str = "h";
/// Symbols with a structural meaning in the encoding.
const RESERVED_SYMBOLS: [char; 4] = [',', '|', '#', '$'];

/// Prepares a tape for the universal machine: the fixed sub-machine table, then
/// `input` verbatim, then the end sentinel.
///
/// `input` is not interpreted; it is substituted as is.
pub fn encode_utm_tape(input: &str) -> String {
    format!("{UTM_PREFIX}{input}{UTM_SUFFIX}")
}

/// Splits a UTM tape back into the encoded sub-machine and its input.
pub fn decode_utm_tape(tape: &str) -> Result<(MachineDefinition, String), TuringMachineError> {
    let (rules, rest) = tape.split_once('#').ok_or_else(|| {
        TuringMachineError::EncodingError("Missing '#' between rules and input".to_string())
    })?;

    let input = rest.strip_suffix(UTM_SUFFIX).ok_or_else(|| {
        TuringMachineError::EncodingError(format!("Tape does not end with '{UTM_SUFFIX}'"))
    })?;

    Ok((decode(rules)?, input.to_string()))
}

/// Encodes the transition table of a definition.
///
/// Format: pipe-separated rules, each `state,read,write,action,to_state`.
/// - States are renamed to compact ids: the initial state is `0`, every accepting
///   state is `h`, the others are numbered from `1` in name order.
/// - Rules are grouped by state in name order and keep declaration order within a state.
/// - Actions are `L` or `R`; the definition's blank symbol is written as `_`.
///
/// # Returns
///
/// * `Err(TuringMachineError::EncodingError)` if a symbol is one of `, | # $`, or is
///   `_` without being the blank.
/// * `Err(TuringMachineError::EncodingError)` if the initial state is also accepting;
///   the format has no id that is both `0` and `h`.
pub fn encode(definition: &MachineDefinition) -> Result<String, TuringMachineError> {
    if definition.is_final(&definition.initial) {
        return Err(TuringMachineError::EncodingError(format!(
            "Initial state '{}' is also accepting and has no encoded id",
            definition.initial
        )));
    }

    let state_mapping = create_state_mapping(definition);
    encode_rules(definition, &state_mapping)
}

/// Creates a mapping from state names to encoded ids.
fn create_state_mapping(definition: &MachineDefinition) -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    let mut counter = 1;

    mapping.insert(definition.initial.clone(), INITIAL_STATE_ID.to_string());

    let mut states: Vec<&String> = definition
        .transitions
        .iter()
        .flat_map(|(state, rules)| {
            std::iter::once(state).chain(rules.iter().map(|t| &t.to_state))
        })
        .collect();

    states.sort();
    states.dedup();

    for state in states {
        if let Entry::Vacant(e) = mapping.entry(state.clone()) {
            if definition.is_final(state) {
                e.insert(FINAL_STATE_ID.to_string());
            } else {
                e.insert(counter.to_string());
                counter += 1;
            }
        }
    }

    mapping
}

/// Encodes the rules section as pipe-separated transitions.
fn encode_rules(
    definition: &MachineDefinition,
    state_mapping: &HashMap<String, String>,
) -> Result<String, TuringMachineError> {
    let mut sorted_states: Vec<_> = definition.transitions.keys().collect();
    sorted_states.sort();

    let mut encoded_rules = Vec::new();

    for state in sorted_states {
        for transition in &definition.transitions[state] {
            let direction = match transition.action {
                Direction::Left => 'L',
                Direction::Right => 'R',
            };

            encoded_rules.push(format!(
                "{},{},{},{},{}",
                state_mapping[state],
                encode_symbol(transition.read, definition.blank)?,
                encode_symbol(transition.write, definition.blank)?,
                direction,
                state_mapping[&transition.to_state]
            ));
        }
    }

    Ok(encoded_rules.join("|"))
}

fn encode_symbol(symbol: char, blank: char) -> Result<char, TuringMachineError> {
    if symbol == blank {
        return Ok(DEFAULT_BLANK_SYMBOL);
    }

    if RESERVED_SYMBOLS.contains(&symbol) || symbol == DEFAULT_BLANK_SYMBOL {
        return Err(TuringMachineError::EncodingError(format!(
            "Symbol {:?} cannot be encoded",
            symbol
        )));
    }

    Ok(symbol)
}

/// Decodes an encoded rules section back into a machine definition.
///
/// The decoded machine keeps the encoded ids as state names: it starts in `0`,
/// accepts in `h`, uses `_` as its blank, and its alphabet is every non-blank
/// symbol read by some rule.
pub fn decode(encoded: &str) -> Result<MachineDefinition, TuringMachineError> {
    let mut transitions: HashMap<String, Vec<Transition>> = HashMap::new();
    let mut states = vec![INITIAL_STATE_ID.to_string()];
    let mut alphabet = Vec::new();

    for rule_str in encoded.split('|').filter(|r| !r.is_empty()) {
        let parts: Vec<&str> = rule_str.split(',').collect();
        if parts.len() != 5 {
            return Err(TuringMachineError::EncodingError(format!(
                "Invalid rule format: {}",
                rule_str
            )));
        }

        let read = decode_symbol(parts[1])?;
        let write = decode_symbol(parts[2])?;
        let action = match parts[3] {
            "L" => Direction::Left,
            "R" => Direction::Right,
            other => {
                return Err(TuringMachineError::EncodingError(format!(
                    "Invalid direction: {}",
                    other
                )))
            }
        };

        for state in [parts[0], parts[4]] {
            if !states.iter().any(|s| s == state) {
                states.push(state.to_string());
            }
        }

        if read != DEFAULT_BLANK_SYMBOL && !alphabet.contains(&read) {
            alphabet.push(read);
        }

        transitions
            .entry(parts[0].to_string())
            .or_default()
            .push(Transition {
                read,
                write,
                to_state: parts[4].to_string(),
                action,
            });
    }

    Ok(MachineDefinition {
        name: "decoded".to_string(),
        alphabet,
        blank: DEFAULT_BLANK_SYMBOL,
        states,
        initial: INITIAL_STATE_ID.to_string(),
        finals: vec![FINAL_STATE_ID.to_string()],
        transitions,
    })
}

fn decode_symbol(part: &str) -> Result<char, TuringMachineError> {
    let mut chars = part.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(TuringMachineError::EncodingError(format!(
            "Invalid symbol: {:?}",
            part
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::run;
    use crate::types::Halt;

    fn create_test_definition() -> MachineDefinition {
        let mut transitions = HashMap::new();

        transitions.insert(
            "start".to_string(),
            vec![
                Transition {
                    read: 'a',
                    write: 'b',
                    to_state: "s2".to_string(),
                    action: Direction::Right,
                },
                Transition {
                    read: ' ',
                    write: 'a',
                    to_state: "accept".to_string(),
                    action: Direction::Left,
                },
            ],
        );
        transitions.insert(
            "s2".to_string(),
            vec![Transition {
                read: 'b',
                write: ' ',
                to_state: "accept".to_string(),
                action: Direction::Right,
            }],
        );

        MachineDefinition {
            name: "Test Machine".to_string(),
            alphabet: vec!['a', 'b'],
            blank: ' ',
            states: vec!["start".into(), "s2".into(), "accept".into()],
            initial: "start".to_string(),
            finals: vec!["accept".to_string()],
            transitions,
        }
    }

    #[test]
    fn test_encode_utm_tape() {
        let tape = encode_utm_tape("11+1=");

        assert!(tape.starts_with(UTM_PREFIX));
        assert!(tape.ends_with(UTM_SUFFIX));
        assert_eq!(&tape[UTM_PREFIX.len()..tape.len() - UTM_SUFFIX.len()], "11+1=");
        assert_eq!(tape.len(), UTM_PREFIX.len() + 5 + UTM_SUFFIX.len());
    }

    #[test]
    fn test_encode_utm_tape_does_not_interpret_input() {
        assert_eq!(encode_utm_tape(""), format!("{UTM_PREFIX}{UTM_SUFFIX}"));
        assert_eq!(
            encode_utm_tape("$#|"),
            format!("{UTM_PREFIX}$#|{UTM_SUFFIX}")
        );
    }

    #[test]
    fn test_state_mapping() {
        let definition = create_test_definition();
        let mapping = create_state_mapping(&definition);

        assert_eq!(mapping["start"], "0");
        assert_eq!(mapping["accept"], "h");
        assert_eq!(mapping["s2"], "1");
    }

    #[test]
    fn test_encode_definition() {
        let definition = create_test_definition();
        let encoded = encode(&definition).unwrap();

        assert_eq!(encoded, "1,b,_,R,h|0,a,b,R,1|0,_,a,L,h");
    }

    #[test]
    fn test_encode_rejects_reserved_symbols() {
        let mut definition = create_test_definition();
        definition.transitions.get_mut("s2").unwrap()[0].write = '|';

        assert!(matches!(
            encode(&definition),
            Err(TuringMachineError::EncodingError(_))
        ));
    }

    #[test]
    fn test_decode_prefix_runs_like_the_sub_machine() {
        let rules = UTM_PREFIX.trim_end_matches('#');
        let definition = decode(rules).unwrap();

        assert_eq!(definition.initial, "0");
        assert_eq!(definition.alphabet, vec!['1', '+', '=']);
        assert_eq!(definition.rule_count(), 5);

        let execution = run(&definition, "11+1=");
        assert_eq!(execution.halt, Halt::Accepted);
        assert_eq!(execution.content(), "111=");
    }

    #[test]
    fn test_decode_utm_tape() {
        let (definition, input) = decode_utm_tape(&encode_utm_tape("1+1=")).unwrap();

        assert_eq!(input, "1+1=");
        assert_eq!(encode(&definition).unwrap(), UTM_PREFIX.trim_end_matches('#'));
    }

    #[test]
    fn test_encode_rejects_accepting_initial_state() {
        let mut transitions = HashMap::new();
        transitions.insert(
            "s".to_string(),
            vec![Transition {
                read: 'a',
                write: 'a',
                to_state: "s".to_string(),
                action: Direction::Right,
            }],
        );

        let definition = MachineDefinition {
            name: "Accepts on entry".to_string(),
            alphabet: vec!['a'],
            blank: '_',
            states: vec!["s".into()],
            initial: "s".to_string(),
            finals: vec!["s".to_string()],
            transitions,
        };

        assert_eq!(run(&definition, "a").halt, Halt::Accepted);
        assert!(matches!(
            encode(&definition),
            Err(TuringMachineError::EncodingError(_))
        ));
    }

    #[test]
    fn test_decode_invalid_format() {
        assert!(decode("0,1,1,R").is_err());
        assert!(decode("0,1,1,S,h").is_err());
        assert!(decode("0,11,1,R,h").is_err());
        assert!(decode_utm_tape("no separator").is_err());
        assert!(decode_utm_tape("0,1,1,R,h#11").is_err());
    }
}
