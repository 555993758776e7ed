use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use tmsim::{
    encode_utm_tape, DefinitionLoader, ExecutionState, Halt, MachineCatalog, MachineDefinition,
    TuringMachine,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Runs a single-tape Turing machine over an input string.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tmsim-cli --machine unary_add --input 11+1=
  tmsim-cli --machine machines/is_palindrome.json --input abba --debug
  cat utm.json | tmsim-cli --utm --input 11+1= --max-steps 100000")]
struct Cli {
    /// A machine definition file (.json) or the name of a built-in machine.
    /// If omitted, the definition is read from stdin.
    #[clap(short, long)]
    machine: Option<String>,

    /// The input to the machine
    #[clap(short, long, required_unless_present = "list")]
    input: Option<String>,

    /// Encode the input for the universal machine before running
    #[clap(long)]
    utm: bool,

    /// Stop the run after this many steps
    #[clap(long)]
    max_steps: Option<usize>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print snapshots and the result as JSON lines
    #[clap(long)]
    json: bool,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match execute(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries machine output only
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn execute(cli: &Cli) -> Result<ExitCode> {
    if cli.list {
        for (key, name) in MachineCatalog::list_names() {
            println!("{key}\t{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let definition = load_definition(cli.machine.as_deref())?;
    let input = cli.input.as_deref().unwrap_or_default();
    let tape = if cli.utm {
        encode_utm_tape(input)
    } else {
        input.to_string()
    };

    definition
        .check_input(&tape)
        .with_context(|| format!("Input rejected by machine '{}'", definition.name))?;

    let mut machine = TuringMachine::new(&definition, &tape);

    if cli.debug {
        print_state(machine.execution_state(), 0, cli.json)?;
    }

    let mut print_error = None;
    let halt = machine.run_while_with(
        |_, steps| cli.max_steps.map_or(true, |max_steps| steps < max_steps),
        |snapshot, steps| {
            if cli.debug && print_error.is_none() {
                print_error = print_state(snapshot, steps, cli.json).err();
            }
        },
    );

    if let Some(e) = print_error {
        return Err(e);
    }

    report(&machine, &halt, cli.json)?;

    Ok(match halt {
        Halt::Accepted => ExitCode::SUCCESS,
        Halt::Rejected(_) | Halt::Interrupted => ExitCode::FAILURE,
    })
}

/// Loads the definition from a file path, a built-in machine name, or stdin.
fn load_definition(machine: Option<&str>) -> Result<MachineDefinition> {
    match machine {
        Some(path) if Path::new(path).is_file() => {
            DefinitionLoader::load_definition(Path::new(path))
                .with_context(|| format!("Failed to load machine from {path}"))
        }
        Some(name) => MachineCatalog::get_by_name(name).with_context(|| {
            format!("'{name}' is neither a definition file nor a built-in machine")
        }),
        None if atty::isnt(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            DefinitionLoader::load_definition_from_str(&buffer)
                .context("Failed to load machine from stdin")
        }
        None => bail!("No machine given: pass --machine or pipe a definition on stdin"),
    }
}

fn print_state(snapshot: &ExecutionState, steps: usize, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        println!(
            "Step: {}, State: {}, Head: {}, Tape: {}",
            steps,
            snapshot.state,
            snapshot.head,
            snapshot.tape_string()
        );
    }

    Ok(())
}

fn report(machine: &TuringMachine, halt: &Halt, json: bool) -> Result<()> {
    if json {
        let mut result = match halt {
            Halt::Accepted => serde_json::json!({ "outcome": "halted" }),
            Halt::Rejected(rejection) => {
                serde_json::json!({ "outcome": "rejected", "rejection": rejection })
            }
            Halt::Interrupted => serde_json::json!({ "outcome": "interrupted" }),
        };

        result["steps"] = machine.step_count().into();
        result["tape"] = machine.execution_state().tape_string().into();
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    match halt {
        Halt::Accepted => println!("{}", machine.content()),
        Halt::Rejected(rejection) => eprintln!(
            "Machine rejected: no rule for state '{}' reading {:?} (after {} steps)",
            rejection.state,
            rejection.symbol,
            machine.step_count()
        ),
        Halt::Interrupted => eprintln!(
            "Machine interrupted after {} steps in state '{}'",
            machine.step_count(),
            machine.state()
        ),
    }

    Ok(())
}
