//! split-settle CLI
//!
//! Work out who owes whom from a JSON file of shared expenses.
//!
//! # Usage
//!
//! ```bash
//! # Settle a group's expenses
//! split-settle settle --input expenses.json
//!
//! # Output as JSON, keeping per-pair debts instead of netting
//! split-settle settle --input expenses.json --format json --strategy pairwise
//!
//! # Per-person paid / share / net table
//! split-settle summary --input expenses.json
//!
//! # Generate a random group for testing
//! split-settle generate --people 6 --expenses 20
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: set to `debug` or `warn` to control logging verbosity

use split_settle::core::expense::ExpenseSet;
use split_settle::settlement::engine::{SettlementEngine, Strategy};
use split_settle::settlement::summary::GroupSummary;
use split_settle::simulation::random_group::{generate_random_group, GroupConfig};
use split_settle::SettleError;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-settle: who owes whom, in the fewest transfers

USAGE:
    split-settle <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute settlements for a set of expenses
    summary     Show what each person paid, consumed, and nets
    generate    Generate a random expense group (for testing)
    help        Show this message

OPTIONS (settle, summary):
    --input <FILE>        Path to JSON expenses file
    --format <FORMAT>     Output format: text (default) or json  [settle only]
    --strategy <NAME>     net (default) or pairwise              [settle only]

OPTIONS (generate):
    --people <N>          Number of people (default: 6)
    --expenses <N>        Number of expenses (default: 20)
    --output <FILE>       Write to file instead of stdout

INPUT:
    A JSON array of {{"payer", "amount", "involved"}} objects, or an object
    with an "expenses" array of the same.

EXAMPLES:
    split-settle settle --input trip.json
    split-settle settle --input trip.json --format json --strategy pairwise
    split-settle summary --input trip.json
    split-settle generate --people 4 --expenses 10 --output trip.json"#
    );
}

/// Accepted shapes of the input file.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ExpensesFile {
    Bare(ExpenseSet),
    Wrapped { expenses: ExpenseSet },
}

impl ExpensesFile {
    fn into_set(self) -> ExpenseSet {
        match self {
            ExpensesFile::Bare(set) | ExpensesFile::Wrapped { expenses: set } => set,
        }
    }
}

/// JSON output schema for `settle`.
#[derive(serde::Serialize)]
struct SettleOutput {
    strategy: String,
    settlements: Vec<SettlementOutput>,
    lines: Vec<String>,
}

#[derive(serde::Serialize)]
struct SettlementOutput {
    debtor: String,
    creditor: String,
    amount: String,
}

#[derive(serde::Serialize)]
struct ErrorOutput {
    error: String,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Client mistakes exit with 1, engine faults with 2.
fn exit_on_settle_error(err: SettleError, json: bool) -> ! {
    if json {
        let output = ErrorOutput {
            error: err.to_string(),
        };
        if let Ok(text) = serde_json::to_string_pretty(&output) {
            println!("{}", text);
        }
    }
    eprintln!("Error: {}", err);
    process::exit(if err.is_client_error() { 1 } else { 2 });
}

fn load_expenses(path: &str) -> ExpenseSet {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));

    let file: ExpensesFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"[
  {{ "payer": "Alice", "amount": 60, "involved": ["Alice", "Bob", "Carol"] }}
]"#
        );
        process::exit(1);
    });
    file.into_set()
}

/// Options shared by the commands that read an input file.
struct InputOptions {
    input: String,
    format: String,
    strategy: Strategy,
}

fn parse_input_options(args: &[String]) -> InputOptions {
    let mut input = None;
    let mut format = "text".to_string();
    let mut strategy = Strategy::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--input requires a file path")),
                );
            }
            "--format" => {
                i += 1;
                format = args
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| fail("--format requires 'text' or 'json'"));
                if format != "text" && format != "json" {
                    fail(format!("unknown format '{}'", format));
                }
            }
            "--strategy" => {
                i += 1;
                strategy = args
                    .get(i)
                    .unwrap_or_else(|| fail("--strategy requires 'net' or 'pairwise'"))
                    .parse()
                    .unwrap_or_else(|e| fail(e));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    InputOptions {
        input: input.unwrap_or_else(|| fail("--input <FILE> is required")),
        format,
        strategy,
    }
}

fn cmd_settle(args: &[String]) {
    let options = parse_input_options(args);
    let json = options.format == "json";
    let set = load_expenses(&options.input);

    let report = SettlementEngine::run(options.strategy, &set)
        .unwrap_or_else(|e| exit_on_settle_error(e, json));

    if json {
        let output = SettleOutput {
            strategy: report.strategy().to_string(),
            settlements: report
                .transfers()
                .iter()
                .map(|s| SettlementOutput {
                    debtor: s.debtor.to_string(),
                    creditor: s.creditor.to_string(),
                    amount: split_settle::core::money::format_amount(s.amount),
                })
                .collect(),
            lines: report.lines(),
        };
        let text = serde_json::to_string_pretty(&output)
            .unwrap_or_else(|e| fail(format!("serializing output: {}", e)));
        println!("{}", text);
    } else {
        print!("{}", report);
    }
}

fn cmd_summary(args: &[String]) {
    let options = parse_input_options(args);
    let set = load_expenses(&options.input);

    let summary =
        GroupSummary::from_expenses(&set).unwrap_or_else(|e| exit_on_settle_error(e, false));
    print!("{}", summary);
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--people" => {
                i += 1;
                config.people = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--people requires a number"));
            }
            "--expenses" => {
                i += 1;
                config.expenses = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--expenses requires a number"));
            }
            "--output" => {
                i += 1;
                output_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let set = generate_random_group(&config);
    let json = serde_json::to_string_pretty(&set)
        .unwrap_or_else(|e| fail(format!("serializing expenses: {}", e)));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} expenses across {} people → {}",
            set.len(),
            config.people,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "summary" => cmd_summary(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
