use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use uel_lang::cli::{self, CheckOptions, CheckResult, CliError};
use uel_lang::conjunction;

#[derive(ClapParser)]
#[command(name = "uel")]
#[command(about = "UEL - an embeddable expression language for filtering scalar and columnar data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression against a JSON environment
    Eval {
        /// The expression to evaluate
        expression: String,

        /// JSON object of bindings (reads from stdin if piped)
        #[arg(short, long)]
        env: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate an expression without evaluating the full data
    Check {
        /// The expression to validate
        expression: String,

        /// JSON object of bindings (reads from stdin if piped)
        #[arg(short, long)]
        env: Option<String>,

        /// Use the restricted filter grammar (comparisons joined by 'and')
        #[arg(long)]
        conjunction: bool,
    },

    /// Parse a filter conjunction and print its clauses as JSON
    Clauses {
        /// The conjunction to parse
        expression: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            env,
            pretty,
        } => run_eval(expression, env, pretty),
        Commands::Check {
            expression,
            env,
            conjunction,
        } => run_check(expression, env, conjunction),
        Commands::Clauses { expression } => run_clauses(expression),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_env(env: Option<String>) -> Result<Option<String>, CliError> {
    match env {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_eval(expression: String, env: Option<String>, pretty: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        expression,
        env: read_env(env)?,
        conjunction: false,
        validate_only: false,
    };

    match cli::execute_check(&options)? {
        CheckResult::Value(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .map_err(CliError::Json)?;
            println!("{}", json);
        }
        CheckResult::Valid => {}
    }
    Ok(())
}

fn run_check(expression: String, env: Option<String>, conjunction: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        expression,
        env: read_env(env)?,
        conjunction,
        validate_only: true,
    };

    match cli::execute_check(&options)? {
        CheckResult::Valid => println!("Expression is valid"),
        CheckResult::Value(_) => {}
    }
    Ok(())
}

fn run_clauses(expression: String) -> Result<(), CliError> {
    let expr = uel_lang::parse_conjunction(&expression).map_err(CliError::Parse)?;
    let clauses = conjunction::clauses(&expr).ok_or_else(|| {
        CliError::InvalidBinding("expression is not a conjunction of comparisons".to_string())
    })?;

    let items: Vec<serde_json::Value> = clauses
        .iter()
        .map(|clause| {
            serde_json::json!({
                "identifier": clause.identifier,
                "comparator": clause.comparator.to_string(),
                "value": cli::value_to_json(&clause.value),
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(items));
    Ok(())
}
