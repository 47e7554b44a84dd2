use clap::{Parser as ClapParser, Subcommand};
use cohort_rule::cli::{self, CheckOptions, CheckResult, CliError};
use cohort_rule::{EvalConfig, Joiner, concat_search_expressions_with};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "cohort-rule")]
#[command(about = "Validate, evaluate and compose cohort rules")]
#[command(version)]
struct Cli {
    /// Log parsing and evaluation details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rule and evaluate it against a JSON record
    Check {
        /// The rule to check
        expression: String,

        /// JSON record (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,

        /// Make string `contains` match case
        #[arg(long)]
        case_sensitive_contains: bool,

        /// Let `and`, `or`, `!` and `include` accept any value by truthiness
        #[arg(long)]
        lenient_booleans: bool,
    },

    /// List the tokens of a rule, whitespace included
    Tokens {
        expression: String,
    },

    /// Join rule fragments, skipping empty ones
    Concat {
        fragments: Vec<String>,

        /// Join with `or` instead of `and`
        #[arg(long)]
        or: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Check {
            expression,
            input,
            pretty,
            syntax_only,
            case_sensitive_contains,
            lenient_booleans,
        } => {
            let config = EvalConfig::default()
                .case_insensitive_contains(!case_sensitive_contains)
                .strict_booleans(!lenient_booleans);
            run_check(expression, input, pretty, syntax_only, config)
        }
        Commands::Tokens { expression } => cli::dump_tokens(&expression).map(|lines| {
            for line in lines {
                println!("{}", line);
            }
        }),
        Commands::Concat { fragments, or } => {
            let joiner = if or { Joiner::Or } else { Joiner::And };
            println!(
                "{}",
                concat_search_expressions_with(fragments.iter().map(|f| Some(f.as_str())), joiner)
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    expression: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
    config: EvalConfig,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        expression,
        input,
        syntax_only,
        config,
    };

    let result = cli::execute_check(&options)?;
    match &result {
        CheckResult::SyntaxValid(canonical) => println!("{}", canonical),
        CheckResult::Evaluated { value, .. } => {
            let json = if pretty {
                serde_json::to_string_pretty(value)
            } else {
                serde_json::to_string(value)
            }?;
            println!("{}", json);
        }
    }
    eprintln!("{}", result.status());
    Ok(())
}
