use std::{env, path::Path, process};

use loan_tracker::{
    cli::{
        output::{self, set_preferences, OutputPreferences},
        report::{payments_table, status_lines, ReportStyle},
    },
    config::{Config, ConfigManager},
    forms::PaymentFormInput,
    init_with,
    loans::{categorize_loan_payments, read_loans, Loan},
    sorting::{sort_categorized, toggle_sort, SortState},
    LoanError,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let (flags, args): (Vec<String>, Vec<String>) =
        env::args().skip(1).partition(|arg| arg == "--plain" || arg == "--quiet");

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(2);
        }
    };
    init_with(&config);

    let prefs = OutputPreferences {
        plain_mode: config.plain_output || flags.iter().any(|f| f == "--plain"),
        quiet_mode: flags.iter().any(|f| f == "--quiet"),
    };
    set_preferences(prefs);

    match run(&args, &config, prefs) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            output::error(err);
            process::exit(1);
        }
    }
}

/// Stored configuration when one exists, otherwise the environment profile.
/// Environment variables override either source.
fn load_config() -> Result<Config, LoanError> {
    let manager = ConfigManager::new()?;
    if manager.path().exists() {
        let mut config = manager.load()?;
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    } else {
        Ok(Config::from_env()?)
    }
}

/// Returns `Ok(false)` when the command ran but reported a failure.
fn run(args: &[String], config: &Config, prefs: OutputPreferences) -> CliResult<bool> {
    let Some(command) = args.first() else {
        print_usage();
        return Ok(false);
    };
    let style = ReportStyle {
        locale: config.locale_config(),
        currency: config.currency_code(),
        output: prefs,
        ..ReportStyle::default()
    };

    match command.as_str() {
        "status" => {
            let loans = load_loans(args.get(1))?;
            output::section("Loan status");
            for line in status_lines(&loans, &style) {
                println!("{line}");
            }
        }
        "payments" => {
            let loans = load_loans(args.get(1))?;
            let state = sort_state_from_args(&args[2..])?;
            let rows = sort_categorized(&categorize_loan_payments(&loans), &state)?;
            output::section("Payments");
            println!("{}", payments_table(&rows, &style).render());
            if let Some((field, direction)) = state.active() {
                output::info(format!("Sorted by {field} ({direction:?})"));
            }
        }
        "validate-payment" => {
            let Some(loan_id) = args.get(1) else {
                print_usage();
                return Ok(false);
            };
            let mut input = PaymentFormInput::new(loan_id.as_str());
            input.payment_date = args.get(2).cloned();
            input.amount = args.get(3).cloned();
            let data = input.validate().map_err(LoanError::from)?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        "config" => println!("{}", serde_json::to_string_pretty(config)?),
        "version" => print_version(),
        _ => {
            print_usage();
            return Ok(false);
        }
    }
    Ok(true)
}

fn load_loans(path: Option<&String>) -> CliResult<Vec<Loan>> {
    let Some(path) = path else {
        return Err("missing path to a loans JSON file".into());
    };
    Ok(read_loans(Path::new(path))?)
}

/// Folds each `--sort <field>` through the toggle, the same way repeated
/// header clicks would.
fn sort_state_from_args(args: &[String]) -> CliResult<SortState> {
    let mut state = SortState::unsorted();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--sort" => {
                let field = iter.next().ok_or("--sort needs a field name")?;
                state = toggle_sort(&state, field);
            }
            other => return Err(format!("unexpected argument `{other}`").into()),
        }
    }
    Ok(state)
}

fn print_version() {
    println!(
        "loan_tracker {} ({} {}, {} {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("LOAN_TRACKER_BUILD_HASH"),
        env!("LOAN_TRACKER_BUILD_DATE"),
        env!("LOAN_TRACKER_BUILD_TARGET"),
        env!("LOAN_TRACKER_BUILD_PROFILE"),
        env!("LOAN_TRACKER_BUILD_RUSTC"),
    );
}

fn print_usage() {
    eprintln!(
        "Usage: loan_tracker_cli [--plain] [--quiet] <command>\n\
         Commands:\n  \
         status <loans.json>\n  \
         payments <loans.json> [--sort <field>]...\n  \
         validate-payment <loan_id> [payment_date] [amount]\n  \
         config\n  \
         version"
    );
}
