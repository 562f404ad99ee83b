use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, ValueEnum};
use imgop::{EvalOpts, FsImageStore, Machine, Program, RunReport, UnsupportedPolicy};

#[derive(Parser, Debug)]
#[command(name = "imgop", version, about = "RPN image arithmetic")]
struct Cli {
    /// Program tokens, e.g. `i in.png n 0.5 m o out.png`.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present = "script"
    )]
    tokens: Vec<String>,

    /// Read the program from a script file instead (`#` starts a comment).
    #[arg(long, conflicts_with = "tokens")]
    script: Option<PathBuf>,

    /// Drop unsupported operand pairs with a warning instead of failing.
    #[arg(long, default_value_t = false)]
    lenient: bool,

    /// Print a run report to stdout.
    #[arg(long, value_enum)]
    report: Option<ReportFormat>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let program = match &cli.script {
        Some(path) => Program::from_path(path)?,
        None => imgop::parse_tokens(cli.tokens.as_slice())?,
    };

    let opts = EvalOpts {
        unsupported: if cli.lenient {
            UnsupportedPolicy::Discard
        } else {
            UnsupportedPolicy::Fail
        },
    };
    let mut machine = Machine::new(FsImageStore::new(), opts);
    let report = machine.run(&program)?;

    match cli.report {
        Some(ReportFormat::Text) => print_text(&report),
        Some(ReportFormat::Json) => {
            let json = serde_json::to_string_pretty(&report.summary())
                .context("serialize run report")?;
            println!("{json}");
        }
        None => {}
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_text(report: &RunReport) {
    println!("executed {} ops", report.executed);
    for d in &report.discarded {
        println!("discarded op {}: {}", d.index, d.pair);
    }
    for (i, operand) in report.residual.iter().enumerate() {
        println!("residual {i}: {}", operand.summary());
    }
}
