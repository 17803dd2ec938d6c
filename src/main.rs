use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{debug, LevelFilter};

use linediff::{compare_files, CompareOptions, DiffError, LinePolicy, Outcome, OutputStyle};

// ── CLI types ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "linediff", about = "Compare two files line by line")]
struct Cli {
    /// First file (`-` for standard input)
    file0: PathBuf,

    /// Second file (`-` for standard input)
    file1: PathBuf,

    /// Try hard to find a smaller set of changes
    #[arg(short = 'd', long)]
    minimal: bool,

    /// Do not discard lines unique to one file or very common in both
    #[arg(long)]
    no_discards: bool,

    /// Keep N lines of common prefix and suffix around hunks
    #[arg(long, value_name = "N", default_value_t = 0)]
    horizon_lines: usize,

    /// Output an ed script
    #[arg(short = 'e', long, conflicts_with = "brief")]
    ed: bool,

    /// Report only whether the files differ
    #[arg(short = 'q', long)]
    brief: bool,

    /// Treat all files as text
    #[arg(short = 'a', long)]
    text: bool,

    /// Ignore changes whose lines are all blank
    #[arg(short = 'B', long)]
    ignore_blank_lines: bool,

    /// Ignore changes whose lines all match RE (repeatable)
    #[arg(short = 'I', long = "ignore-matching-lines", value_name = "RE")]
    ignore_matching_lines: Vec<String>,

    /// Ignore case differences
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Ignore changes in the amount of white space
    #[arg(short = 'b', long)]
    ignore_space_change: bool,

    /// Ignore all white space
    #[arg(short = 'w', long)]
    ignore_all_space: bool,

    /// Print diagnostic messages to stderr
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> CompareOptions {
        let style = if self.ed {
            OutputStyle::Ed
        } else if self.brief {
            OutputStyle::Brief
        } else {
            OutputStyle::Normal
        };
        CompareOptions {
            minimal: self.minimal,
            no_discards: self.no_discards,
            horizon_lines: self.horizon_lines,
            style,
            text: self.text,
            ignore_blank_lines: self.ignore_blank_lines,
            ignore_regex: self.ignore_matching_lines.clone(),
            line_policy: LinePolicy {
                ignore_case: self.ignore_case,
                ignore_space_change: self.ignore_space_change,
                ignore_all_space: self.ignore_all_space,
            },
            ..CompareOptions::default()
        }
    }
}

/// `--verbose` raises the default level to debug; `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, out: &mut BufWriter<io::StdoutLock<'_>>) -> Result<Outcome, DiffError> {
    let opts = cli.options();
    debug!("options: {:?}", opts);
    let outcome = compare_files(&cli.file0, &cli.file1, &opts, out)?;
    out.flush().map_err(|e| DiffError::io("standard output", e))?;
    Ok(outcome)
}

// ── main ─────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let status = match run(&cli, &mut out) {
        Ok(outcome) => {
            debug!("outcome: {:?}", outcome);
            outcome.exit_code()
        }
        Err(e) => {
            let _ = out.flush();
            eprintln!("linediff: {}", e);
            2
        }
    };
    drop(out);
    process::exit(status);
}
