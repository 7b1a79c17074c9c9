//! Tenor: Test Description Grammar Linter CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tenor::analyzer::LintEngine;
use tenor::config::{build_ignore_set, is_ignored, load_config, Config, CONFIG_FILENAME};
use tenor::fixer::{apply_fixes, collect_fixes, FixLevel};
use tenor::lexicon::messages;
use tenor::reporter::{ConsoleReporter, JsonReporter, SarifReporter};
use tenor::{analyze, fix_to_fixpoint, Description, FileReport};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Tenor: lints the descriptions of `it(...)` tests
#[derive(Parser, Debug)]
#[command(name = "tenor")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Test file or directory to lint (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Output in SARIF format (for GitHub Code Scanning)
    #[arg(long, conflicts_with = "json")]
    sarif: bool,

    /// Rewrite fixable descriptions in place
    #[arg(long)]
    fix: bool,

    /// Report descriptions starting with should/could/may/might
    #[arg(long)]
    no_vague_verbs: bool,

    /// Report `if` clauses that should use `when`
    #[arg(long)]
    prefer_when_to_if: bool,

    /// Prefix messages with an emoji per kind
    #[arg(long)]
    emoji: bool,

    /// Path to config file (default: search .tenorrc.json in the target dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quiet mode (one line per file)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (also enables debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Exit 1 on any issue, not only error-severity ones
    #[arg(long)]
    strict: bool,

    /// Lint files in parallel (default for more than 10 files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .tenorrc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Check a single description and print the fix
    Check {
        /// Description text, without quotes
        description: String,

        #[arg(long)]
        no_vague_verbs: bool,

        #[arg(long)]
        prefer_when_to_if: bool,

        #[arg(long)]
        emoji: bool,

        /// Path to config file (default: search from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Install the stderr log subscriber. `TENOR_LOG` takes an EnvFilter directive.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TENOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Init { dir } => run_init(dir.as_deref()),
            Commands::Check {
                description,
                no_vague_verbs,
                prefer_when_to_if,
                emoji,
                config,
                json,
            } => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                let config = load_config(&cwd, config.as_deref())?
                    .merge_with_cli(no_vague_verbs, prefer_when_to_if, emoji);
                run_check(&description, &config, json)
            }
        };
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("a path is required when no subcommand is given");
    };

    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    let config = load_config(work_dir, args.config.as_deref())?.merge_with_cli(
        args.no_vague_verbs,
        args.prefer_when_to_if,
        args.emoji,
    );

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let test_patterns = config.get_test_patterns();
    let test_files = collect_test_files(&path, ignore_set.as_ref(), &test_patterns)?;

    if test_files.is_empty() {
        eprintln!("{}: No test files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = LintEngine::from_config(&config);
    let use_parallel = args.parallel || args.jobs.is_some() || test_files.len() > 10;

    let (mut reports, mut had_errors) = lint_files(&engine, &test_files, &config, use_parallel, args.quiet);

    if args.fix {
        let (fixed_reports, fix_errors) = run_fix(&engine, reports, &config, args.quiet);
        reports = fixed_reports;
        had_errors |= fix_errors;
    }

    if reports.is_empty() {
        eprintln!("{}: All files failed to lint", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = LintEngine::aggregate_stats(&reports);

    if args.sarif {
        println!("{}", SarifReporter::new().report(&reports));
    } else if args.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 {
            println!("{}", reporter.report(&reports[0]));
        } else {
            println!("{}", reporter.report_with_summary(&reports, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for report in &reports {
            reporter.report_quiet(report);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }
    }

    if had_errors {
        return Ok(ExitCode::from(2));
    }
    let failing = if args.strict {
        stats.total_issues
    } else {
        stats.errors
    };
    if failing > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn lint_files(
    engine: &LintEngine,
    files: &[PathBuf],
    config: &Config,
    parallel: bool,
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    let results = if parallel {
        engine.lint_parallel(files, Some(config))
    } else {
        let paths: Vec<&Path> = files.iter().map(PathBuf::as_path).collect();
        engine.lint_many(&paths, Some(config))
    };

    let mut had_errors = false;
    let mut reports = Vec::with_capacity(results.len());
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                had_errors = true;
                if !quiet {
                    eprintln!("{}: Failed to lint {}: {:#}", "Error".red(), file.display(), e);
                }
            }
        }
    }
    (reports, had_errors)
}

/// Write fixed-point replacements, then re-lint the touched files so the report shows what is left
fn run_fix(
    engine: &LintEngine,
    reports: Vec<FileReport>,
    config: &Config,
    quiet: bool,
) -> (Vec<FileReport>, bool) {
    let mut had_errors = false;
    let mut total = 0;
    let mut out = Vec::with_capacity(reports.len());

    for report in reports {
        let fixes = collect_fixes(&report);
        if fixes.is_empty() {
            out.push(report);
            continue;
        }

        let written = match apply_fixes(&report.file_path, &fixes, FixLevel::FixedPoint) {
            Ok(n) => n,
            Err(e) => {
                had_errors = true;
                eprintln!(
                    "{}: Failed to write fixes to {}: {}",
                    "Error".red(),
                    report.file_path.display(),
                    e
                );
                out.push(report);
                continue;
            }
        };
        total += written;
        tracing::debug!(file = %report.file_path.display(), fixes = written, "applied fixes");

        match engine.lint(&report.file_path, Some(config)) {
            Ok(relinted) => out.push(relinted),
            Err(e) => {
                had_errors = true;
                eprintln!("{}: Failed to re-lint {}: {:#}", "Error".red(), report.file_path.display(), e);
            }
        }
    }

    if !quiet {
        eprintln!("{}: Fixed {} description(s)", "Info".blue(), total);
    }
    (out, had_errors)
}

fn run_check(text: &str, config: &Config, json: bool) -> Result<ExitCode> {
    let engine = LintEngine::from_config(config);
    let description = Description::new(text, '"', 0);
    let analysis = analyze(&description, engine.options(), engine.lexicon());
    let outcome = fix_to_fixpoint(&description, engine.options(), engine.lexicon());

    if json {
        let value = serde_json::json!({
            "description": text,
            "valid": analysis.is_valid(),
            "kind": analysis.kind().map(|k| k.to_string()),
            "message": analysis.kind().map(|k| messages::display_message(k, config.emoji())),
            "fix": analysis.violation().and_then(|v| v.fix.as_ref()).map(|f| f.text.clone()),
            "fixed": outcome.description.text,
            "passes": outcome.passes(),
            "converged": outcome.converged,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match analysis.violation() {
            None => println!("{} \"{}\"", "✓".green(), text),
            Some(violation) => {
                println!(
                    "{} {} [{}]",
                    "✗".red(),
                    messages::display_message(violation.kind, config.emoji()),
                    violation.kind.to_string().dimmed()
                );
                if let Some(ref fix) = violation.fix {
                    println!("   {} \"{}\"", "→".dimmed(), fix.text);
                }
                if outcome.passes() > 1 || outcome.remaining.is_some() {
                    let status = match outcome.remaining {
                        None => "valid".green(),
                        Some(kind) => kind.to_string().yellow(),
                    };
                    println!(
                        "   {} \"{}\" ({} fixes, {})",
                        "⇒".dimmed(),
                        outcome.description.text,
                        outcome.passes(),
                        status
                    );
                }
            }
        }
    }

    Ok(if analysis.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn run_init(dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = r#"{
  "noVagueVerbs": true,
  "preferWhenToIf": false,
  "emoji": false,
  "rules": {
    "too-long": "warning",
    "required-description": "error"
  },
  "ignore": [
    "**/node_modules/**",
    "**/dist/**"
  ],
  "testFunctions": ["it"],
  "lexicon": {
    "regularVerbs": [],
    "irregularVerbs": {},
    "vagueVerbs": []
  }
}
"#;

    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {}",
        "Done".green().bold(),
        config_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn collect_test_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    test_patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|file| is_test_file(file, test_patterns))
        .filter(|file| ignore_set.map_or(true, |set| !is_ignored(file, set)))
        .collect();

    // Sort for consistent output
    files.sort();
    Ok(files)
}

fn is_test_file(path: &Path, test_patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    if path.components().any(|c| c.as_os_str() == "node_modules") {
        return false;
    }

    test_patterns.iter().any(|p| name.ends_with(p))
}
