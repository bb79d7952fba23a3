use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use athletics_points::config::{self, Config};
use athletics_points::output;
use athletics_points::source;
use athletics_points::{EventQuery, Mark, ScoringError, ScoringTable};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_EVENT: i32 = 2;
const EXIT_TABLE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a mark, e.g. `points M-1500m 3:29.50`
    Points {
        /// Event key (gender-discipline[-modifiers], e.g. W-20000m-RW-RD)
        event: String,
        /// Mark as a time (SS.ff, MM:SS.ff, HH:MM:SS.ff) or distance
        mark: String,
    },
    /// Mark in an event worth the given points
    Mark {
        event: String,
        #[arg(allow_negative_numbers = true)]
        points: i64,
    },
    /// Mark in another event worth the same points
    Equivalent {
        event: String,
        mark: String,
        /// Event to convert into
        target: String,
    },
    /// List table events, optionally filtered
    Events {
        /// M or W
        #[arg(long)]
        gender: Option<String>,
        /// Distance or event name ("5 km", "100m", "LJ")
        #[arg(long)]
        discipline: Option<String>,
        /// Match events whose discipline is contained in --discipline
        #[arg(long)]
        fuzzy: bool,
        #[arg(long)]
        road_race: Option<bool>,
        #[arg(long)]
        racewalk: Option<bool>,
        #[arg(long)]
        steeple: Option<bool>,
        #[arg(long)]
        mixed: Option<bool>,
        #[arg(long)]
        short_track: Option<bool>,
    },
    /// Extract the points table from the scoring document text and save it
    Import {
        /// Text of the scoring document, pages separated by form feeds
        document: PathBuf,
        /// Where to write the JSON table (defaults to the table path)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Keep marks as time strings instead of converting to seconds
        #[arg(long)]
        keep_time_strings: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "athletics-points")]
#[command(about = "Athletics scoring table conversions", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/athletics-points/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the JSON points table (overrides the config file)
    #[arg(short, long, global = true)]
    table: Option<PathBuf>,

    /// Print marks as tab-separated values
    #[arg(long, global = true)]
    tsv: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.clone().map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let table_path = match config::resolve_table_path(cli.table.clone(), &config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    match cli.command {
        Commands::Import {
            ref document,
            ref out,
            keep_time_strings,
        } => {
            let out = out.clone().unwrap_or(table_path);
            run_import(&cli, &config, document, &out, keep_time_strings);
        }
        Commands::Points { ref event, ref mark } => {
            let table = load_scoring_table(&cli, &config, &table_path);
            let mut mark = Mark::parse(event.as_str(), mark).unwrap_or_else(|e| fail(&e));
            table.points_for(&mut mark).unwrap_or_else(|e| fail(&e));
            print_marks(&cli, &[&mark]);
        }
        Commands::Mark { ref event, points } => {
            let table = load_scoring_table(&cli, &config, &table_path);
            let mark = table.mark_for(event, points).unwrap_or_else(|e| fail(&e));
            print_marks(&cli, &[&mark]);
        }
        Commands::Equivalent {
            ref event,
            ref mark,
            ref target,
        } => {
            let table = load_scoring_table(&cli, &config, &table_path);
            let mut mark = Mark::parse(event.as_str(), mark).unwrap_or_else(|e| fail(&e));
            let equivalent = table
                .equivalent_mark(&mut mark, target)
                .unwrap_or_else(|e| fail(&e));
            print_marks(&cli, &[&mark, &equivalent]);
        }
        Commands::Events {
            ref gender,
            ref discipline,
            fuzzy,
            road_race,
            racewalk,
            steeple,
            mixed,
            short_track,
        } => {
            let table = load_scoring_table(&cli, &config, &table_path);
            let query = EventQuery {
                gender: gender.clone(),
                discipline: discipline.clone(),
                road_race,
                racewalk,
                steeple,
                mixed,
                short_track,
                exact_match: !fuzzy,
            };
            let found = table.search(&query);
            if cli.verbose {
                eprintln!("{} of {} events match", found.len(), table.events().count());
            }
            println!("{}", output::format_event_list(&found, output::should_use_colors()));
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run_import(
    cli: &Cli,
    config: &Config,
    document: &Path,
    out: &Path,
    keep_time_strings: bool,
) {
    let start_time = Instant::now();
    let mut options = config.extract_options();
    if keep_time_strings {
        options.convert_time_strings = false;
    }

    let raw = match source::extract_from_document(document, &options, |page, total| {
        if cli.verbose {
            eprintln!("Page: {} / {}", page, total);
        }
    }) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Import failed: {:#}", e);
            std::process::exit(EXIT_TABLE);
        }
    };

    // Refuse to cache a table that would not load
    let table = ScoringTable::build_with_degree(&raw, config.degree()).unwrap_or_else(|e| fail(&e));

    if let Err(e) = source::save_table(out, &raw) {
        eprintln!("Failed to save table: {:#}", e);
        std::process::exit(EXIT_TABLE);
    }

    println!(
        "Saved {} events ({} point rows) to {}",
        table.events().count(),
        table.points().len(),
        out.display()
    );
    if cli.verbose {
        eprintln!("Import took {:?}", start_time.elapsed());
    }
}

fn load_scoring_table(cli: &Cli, config: &Config, path: &Path) -> ScoringTable {
    let start_time = Instant::now();

    let raw = match source::load_table(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Table error: {:#}", e);
            std::process::exit(EXIT_TABLE);
        }
    };

    let table = ScoringTable::build_with_degree(&raw, config.degree()).unwrap_or_else(|e| fail(&e));

    if cli.verbose {
        eprintln!(
            "Loaded {} events ({} point rows) from {} in {:?}",
            table.events().count(),
            table.points().len(),
            path.display(),
            start_time.elapsed()
        );
        eprintln!("Model degree: {}", table.degree());
    }

    table
}

fn print_marks(cli: &Cli, marks: &[&Mark]) {
    if cli.tsv {
        println!("{}", output::format_tsv(marks));
        return;
    }

    let use_colors = output::should_use_colors();
    for mark in marks {
        if cli.verbose {
            println!("{}", output::format_mark_detail(mark, use_colors));
        } else {
            println!("{}", output::format_mark(mark, use_colors));
        }
    }
}

/// Report a scoring error and exit with its code
fn fail(error: &ScoringError) -> ! {
    let (label, code) = match error {
        ScoringError::Format { .. } => ("Invalid mark", EXIT_INPUT),
        ScoringError::UnknownEvent(_) => ("Unknown event", EXIT_EVENT),
        ScoringError::InsufficientData(_) => ("Insufficient data", EXIT_EVENT),
        ScoringError::MalformedTable(_) => ("Malformed table", EXIT_TABLE),
    };
    eprintln!("{}: {}", label, error);
    if matches!(error, ScoringError::UnknownEvent(_)) {
        eprintln!("Run `athletics-points events` to list the table's event keys.");
    }
    std::process::exit(code);
}
