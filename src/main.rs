use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use date_clean::scanner::{self, DateInput};
use date_clean::{
    clean_date, CleanedDate, DateFlag, DateLookup, KeywordSpeller, LookupTables, ParseOptions,
    SpellCorrector,
};

#[derive(Parser)]
#[command(
    name = "date_clean",
    about = "Rule-based cleaner for historical date expressions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean one date expression and print the result as JSON
    Parse {
        /// Date text, e.g. "late 16th century", "300 BC - 100 AD"
        text: Vec<String>,
        /// Untranslated text, copied to the output
        #[arg(long, default_value = "")]
        original: String,
        /// Country code(s) of the object, e.g. "GR" or "GRC,TR"
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long, default_value = "en")]
        language: String,
        /// JSON file with synonyms, validated, manual and period tables
        #[arg(long)]
        lookups: Option<PathBuf>,
        /// Skip keyword spelling correction
        #[arg(long)]
        no_spelling: bool,
        #[arg(long)]
        pretty: bool,
    },
    /// Clean every line of the .txt/.tsv files under a path
    Batch {
        /// File or directory; lines are `date[<TAB>country]`
        path: PathBuf,
        #[arg(long, default_value = "en")]
        language: String,
        #[arg(long)]
        lookups: Option<PathBuf>,
        #[arg(long)]
        no_spelling: bool,
        /// Write the JSON array here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            text,
            original,
            country,
            language,
            lookups,
            no_spelling,
            pretty,
        } => run_parse(
            &text.join(" "),
            original,
            country,
            language,
            lookups.as_deref(),
            no_spelling,
            pretty,
        ),
        Command::Batch {
            path,
            language,
            lookups,
            no_spelling,
            output,
        } => run_batch(&path, language, lookups.as_deref(), no_spelling, output.as_deref()),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn load_tables(path: Option<&Path>) -> Option<LookupTables> {
    let path = path?;
    match LookupTables::from_path(path) {
        Ok(tables) => Some(tables),
        Err(e) => {
            eprintln!("Cannot load lookup tables: {e}");
            std::process::exit(1);
        }
    }
}

fn to_json<T: serde::Serialize>(data: &T, pretty: bool) -> String {
    let json = if pretty {
        serde_json::to_string_pretty(data)
    } else {
        serde_json::to_string(data)
    };
    json.unwrap_or_else(|e| {
        eprintln!("Cannot serialize result: {e}");
        std::process::exit(1);
    })
}

// ═══════════════════════════════════════════════════════════════════════
//  PARSE MODE: one expression → JSON on stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_parse(
    text: &str,
    original: String,
    country: String,
    language: String,
    lookups: Option<&Path>,
    no_spelling: bool,
    pretty: bool,
) {
    let tables = load_tables(lookups);
    let speller = KeywordSpeller::default();
    let options = ParseOptions {
        language,
        country_code: country,
        original_text: original,
        lookup: tables.as_ref().map(|t| t as &dyn DateLookup),
        speller: (!no_spelling).then_some(&speller as &dyn SpellCorrector),
    };
    let result = clean_date(text, &options);
    println!("{}", to_json(&result, pretty));
}

// ═══════════════════════════════════════════════════════════════════════
//  BATCH MODE: every input line → one JSON array
// ═══════════════════════════════════════════════════════════════════════

#[derive(serde::Serialize)]
struct BatchRecord {
    source: String,
    line: usize,
    country_code: String,
    #[serde(flatten)]
    result: CleanedDate,
}

fn run_batch(
    path: &Path,
    language: String,
    lookups: Option<&Path>,
    no_spelling: bool,
    output: Option<&Path>,
) {
    eprintln!("Scanning inputs at: {}", path.display());
    let inputs: Vec<DateInput> = scanner::collect_inputs(path).unwrap_or_else(|e| {
        eprintln!("Cannot read inputs: {e}");
        std::process::exit(1);
    });
    eprintln!("Found {} distinct date strings", inputs.len());

    let tables = load_tables(lookups);
    let speller = KeywordSpeller::default();

    let mut by_flag: HashMap<DateFlag, usize> = HashMap::new();
    let mut records = Vec::with_capacity(inputs.len());
    for input in inputs {
        let options = ParseOptions {
            language: language.clone(),
            country_code: input.country_code.clone(),
            original_text: String::new(),
            lookup: tables.as_ref().map(|t| t as &dyn DateLookup),
            speller: (!no_spelling).then_some(&speller as &dyn SpellCorrector),
        };
        let result = clean_date(&input.text, &options);
        *by_flag.entry(result.date_flags).or_insert(0) += 1;
        records.push(BatchRecord {
            source: input.source.display().to_string(),
            line: input.line,
            country_code: input.country_code,
            result,
        });
    }

    // ── Print statistics ───────────────────────────────────────────
    eprintln!("\n══════════════════════════════════════════");
    eprintln!("  FLAG STATISTICS");
    eprintln!("══════════════════════════════════════════");
    let mut counts: Vec<_> = by_flag.into_iter().collect();
    counts.sort_by_key(|(_, c)| std::cmp::Reverse(*c));
    for (flag, count) in &counts {
        eprintln!("  {}: {count}", flag.as_code());
    }

    let json = to_json(&records, true);
    match output {
        Some(out) => {
            std::fs::write(out, &json).unwrap_or_else(|e| {
                eprintln!("Cannot write {}: {e}", out.display());
                std::process::exit(1);
            });
            eprintln!("\n  {} ({} bytes)", out.display(), json.len());
        }
        None => println!("{json}"),
    }
}
