//! Dictone CLI: rhyme-scheme analysis and annotation for lyrics.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use dictone_core::config::EngineConfig;
use dictone_core::lines::analyze_lines;
use dictone_core::lookup::{get_lookup, LookupCategory};
use dictone_core::rhyme::scorer::explain;
use dictone_core::session::LyricsSession;
use dictone_core::store::{load_session, remove_session, save_session, store_dir};
use dictone_core::types::{AccentTier, Annotation, SchemeId};
use dictone_core::{count_syllables, detect_rhyme_schemes_with, reconcile_annotations};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "dictone",
    about = "Rhyme-scheme detection and annotation for song lyrics",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect rhyme schemes in a lyrics file
    Analyze(AnalyzeArgs),
    /// Score how well two words rhyme
    Score(ScoreArgs),
    /// Estimate syllable counts
    Syllables(SyllablesArgs),
    /// Move annotations from one version of a text to another
    Reconcile(ReconcileArgs),
    /// Suggest rhymes from a vocabulary file
    Suggest(SuggestArgs),
    /// Edit the saved lyrics session
    Session(SessionArgs),
}

// ─── Shared arguments (embedded in each subcommand) ──────────────

#[derive(Parser, Debug)]
struct SharedArgs {
    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// JSON engine config (sensitivity, min_word_len, scheme_limit, max_document_chars)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SharedArgs {
    fn engine_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => EngineConfig::from_file(path),
            None => Ok(EngineConfig::default()),
        }
    }
}

// ─── Analyze ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Lyrics file, or "-" for stdin
    input: PathBuf,

    /// Minimum rhyme score for words to share a scheme (1-5)
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Number of scheme labels to use (1-24, 8 for the classic palette)
    #[arg(long)]
    scheme_limit: Option<usize>,

    /// Ignore words shorter than this
    #[arg(long)]
    min_word_len: Option<usize>,

    /// JSON file of manual annotations to keep
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Score ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct ScoreArgs {
    #[command(flatten)]
    shared: SharedArgs,

    a: String,
    b: String,

    /// Score at which the words count as rhyming
    #[arg(long, default_value_t = 2.0)]
    threshold: f64,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Syllables ───────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct SyllablesArgs {
    #[command(flatten)]
    shared: SharedArgs,

    #[arg(required = true)]
    words: Vec<String>,
}

// ─── Reconcile ───────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct ReconcileArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Text the annotations were placed on
    #[arg(long)]
    old: PathBuf,

    /// Edited text
    #[arg(long)]
    new: PathBuf,

    /// JSON file of annotations against the old text
    #[arg(long)]
    annotations: PathBuf,
}

// ─── Suggest ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct SuggestArgs {
    #[command(flatten)]
    shared: SharedArgs,

    word: String,

    /// Vocabulary file; every word in it is a candidate
    #[arg(long)]
    vocab: PathBuf,

    /// Kind of suggestion
    #[arg(long, default_value = "rhymes", value_parser = ["rhymes", "near", "synonyms"])]
    category: String,

    /// Maximum number of suggestions
    #[arg(long, default_value_t = 20)]
    max: usize,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Session ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct SessionArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Store directory (default: $DICTONE_STORE_DIR or ~/.local/share/dictone)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    action: SessionAction,
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Print the lyrics and their marks
    Show {
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replace the lyrics with a file's contents ("-" for stdin)
    SetText { input: PathBuf },
    /// Mark the word at [START, END)
    Mark {
        start: usize,
        end: usize,
        /// Scheme letter A-X (default: the session's selected scheme)
        #[arg(long)]
        scheme: Option<char>,
        /// Accent: normal, medium or heavy (default: the session's tier)
        #[arg(long)]
        accent: Option<String>,
        /// Pick the accent from the word's syllable count
        #[arg(long, default_value_t = false, conflicts_with = "accent")]
        by_length: bool,
    },
    /// Remove the mark starting at START
    Unmark { start: usize },
    /// Turn automatic highlighting on or off
    Auto {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
    /// Set the clustering sensitivity
    Sensitivity { value: f64 },
    /// Remove every mark
    Clear,
    /// Delete the saved session
    Reset,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let verbose = match &cli.command {
        Command::Analyze(a) => a.shared.verbose,
        Command::Score(a) => a.shared.verbose,
        Command::Syllables(a) => a.shared.verbose,
        Command::Reconcile(a) => a.shared.verbose,
        Command::Suggest(a) => a.shared.verbose,
        Command::Session(a) => a.shared.verbose,
    };
    let log_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Score(args) => run_score(args),
        Command::Syllables(args) => run_syllables(args),
        Command::Reconcile(args) => run_reconcile(args),
        Command::Suggest(args) => run_suggest(args),
        Command::Session(args) => run_session(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Read a text file, or stdin when the path is "-".
fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn read_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let data = read_text(path)?;
    serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse annotations: {}", path.display()))
}

fn parse_scheme(letter: char) -> Result<SchemeId> {
    match SchemeId::from_letter(letter) {
        Some(id) => Ok(id),
        None => bail!("Unknown scheme '{}'. Available: A-X", letter),
    }
}

fn parse_accent(name: &str) -> Result<AccentTier> {
    match name {
        "normal" | "low" => Ok(AccentTier::Low),
        "medium" => Ok(AccentTier::Medium),
        "heavy" | "high" => Ok(AccentTier::High),
        _ => bail!("Unknown accent '{}'. Available: normal, medium, heavy", name),
    }
}

fn accent_name(tier: AccentTier) -> &'static str {
    match tier {
        AccentTier::Low => "normal",
        AccentTier::Medium => "medium",
        AccentTier::High => "heavy",
    }
}

/// Print each line with its syllable total and the marks on it.
fn print_marked_lines(text: &str, annotations: &[Annotation]) {
    for line in analyze_lines(text) {
        let mut marks: Vec<&Annotation> = annotations
            .iter()
            .filter(|a| a.line_index == line.index)
            .collect();
        marks.sort_by_key(|a| a.start_index);
        let marks: Vec<String> = marks
            .iter()
            .map(|a| {
                let manual = if a.is_manual { "*" } else { "" };
                format!("{}[{}{}]", a.word, a.scheme, manual)
            })
            .collect();
        println!("{:>3} | {:<40} {}", line.syllables, line.text, marks.join(" "));
    }
}

/// Print the words of each scheme, in label order.
fn print_scheme_summary(annotations: &[Annotation]) {
    let mut schemes: Vec<SchemeId> = annotations.iter().map(|a| a.scheme).collect();
    schemes.sort();
    schemes.dedup();
    for scheme in schemes {
        let words: Vec<String> = annotations
            .iter()
            .filter(|a| a.scheme == scheme)
            .map(|a| format!("{} ({})", a.word, accent_name(a.accent_tier)))
            .collect();
        let style = scheme.style();
        println!("{} {}: {}", scheme, style.color, words.join(", "));
    }
}

// ─── Analyze ─────────────────────────────────────────────────────

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = args.shared.engine_config()?;
    if let Some(s) = args.sensitivity {
        config.sensitivity = s;
    }
    if let Some(n) = args.scheme_limit {
        config.scheme_limit = n;
    }
    if let Some(n) = args.min_word_len {
        config.min_word_len = n;
    }
    let config = config.clamped();

    let text = read_text(&args.input)?;
    let manual = match &args.annotations {
        Some(path) => read_annotations(path)?,
        None => Vec::new(),
    };

    log::debug!(
        "Analyzing {} characters at sensitivity {:.2}",
        text.chars().count(),
        config.sensitivity
    );
    let annotations = detect_rhyme_schemes_with(&text, &manual, &config);

    if args.json {
        let report = serde_json::json!({
            "annotations": annotations,
            "lines": analyze_lines(&text),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_marked_lines(&text, &annotations);
    println!();
    print_scheme_summary(&annotations);
    Ok(())
}

// ─── Score ───────────────────────────────────────────────────────

fn run_score(args: ScoreArgs) -> Result<()> {
    let result = explain(&args.a, &args.b);
    let rhymes = result.score >= args.threshold;

    if args.json {
        let report = serde_json::json!({
            "a": args.a,
            "b": args.b,
            "score": result.score,
            "strength": result.strength(),
            "kind": result.kind,
            "tailA": result.tail_a,
            "tailB": result.tail_b,
            "rhymes": rhymes,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} / {}: {:.2} ({:?}, tails '{}' / '{}', strength {:.2})",
        args.a,
        args.b,
        result.score,
        result.kind,
        result.tail_a,
        result.tail_b,
        result.strength()
    );
    println!(
        "{} at threshold {:.2}",
        if rhymes { "rhyme" } else { "no rhyme" },
        args.threshold
    );
    Ok(())
}

// ─── Syllables ───────────────────────────────────────────────────

fn run_syllables(args: SyllablesArgs) -> Result<()> {
    let mut total = 0;
    for word in &args.words {
        let n = count_syllables(word);
        total += n;
        println!("{}\t{}", word, n);
    }
    if args.words.len() > 1 {
        println!("total\t{}", total);
    }
    Ok(())
}

// ─── Reconcile ───────────────────────────────────────────────────

fn run_reconcile(args: ReconcileArgs) -> Result<()> {
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let annotations = read_annotations(&args.annotations)?;

    let moved = reconcile_annotations(&old, &new, &annotations);
    if moved.len() < annotations.len() {
        log::info!(
            "{} of {} annotations could not be placed",
            annotations.len() - moved.len(),
            annotations.len()
        );
    }
    println!("{}", serde_json::to_string_pretty(&moved)?);
    Ok(())
}

// ─── Suggest ─────────────────────────────────────────────────────

fn run_suggest(args: SuggestArgs) -> Result<()> {
    let category: LookupCategory = args.category.parse()?;
    let lookup = get_lookup("offline", Some(args.vocab.as_path()))?;
    let suggestions = lookup
        .lookup(&args.word, category, args.max)
        .with_context(|| format!("{} lookup failed for '{}'", lookup.name(), args.word))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }
    if suggestions.is_empty() {
        log::info!("No {} found for '{}'", category.as_str(), args.word);
    }
    for s in &suggestions {
        println!(
            "{:<20} {:.2}  {} syl",
            s.word,
            s.score,
            s.num_syllables.unwrap_or(1)
        );
    }
    Ok(())
}

// ─── Session ─────────────────────────────────────────────────────

fn run_session(args: SessionArgs) -> Result<()> {
    let dir = args.store_dir.clone().unwrap_or_else(store_dir);
    let config = args.shared.engine_config()?;

    // Reset must work even when the saved file no longer parses
    if let SessionAction::Reset = args.action {
        if remove_session(&dir)? {
            log::info!("Removed saved session in {}", dir.display());
        }
        return Ok(());
    }

    let mut session =
        load_session(&dir, config.clone())?.unwrap_or_else(|| LyricsSession::new(config));

    match args.action {
        SessionAction::Show { json } => {
            if json {
                let report = serde_json::json!({
                    "lyrics": session.text(),
                    "rhymeWords": session.annotations(),
                    "autoHighlight": session.auto_highlight(),
                    "sensitivity": session.config().sensitivity,
                    "lines": session.lines(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_marked_lines(session.text(), session.annotations());
                println!();
                print_scheme_summary(session.annotations());
                println!(
                    "auto-highlight {}, sensitivity {:.2}",
                    if session.auto_highlight() { "on" } else { "off" },
                    session.config().sensitivity
                );
            }
            return Ok(());
        }
        SessionAction::SetText { input } => {
            let text = read_text(&input)?;
            session.set_text(&text);
        }
        SessionAction::Mark {
            start,
            end,
            scheme,
            accent,
            by_length,
        } => {
            if let Some(letter) = scheme {
                session.selected_scheme = parse_scheme(letter)?;
            }
            if let Some(name) = accent {
                session.accent_tier = parse_accent(&name)?;
            }
            let mark = if by_length {
                session.mark_by_length(start, end)?
            } else {
                session.mark(start, end)?
            };
            log::info!(
                "Marked '{}' as {} ({})",
                mark.word,
                mark.scheme,
                accent_name(mark.accent_tier)
            );
        }
        SessionAction::Unmark { start } => {
            let removed = session.unmark(start)?;
            log::info!("Removed mark on '{}'", removed.word);
        }
        SessionAction::Auto { state } => session.set_auto_highlight(state == "on"),
        SessionAction::Sensitivity { value } => session.set_sensitivity(value),
        SessionAction::Clear => session.clear(),
        SessionAction::Reset => return Ok(()),
    }

    save_session(&dir, &session)?;
    Ok(())
}
