use clap::Parser;
use find_rus::config::{FindConfig, RcLoader};
use find_rus::controller::EditorController;
use find_rus::document_model::{Document, DocumentAccess};
use find_rus::history::StringHistory;
use find_rus::search::{CaseSetting, FindAction, FindContext, FindOutcome, PatternError};
use find_rus::status::StatusLine;
use find_rus::view::EditorView;
use std::path::{Path, PathBuf};
use tracing::info;

/// Live find-and-highlight over a text file.
#[derive(Parser, Debug)]
#[command(name = "find-rus")]
#[command(about = "Incremental find with match highlighting")]
#[command(version)]
struct Args {
    /// File to search
    file: PathBuf,

    /// Run this pattern right away
    #[arg(short, long, value_name = "PATTERN")]
    pattern: Option<String>,

    /// Print the matches for --pattern and exit instead of opening the editor
    #[arg(short, long, requires = "pattern")]
    batch: bool,

    /// Stop at the first/last match instead of wrapping around
    #[arg(long)]
    no_wrap: bool,

    /// Case handling: smart, sensitive or insensitive
    #[arg(long, value_name = "MODE", value_parser = parse_case)]
    case: Option<CaseSetting>,

    /// Write a trace log to this file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_case(value: &str) -> Result<CaseSetting, String> {
    CaseSetting::parse(value)
        .ok_or_else(|| format!("unknown case mode `{value}` (expected smart, sensitive or insensitive)"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(log_path) = &args.log {
        setup_tracing(log_path, args.verbose)?;
    }

    // Load RC configuration, then let the command line override it
    let mut config = RcLoader::load_config();
    if let Some(case) = args.case {
        config.case = case;
    }
    if args.no_wrap {
        config.wrap_search = false;
    }

    let document = Document::from_file(&args.file)?;
    info!(file = %args.file.display(), bytes = document.text().len(), "document loaded");

    if args.batch {
        let pattern = args.pattern.as_deref().unwrap_or_default();
        return run_batch(document, pattern, &config);
    }

    let mut controller = EditorController::new(document);
    controller.apply_config(&config);
    if let Some(pattern) = args.pattern.as_deref() {
        controller.find_in_text(pattern);
    }

    controller.run()
}

fn run_batch(
    document: Document,
    pattern: &str,
    config: &FindConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    for line in batch_report(document, pattern, config)? {
        println!("{line}");
    }
    Ok(())
}

/// Status line followed by one `line:col: text` row per match. An empty
/// pattern finds nothing and reports nothing.
fn batch_report(
    document: Document,
    pattern: &str,
    config: &FindConfig,
) -> Result<Vec<String>, PatternError> {
    let mut view = EditorView::new(document);
    let mut find = FindAction::new();
    let mut history = StringHistory::default();
    let mut status = StatusLine::new();
    RcLoader::apply_config(&mut find, &mut history, config);

    let mut cx = FindContext {
        view: &mut view,
        status: &mut status,
        history: &mut history,
    };
    match find.find_in_text(&mut cx, pattern) {
        FindOutcome::Invalid(err) => return Err(err),
        FindOutcome::Cleared => return Ok(Vec::new()),
        FindOutcome::Found(_) => {}
    }

    let mut report = vec![status.message().to_string()];
    for m in find.matches() {
        let (line, column) = view.document.position(m.start);
        let text = view.document.get_line(line).unwrap_or_default();
        report.push(format!("{}:{}: {}", line + 1, column + 1, text));
    }
    Ok(report)
}

fn setup_tracing(log_path: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    use std::fs::OpenOptions;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    // The terminal is in raw mode while the editor runs, so logs only ever go
    // to a file.
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let file = std::sync::Mutex::new(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("find_rus=debug")
        } else {
            EnvFilter::new("find_rus=info")
        }
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    info!(path = %log_path.display(), "tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(text: &str, pattern: &str) -> Result<Vec<String>, PatternError> {
        batch_report(
            Document::from_string(text.to_string()),
            pattern,
            &FindConfig::default(),
        )
    }

    #[test]
    fn test_batch_lists_matches() {
        let lines = report("alpha\nbeta alpha\n", "alpha").unwrap();

        assert_eq!(
            lines,
            vec![
                "Found 2 matches for \"alpha\"",
                "1:1: alpha",
                "2:6: beta alpha",
            ]
        );
    }

    #[test]
    fn test_batch_empty_pattern_prints_nothing() {
        assert!(report("alpha", "").unwrap().is_empty());
    }

    #[test]
    fn test_batch_invalid_pattern_is_an_error() {
        let err = report("alpha", "(al").unwrap_err();
        assert_eq!(err.to_string(), "unclosed group");
    }
}
