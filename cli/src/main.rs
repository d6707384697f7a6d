//! itemizer CLI - forensic itemization of Word documents
//!
//! Breaks DOCX packages into categorized output trees and reports hidden
//! media and search pattern matches.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use itemizer::render::{self, JsonFormat};
use itemizer::{BatchRunner, DocumentReport, ItemizeOptions, ZoneTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Itemize Office Open XML documents for forensic review
#[derive(Parser)]
#[command(
    name = "itemizer",
    author = "iyulab",
    version,
    about = "Itemize the contents of Word documents",
    long_about = "itemizer - Forensic itemization of Office Open XML documents.\n\n\
                  Copies every archive entry into a categorized output tree, flags media\n\
                  whose signature contradicts its extension, and searches entry names and\n\
                  contents for a regular expression."
)]
struct Cli {
    /// Document file, or directory of documents
    path: PathBuf,

    /// Regular expression matched against entry names and contents
    search_term: Option<String>,

    /// Directory receiving the output trees (default: next to each document)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with content-zone rules replacing the built-in table
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Do not write report.json and log.txt into the output trees
    #[arg(long)]
    no_report: bool,

    /// Print each report as JSON instead of the text log
    #[arg(long)]
    json: bool,
}

fn main() {
    itemizer::logging::init_tracing("warn");
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every document was itemized.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let options = build_options(&cli)?;
    let runner = BatchRunner::new(options)?;

    let pb = create_spinner("Scanning documents...");
    let json = cli.json;
    let summary = runner.run_with(&cli.path, |document, outcome| {
        pb.suspend(|| match outcome {
            Ok(report) => print_report(report, json),
            Err(e) => eprintln!(
                "{} {}: {}",
                "✗".red().bold(),
                document.display(),
                e
            ),
        });
        pb.set_message(format!("Itemized {}", file_label(document)));
    })?;
    pb.finish_and_clear();

    if summary.attempted() == 0 {
        println!(
            "{} No documents found in: {}",
            "!".yellow().bold(),
            cli.path.display()
        );
        return Ok(true);
    }

    let status = if summary.is_success() {
        "✓".green().bold()
    } else {
        "!".yellow().bold()
    };
    print!("{} {}", status, render::summary_to_text(&summary));

    Ok(summary.is_success())
}

fn build_options(cli: &Cli) -> Result<ItemizeOptions, Box<dyn std::error::Error>> {
    let mut options = ItemizeOptions::new().with_report(!cli.no_report);

    if let Some(ref term) = cli.search_term {
        options = options.with_search_term(term.as_str());
    }
    if let Some(ref root) = cli.output {
        fs::create_dir_all(root)?;
        options = options.with_output_root(root);
    }
    if let Some(ref path) = cli.zones {
        let json = fs::read_to_string(path)?;
        options = options.with_zones(ZoneTable::from_json(&json)?);
    }

    Ok(options)
}

fn print_report(report: &DocumentReport, json: bool) {
    if json {
        match render::to_json(report, JsonFormat::Pretty) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
        }
        return;
    }

    let text = render::to_text(report);
    for line in text.lines() {
        if line.starts_with("Hidden Media Found") {
            println!("{}", line.red().bold());
        } else if line.starts_with("Searching") {
            println!("{}", line.cyan().bold());
        } else if line.starts_with("Document Name") {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    println!();
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::parse_from(["itemizer", "case.docx", "(?i)secret"]);
        assert_eq!(cli.path, PathBuf::from("case.docx"));
        assert_eq!(cli.search_term.as_deref(), Some("(?i)secret"));
        assert!(!cli.no_report);
    }

    #[test]
    fn test_options_from_flags() {
        let cli = Cli::parse_from(["itemizer", "cases", "--no-report"]);
        let options = build_options(&cli).unwrap();
        assert!(options.search_term.is_none());
        assert!(!options.write_report);
        assert!(options.output_root.is_none());
    }
}
