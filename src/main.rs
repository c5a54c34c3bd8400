//! apparatus - critical edition renderer

use std::process::ExitCode;

use clap::Parser;

use apparatus::{read_document, render_document};

#[derive(Parser)]
#[command(name = "apparatus")]
#[command(version, about = "Render critical editions of manuscript texts", long_about = None)]
#[command(after_help = "EXAMPLES:
    apparatus 1En.xml -i                          List versions and witnesses
    apparatus 1En.xml -V Ethiopic -w p            Render the Ethiopic text of witness p")]
struct Cli {
    /// Input critical-edition XML file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Version title to render
    #[arg(short = 'V', long, required_unless_present = "info")]
    version_title: Option<String>,

    /// Witness id to render the text of
    #[arg(short, long, required_unless_present = "info")]
    witness: Option<String>,

    /// List the document's versions and witnesses without rendering
    #[arg(short, long)]
    info: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = if cli.info {
        show_info(&cli.input)
    } else {
        let version = cli.version_title.expect("version required");
        let witness = cli.witness.expect("witness required");
        render(&cli.input, &version, &witness)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn show_info(path: &str) -> Result<(), String> {
    let document = read_document(path).map_err(|e| e.to_string())?;

    println!("File: {path}");
    println!("Title: {}", document.title);
    if !document.text_structure.is_empty() {
        println!("Structure: {}", document.text_structure);
    }

    for version in &document.versions {
        println!();
        println!("Version: {}", version.title);
        if !version.language.is_empty() {
            println!("  Language: {}", version.language);
        }
        if !version.author.is_empty() {
            println!("  Author: {}", version.author);
        }
        let labels: Vec<&str> = version
            .division_labels
            .iter()
            .map(|l| l.label.as_str())
            .collect();
        println!("  Divisions: {}", labels.join(" > "));
        let witnesses: Vec<&str> = version.witness_ids().collect();
        println!("  Witnesses: {}", witnesses.join(", "));
    }

    Ok(())
}

fn render(path: &str, version_title: &str, witness: &str) -> Result<(), String> {
    let document = read_document(path).map_err(|e| e.to_string())?;
    let rendered =
        render_document(&document, version_title, witness).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&rendered).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
