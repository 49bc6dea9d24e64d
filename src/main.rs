use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use docx_sections::docx::Package;
use docx_sections::{Asset, AssetStore, DirectoryStore, SectionRules, UploadError};

#[derive(Parser)]
#[command(
    name = "docx-sections",
    version,
    about = "Convert a DOCX file into a JSON section tree"
)]
struct Cli {
    /// Input DOCX file
    input: PathBuf,

    /// Output JSON file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory embedded images are written to; images are dropped when unset
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// URL prefix for stored images (defaults to file:// URLs)
    #[arg(long, requires = "assets_dir")]
    asset_base_url: Option<String>,

    /// JSON file overriding the section rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Extra style id treated as a top-level heading (repeatable)
    #[arg(long = "heading1", value_name = "STYLE")]
    heading1: Vec<String>,

    /// Extra style id treated as a second-level heading (repeatable)
    #[arg(long = "heading2", value_name = "STYLE")]
    heading2: Vec<String>,

    /// Extra style id treated as an image caption (repeatable)
    #[arg(long = "caption", value_name = "STYLE")]
    caption: Vec<String>,

    /// Emit the flat content sequence instead of sections
    #[arg(long)]
    flat: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_rules(cli: &Cli) -> Result<SectionRules, String> {
    let mut rules = match &cli.rules {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))?
        }
        None => SectionRules::default(),
    };
    rules.heading1.extend(cli.heading1.iter().cloned());
    rules.heading2.extend(cli.heading2.iter().cloned());
    rules.caption.extend(cli.caption.iter().cloned());
    Ok(rules)
}

fn discard(asset: &Asset<'_>) -> Result<String, UploadError> {
    Err(UploadError::Rejected(format!(
        "no asset directory configured for {}",
        asset.name
    )))
}

fn run(cli: &Cli) -> Result<(), String> {
    let rules = load_rules(cli)?;

    let dir_store;
    let store: &dyn AssetStore = match &cli.assets_dir {
        Some(dir) => {
            dir_store = DirectoryStore::new(dir, cli.asset_base_url.clone());
            &dir_store
        }
        None => &discard,
    };

    let json = if cli.flat {
        let mut package = Package::open(&cli.input).map_err(|e| e.to_string())?;
        let nodes = docx_sections::parse_content(&mut package, store).map_err(|e| e.to_string())?;
        if cli.compact {
            serde_json::to_string(&nodes)
        } else {
            serde_json::to_string_pretty(&nodes)
        }
    } else {
        let sections =
            docx_sections::convert_docx(&cli.input, store, &rules).map_err(|e| e.to_string())?;
        if cli.compact {
            serde_json::to_string(&sections)
        } else {
            serde_json::to_string_pretty(&sections)
        }
    }
    .map_err(|e| e.to_string())?;

    match &cli.output {
        Some(path) => std::fs::write(path, json + "\n")
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
