use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use vb_core::Value;
use vb_engine::{find_calculator, registry};
use vb_session::{
    SessionController, SessionError, SessionResult, SessionState, TracingSink,
};
use vb_store::{
    DataManager, ExportFormat, FileStore, StoreError, decode_share_payload, export_filename,
};

#[derive(Parser)]
#[command(name = "vb-cli")]
#[command(about = "Voltbench CLI - electrical calculator sessions and history", long_about = None)]
struct Cli {
    /// Directory backing the calculator store
    #[arg(long, default_value = ".voltbench", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available calculators and their input fields
    Calculators,
    /// Run one calculation
    Calc {
        /// Calculator kind (e.g. ohms-law, three-phase-balance)
        kind: String,
        /// Input as field=value, repeatable
        #[arg(short, long = "input", value_name = "FIELD=VALUE")]
        inputs: Vec<String>,
        /// Also store the inputs as a named saved calculation
        #[arg(long)]
        save: Option<String>,
    },
    /// Show the persisted calculation history
    History,
    /// List saved calculations
    Saved,
    /// Re-run a saved calculation by id
    Load {
        id: String,
    },
    /// Delete a history entry or saved calculation by id
    Delete {
        id: String,
    },
    /// Export history and saved calculations
    Export {
        format: CliFormat,
        /// Output file (defaults to the dated export filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a bulk-export JSON file
    Import {
        path: PathBuf,
    },
    /// Print a shareable link for a history entry
    Share {
        id: String,
        #[arg(long, default_value = "https://voltbench.example/calculators")]
        base_url: String,
        /// Decode an existing link instead of creating one
        #[arg(long)]
        decode: Option<String>,
    },
    /// Remove all history and saved calculations
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Json,
    Csv,
    Pdf,
}

impl From<CliFormat> for ExportFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Json => ExportFormat::Json,
            CliFormat::Csv => ExportFormat::Csv,
            CliFormat::Pdf => ExportFormat::Pdf,
        }
    }
}

fn main() -> SessionResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let dir = cli.data_dir;

    match cli.command {
        Commands::Calculators => cmd_calculators(),
        Commands::Calc { kind, inputs, save } => {
            cmd_calc(open_data(&dir)?, &kind, &inputs, save.as_deref())
        }
        Commands::History => cmd_history(&open_data(&dir)?),
        Commands::Saved => cmd_saved(&open_data(&dir)?),
        Commands::Load { id } => cmd_load(open_data(&dir)?, &id),
        Commands::Delete { id } => cmd_delete(open_data(&dir)?, &id),
        Commands::Export { format, output } => {
            cmd_export(&open_data(&dir)?, format.into(), output.as_deref())
        }
        Commands::Import { path } => cmd_import(open_data(&dir)?, &path),
        Commands::Share {
            id,
            base_url,
            decode,
        } => cmd_share(&open_data(&dir)?, &id, &base_url, decode.as_deref()),
        Commands::Clear { yes } => cmd_clear(open_data(&dir)?, yes),
    }
}

fn open_data(data_dir: &Path) -> SessionResult<DataManager> {
    let store = FileStore::new(data_dir.to_path_buf())?;
    Ok(DataManager::load(Box::new(store))?)
}

fn cmd_calculators() -> SessionResult<()> {
    for calculator in registry() {
        println!("{}  ({})", calculator.label(), calculator.kind());
        for field in calculator.fields() {
            let unit = field
                .unit
                .as_deref()
                .map(|u| format!(" [{u}]"))
                .unwrap_or_default();
            println!("  - {}{unit}: {}", field.id, field.label);
            for option in &field.options {
                println!("      {} = {}", option.value, option.label);
            }
        }
    }
    Ok(())
}

fn cmd_calc(
    data: DataManager,
    kind: &str,
    raw_inputs: &[String],
    save: Option<&str>,
) -> SessionResult<()> {
    let calculator =
        find_calculator(kind).ok_or_else(|| SessionError::UnknownCalculator(kind.to_string()))?;
    let mut controller = SessionController::new(calculator, data, Box::new(TracingSink));

    for raw in raw_inputs {
        let (field, value) = parse_input(raw)?;
        controller.handle_input_change(field, value);
    }

    if !controller.handle_calculate() {
        for (field, message) in controller.errors() {
            eprintln!("✗ {field}: {message}");
        }
        return Err(SessionError::InvalidInput(
            "calculation did not produce a result".to_string(),
        ));
    }

    debug_assert_eq!(controller.state(), SessionState::Computed);
    for (name, value) in controller.outputs() {
        println!("{name} = {value}");
    }

    if let Some(name) = save
        && let Some(id) = controller.save_current(name, Vec::new())
    {
        println!("saved as \"{name}\" ({id})");
    }
    Ok(())
}

fn cmd_history(data: &DataManager) -> SessionResult<()> {
    if data.history().is_empty() {
        println!("No calculations recorded yet");
        return Ok(());
    }
    for entry in data.history().iter().rev() {
        println!(
            "{}  {}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.calculator_type,
            entry.id
        );
    }
    Ok(())
}

fn cmd_saved(data: &DataManager) -> SessionResult<()> {
    if data.saved().is_empty() {
        println!("No saved calculations");
        return Ok(());
    }
    for saved in data.saved() {
        let tags = if saved.tags.is_empty() {
            String::new()
        } else {
            format!("  #{}", saved.tags.join(" #"))
        };
        println!(
            "{}  {}  \"{}\"{tags}  {}",
            saved.created_at.format("%Y-%m-%d"),
            saved.calculator_type,
            saved.name,
            saved.id
        );
    }
    Ok(())
}

fn cmd_load(data: DataManager, id: &str) -> SessionResult<()> {
    let saved = data
        .find_saved(id)
        .ok_or_else(|| SessionError::InvalidInput(format!("no saved calculation with id {id}")))?
        .clone();
    let calculator = find_calculator(&saved.calculator_type)
        .ok_or_else(|| SessionError::UnknownCalculator(saved.calculator_type.clone()))?;

    let mut controller = SessionController::new(calculator, data, Box::new(TracingSink));
    if !controller.load_calculation(&saved) {
        return Err(SessionError::InvalidInput(format!(
            "saved calculation \"{}\" no longer evaluates",
            saved.name
        )));
    }

    println!("\"{}\" ({})", saved.name, saved.calculator_type);
    for (name, value) in controller.outputs() {
        println!("{name} = {value}");
    }
    Ok(())
}

fn cmd_delete(mut data: DataManager, id: &str) -> SessionResult<()> {
    if data.delete_result(id)? {
        println!("✓ Deleted history entry {id}");
        return Ok(());
    }
    if data.delete_saved(id)? {
        println!("✓ Deleted saved calculation {id}");
        return Ok(());
    }
    Err(SessionError::InvalidInput(format!("no entry with id {id}")))
}

fn cmd_export(
    data: &DataManager,
    format: ExportFormat,
    output: Option<&Path>,
) -> SessionResult<()> {
    let contents = match data.export(format) {
        Ok(contents) => contents,
        Err(StoreError::ExportUnsupported { format }) => {
            println!("{format} export is coming soon");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export_filename(format, vb_core::now())));
    fs::write(&path, contents).map_err(StoreError::from)?;
    println!("✓ Exported to {}", path.display());
    Ok(())
}

fn cmd_import(mut data: DataManager, path: &Path) -> SessionResult<()> {
    let contents = fs::read_to_string(path).map_err(StoreError::from)?;
    let summary = data.import(&contents)?;
    println!(
        "✓ Import complete (history {}, saved {})",
        if summary.history_replaced { "replaced" } else { "unchanged" },
        if summary.saved_replaced { "replaced" } else { "unchanged" },
    );
    Ok(())
}

fn cmd_share(
    data: &DataManager,
    id: &str,
    base_url: &str,
    decode: Option<&str>,
) -> SessionResult<()> {
    if let Some(link) = decode {
        let payload = decode_share_payload(link).map_err(SessionError::from)?;
        println!("calculator: {}", payload.calculator_type);
        for (field, value) in &payload.inputs {
            println!("{field} = {value}");
        }
        return Ok(());
    }

    let result = data
        .find_result(id)
        .ok_or_else(|| SessionError::InvalidInput(format!("no history entry with id {id}")))?;
    println!("{}", DataManager::share_url(base_url, result)?);
    Ok(())
}

fn cmd_clear(mut data: DataManager, yes: bool) -> SessionResult<()> {
    if !yes {
        return Err(SessionError::InvalidInput(
            "pass --yes to confirm clearing all stored data".to_string(),
        ));
    }
    data.clear_all()?;
    println!("✓ All calculator data cleared");
    Ok(())
}

/// Parse `field=value`, taking numbers and booleans typed and everything
/// else as text.
fn parse_input(raw: &str) -> SessionResult<(&str, Value)> {
    let (field, raw_value) = raw
        .split_once('=')
        .ok_or_else(|| SessionError::InvalidInput(format!("expected FIELD=VALUE, got \"{raw}\"")))?;
    let value = if let Ok(n) = raw_value.parse::<f64>() {
        Value::Number(n)
    } else if let Ok(b) = raw_value.parse::<bool>() {
        Value::Bool(b)
    } else {
        Value::Text(raw_value.to_string())
    };
    Ok((field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_input_types() {
        assert_eq!(parse_input("l1=13.5").unwrap().1, Value::Number(13.5));
        assert_eq!(parse_input("ring=true").unwrap().1, Value::Bool(true));
        assert_eq!(
            parse_input("cable=2.5mm").unwrap().1,
            Value::Text("2.5mm".into())
        );
        assert!(parse_input("no-equals").is_err());
    }
}
