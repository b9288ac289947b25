use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use inkpad::config::Config;
use inkpad::export::Exporter;
use inkpad::input::DrawingSession;
use inkpad::script::{Script, run_script};
use inkpad::session::{
    self, FileStore, KeyValueStore, MemoryStore, StoreInspection, StoreOptions,
};

#[derive(Parser, Debug)]
#[command(name = "inkpad")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("INKPAD_GIT_HASH"), ")"),
    about = "Freehand raster drawing pad with undo history and PDF export"
)]
struct Cli {
    /// Replay a TOML drawing script against the canvas
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Export the canvas to a PDF once the script (if any) has run
    #[arg(long, short = 'e', action = ArgAction::SetTrue)]
    export: bool,

    /// Directory for exported documents (overrides [export] directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Canvas width in pixels (overrides [canvas] width)
    #[arg(long, value_name = "PX")]
    width: Option<i32>,

    /// Canvas height in pixels (overrides [canvas] height)
    #[arg(long, value_name = "PX")]
    height: Option<i32>,

    /// Name of the persisted drawing to use
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Keep style and drawing in memory only
    #[arg(long, action = ArgAction::SetTrue)]
    ephemeral: bool,

    /// Show information about the persisted drawing store and exit
    #[arg(
        long,
        action = ArgAction::SetTrue,
        conflicts_with_all = ["script", "export", "clear_store"]
    )]
    store_info: bool,

    /// Delete the persisted drawing store and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["script", "export"])]
    clear_store: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Failed to load config: {:#}; using defaults", err);
            Config::default()
        }
    };

    if cli.store_info || cli.clear_store {
        let options = store_options(&config, cli.profile.as_deref())?;
        if cli.clear_store {
            let outcome = session::clear_store(&options)?;
            println!("Store directory: {}", options.base_dir.display());
            println!("  Store removed:  {}", yes_no(outcome.removed_store));
            println!("  Backup removed: {}", yes_no(outcome.removed_backup));
            println!("  Lock removed:   {}", yes_no(outcome.removed_lock));
        } else {
            print_inspection(&session::inspect_store(&options)?);
        }
        return Ok(());
    }

    if cli.script.is_none() && !cli.export {
        // No flags: show usage
        println!("inkpad: Freehand raster drawing pad with undo history and PDF export");
        println!();
        println!("Usage:");
        println!("  inkpad --script FILE     Replay a drawing script");
        println!("  inkpad --export          Export the persisted drawing to PDF");
        println!("  inkpad --store-info      Show the persisted drawing store");
        println!("  inkpad --clear-store     Delete the persisted drawing store");
        println!("  inkpad --help            Show help");
        println!();
        println!("Configuration:");
        println!("  ~/.config/inkpad/config.toml");
        return Ok(());
    }

    if let Some(width) = cli.width {
        config.canvas.width = width;
    }
    if let Some(height) = cli.height {
        config.canvas.height = height;
    }
    config.validate_and_clamp();

    let store = open_store(&config, &cli);
    let mut drawing = DrawingSession::new(&config, store);
    if !drawing.has_surface() {
        log::warn!("No drawing surface available; drawing steps will be ignored");
    }

    let exporter = match &cli.output_dir {
        Some(dir) => Exporter::new(dir),
        None => Exporter::from_config(&config.export),
    };

    if let Some(path) = &cli.script {
        let script = Script::load(path)?;
        let report = run_script(&mut drawing, &script, Some(&exporter))?;
        println!("Ran {} step(s) from {}", report.steps_run, path.display());
        for document in &report.exports {
            println!("Exported {}", document.path.display());
        }
    }

    if cli.export {
        let document = drawing.export(&exporter).context("Export failed")?;
        println!("Exported {}", document.path.display());
    }

    Ok(())
}

fn store_options(config: &Config, profile: Option<&str>) -> anyhow::Result<StoreOptions> {
    let config_dir = Config::config_dir()?;
    session::options_from_config(&config.session, &config_dir, profile)
}

fn open_store(config: &Config, cli: &Cli) -> Box<dyn KeyValueStore> {
    if cli.ephemeral || !config.session.persist {
        log::info!("Persistence disabled; using in-memory store");
        return Box::new(MemoryStore::new());
    }

    let opened = store_options(config, cli.profile.as_deref()).and_then(FileStore::open);
    match opened {
        Ok(store) => {
            log::info!("Using drawing store {}", store.path().display());
            Box::new(store)
        }
        Err(err) => {
            log::warn!(
                "Failed to open drawing store: {:#}; falling back to memory",
                err
            );
            Box::new(MemoryStore::new())
        }
    }
}

fn print_inspection(inspection: &StoreInspection) {
    println!("Store file: {}", inspection.store_path.display());
    if !inspection.exists {
        println!("  (not found)");
    } else {
        if let Some(size) = inspection.size_bytes {
            println!("  Size:       {} bytes", size);
        }
        if let Some(modified) = inspection.modified {
            let modified: DateTime<Local> = modified.into();
            println!("  Modified:   {}", modified.format("%Y-%m-%d %H:%M:%S"));
        }
        println!("  Compressed: {}", yes_no(inspection.compressed));
        println!("  Keys:       {}", inspection.keys.join(", "));
        if let Some(color) = &inspection.line_color {
            println!("  Color:      {}", color);
        }
        if let Some(weight) = &inspection.line_weight {
            println!("  Weight:     {}", weight);
        }
        if let Some(bytes) = inspection.drawing_bytes {
            println!("  Drawing:    {} bytes encoded", bytes);
        }
    }

    print!("Backup file: {}", inspection.backup_path.display());
    match inspection.backup_size_bytes {
        Some(size) if inspection.backup_exists => println!(" ({} bytes)", size),
        _ => println!(" (not found)"),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
