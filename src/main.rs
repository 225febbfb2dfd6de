use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use panel_wm::config::EngineConfig;
use panel_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use panel_wm::persistence::{JsonFileStore, LayoutStore, StoredLayout};
use panel_wm::runner::{LayoutApp, run_layout_app, viewport_for};
use panel_wm::tracing_sub;
use panel_wm::window::{Capabilities, WindowConfig, WindowRegistry};

/// Floating panels with magnetic snapping, docking and persisted geometry.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file the window layout is read from and written to.
    #[arg(long, default_value = "panel-wm-layout.json")]
    layout_file: PathBuf,
    /// Optional JSON engine config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Overrides the config's magnetic threshold (cells).
    #[arg(long)]
    magnetic_threshold: Option<u32>,
    /// Forget the stored layout before starting.
    #[arg(long)]
    reset: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    tracing_sub::init_default(args.log_file.as_deref());

    let mut config = args
        .config
        .as_deref()
        .map(EngineConfig::load)
        .unwrap_or_default();
    if let Some(threshold) = args.magnetic_threshold {
        config = config.with_magnetic_threshold(threshold);
    }

    let mut store = JsonFileStore::new(&args.layout_file);
    if args.reset
        && let Err(err) = store.save(&StoredLayout::new())
    {
        tracing::warn!(error = %err, "failed to clear stored layout");
    }

    let (width, height) = crossterm::terminal::size()?;
    let mut registry = WindowRegistry::new(viewport_for(width, height), config, store);
    registry.open_batch(demo_panels());
    let mut app = LayoutApp::new(registry);

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    let result = run_layout_app(
        output.terminal(),
        &mut input,
        &mut app,
        Duration::from_millis(16),
    );
    output.exit()?;
    result
}

fn demo_panels() -> Vec<WindowConfig<String>> {
    let chat = [
        "<ayla> anyone up for the east gate?",
        "<brom> need a healer first",
        "<ayla> on my way",
    ]
    .join("\n");
    let inventory = ["Rope x1", "Torch x3", "Healing draught x2", "Iron key"].join("\n");
    let settings = [
        "Drag a header to move a panel.",
        "Drag an edge or corner to resize.",
        "Drop at the screen's far left or right to dock.",
        "",
        "Tab focus  m minimize  r restore all",
        "h/l dock  u undock  x close  R reset  q quit",
    ]
    .join("\n");
    let turns = ["1. Ayla", "2. Brom", "3. Goblin"].join("\n");

    vec![
        WindowConfig::new("chat", chat)
            .with_title("Chat")
            .with_position(2, 1)
            .with_size(44, 10),
        WindowConfig::new("inventory", inventory)
            .with_title("Inventory")
            .with_position(48, 1)
            .with_size(28, 10)
            .with_min_size(16, 5),
        WindowConfig::new("settings", settings)
            .with_title("Settings")
            .with_size(50, 10)
            .with_capabilities(Capabilities {
                dockable: false,
                ..Capabilities::default()
            }),
        WindowConfig::new("turn_order", turns)
            .with_title("Turn Order")
            .with_position(2, 12)
            .with_size(24, 6)
            .with_capabilities(Capabilities {
                lock_height: true,
                ..Capabilities::default()
            }),
        WindowConfig::new("login", "Signed in as ayla".to_string())
            .with_title("Login")
            .with_size(30, 5)
            .with_capabilities(Capabilities {
                closeable: false,
                minimizable: false,
                lock_size: true,
                show_in_dock: false,
                ..Capabilities::default()
            }),
    ]
}
