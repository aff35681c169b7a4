use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use touch_deck::bitmap::{self, BitmapDescriptor};
use touch_deck::config::Config;
use touch_deck::display::{FrameBuffer, SharedDisplay};
use touch_deck::input::{self, EnigoHid, StdDelay};
use touch_deck::memory::{FixedBudget, HeapGuard};
use touch_deck::storage::DirStorage;

#[derive(Parser, Debug)]
#[command(name = "touch-deck")]
#[command(about = "Bitmap icons and key macros for a touchscreen macro pad")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/touch-deck/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a BMP's headers and print them
    Inspect {
        /// Path relative to the storage root
        path: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a BMP on the simulated panel and save it as PNG
    Render {
        /// Path relative to the storage root
        path: String,
        #[arg(long, value_name = "PNG")]
        out: PathBuf,
        #[arg(long, default_value_t = 0)]
        x: i32,
        #[arg(long, default_value_t = 0)]
        y: i32,
    },
    /// Type a key macro such as "[ctrl][c]" into the focused window
    Send {
        keys: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Inspect { path, json } => inspect(&config, &path, json),
        Command::Render { path, out, x, y } => render(&config, &path, &out, x, y).await,
        Command::Send { keys } => send(&keys),
    }
}

fn load_descriptor(storage: &mut DirStorage, path: &str) -> Result<BitmapDescriptor> {
    let mut bitmap = BitmapDescriptor::new();
    bitmap
        .load(storage, path)
        .with_context(|| format!("loading {}", storage.resolve(path).display()))?;
    Ok(bitmap)
}

fn inspect(config: &Config, path: &str, json: bool) -> Result<()> {
    let mut storage = DirStorage::new(config.storage.root.clone());
    let bitmap = load_descriptor(&mut storage, path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bitmap)?);
        return Ok(());
    }

    println!("File:        {}", storage.resolve(path).display());
    println!("Valid:       {}", bitmap.is_valid());
    println!("Size:        {}x{}", bitmap.width(), bitmap.height());
    println!("Bit depth:   {}", bitmap.bit_depth());
    println!("Planes:      {}", bitmap.planes());
    println!("Compression: {}", bitmap.compression());
    println!(
        "Row order:   {}",
        if bitmap.is_row_order_flipped() {
            "top-down"
        } else {
            "bottom-up"
        }
    );
    println!(
        "Data offset: {} (canonical {})",
        bitmap.data_start(),
        bitmap.pixel_data_offset()
    );
    if bitmap.is_valid() {
        println!("Row stride:  {} bytes", bitmap.stride());
    }
    Ok(())
}

async fn render(config: &Config, path: &str, out: &Path, x: i32, y: i32) -> Result<()> {
    let mut storage = DirStorage::new(config.storage.root.clone());
    let icon = load_descriptor(&mut storage, path)?;
    let style = config.display.style();

    let mut panel = FrameBuffer::new(config.display.width, config.display.height);
    if let Some(font) = &config.display.font_path {
        panel = panel.with_font_file(font)?;
    }
    panel.clear(style.background);

    let guard = HeapGuard::new(FixedBudget::new(config.memory.budget_bytes));
    let bus = SharedDisplay::new(panel);
    {
        let mut display = bus.lock().await;
        bitmap::render_file(&mut storage, path, &icon, x, y, &mut *display, &guard)?;
    }

    let panel = bus.into_inner().context("display still in use")?;
    panel.save(out)?;
    info!("Saved {}", out.display());
    Ok(())
}

fn send(keys: &str) -> Result<()> {
    let mut hid = EnigoHid::new()?;
    let sent = input::dispatch(keys, &mut hid, &mut StdDelay);
    info!("Sent {} keys", sent);
    Ok(())
}
