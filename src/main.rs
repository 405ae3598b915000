//! Command-line front end for the level editor
//!
//! Usage:
//!   endor-edit new level.lvl --size 64      # Write an empty level
//!   endor-edit info level.lvl               # Summarize a level
//!   endor-edit sculpt level.lvl --x 0 --z 0 --delta 2 --radius 4
//!   endor-edit check-asset grass.bmp --kind texture

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use endor_editor::asset::AssetKind;
use endor_editor::{EditorConfig, EditorSession};

#[derive(Parser)]
#[command(name = "endor-edit")]
#[command(version = endor_editor::VERSION)]
#[command(about = "Inspect and edit Endor level files")]
struct Cli {
    /// Editor settings (RON); defaults to the platform config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty level
    New {
        file: PathBuf,
        /// Terrain cells per side
        #[arg(long)]
        size: Option<usize>,
        /// World units per terrain cell
        #[arg(long)]
        scale: Option<f32>,
    },
    /// Print a summary of a level
    Info { file: PathBuf },
    /// Raise or lower terrain around a point and save the level
    Sculpt {
        file: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, allow_hyphen_values = true)]
        z: f32,
        #[arg(long, allow_hyphen_values = true)]
        delta: f32,
        #[arg(long)]
        radius: f32,
        /// Use a smoothstep falloff
        #[arg(long)]
        smooth: bool,
    },
    /// Relax terrain around a point and save the level
    Smooth {
        file: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f32,
        #[arg(long, allow_hyphen_values = true)]
        z: f32,
        #[arg(long)]
        radius: f32,
        #[arg(long, default_value_t = 1)]
        iterations: u32,
    },
    /// Load one asset through the cache and report what was found
    CheckAsset {
        file: PathBuf,
        /// texture, model, sound, script, material, prefab or animation
        #[arg(long, value_parser = parse_kind)]
        kind: AssetKind,
    },
    /// Write the active settings to a RON file
    WriteConfig {
        /// Defaults to the platform config file
        file: Option<PathBuf>,
    },
}

fn parse_kind(s: &str) -> Result<AssetKind, String> {
    AssetKind::from_label(s).ok_or_else(|| format!("unknown asset kind '{}'", s))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::load_or_default(),
    };

    match cli.command {
        Commands::New { file, size, scale } => new_level(config, &file, size, scale),
        Commands::Info { file } => info(config, &file),
        Commands::Sculpt { file, x, z, delta, radius, smooth } => {
            edit_level(config, &file, |session| {
                session.modify_terrain_height(x, z, delta, radius, smooth)
            })
        }
        Commands::Smooth { file, x, z, radius, iterations } => {
            edit_level(config, &file, |session| session.smooth_terrain(x, z, radius, iterations))
        }
        Commands::CheckAsset { file, kind } => check_asset(config, &file, kind),
        Commands::WriteConfig { file } => write_config(&config, file),
    }
}

fn new_level(mut config: EditorConfig, file: &Path, size: Option<usize>, scale: Option<f32>) -> Result<()> {
    if let Some(size) = size {
        config.terrain_size = size;
    }
    if let Some(scale) = scale {
        config.terrain_scale = scale;
    }
    let mut session = EditorSession::new(config);
    session
        .save_level(file)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    println!(
        "Created {} ({}x{} terrain)",
        file.display(),
        session.terrain().size(),
        session.terrain().size()
    );
    Ok(())
}

fn open(config: EditorConfig, file: &Path) -> Result<EditorSession> {
    let mut session = EditorSession::new(config);
    session
        .load_level(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    Ok(session)
}

fn info(config: EditorConfig, file: &Path) -> Result<()> {
    let session = open(config, file)?;
    let terrain = session.terrain();
    let (low, high) = terrain
        .heights()
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)));

    println!("{}", file.display());
    println!("  terrain: {}x{} cells, scale {:.2}, heights {:.2}..{:.2}", terrain.size(), terrain.size(), terrain.scale(), low, high);
    for (i, layer) in terrain.layers().iter().enumerate() {
        if let Some(name) = layer.asset.and_then(|id| session.assets().filename(id)) {
            println!("  layer {}: {} (x{:.2})", i, name, layer.scale);
        }
    }
    println!("  objects: {}", session.object_count());
    for obj in session.objects() {
        let p = obj.position;
        println!(
            "    #{:<4} {:<16} {:<24} ({:.2}, {:.2}, {:.2}){}",
            obj.id,
            obj.object_type().label(),
            obj.name,
            p.x,
            p.y,
            p.z,
            if obj.visible { "" } else { " hidden" }
        );
    }
    println!("  assets: {}", session.assets().len());
    Ok(())
}

fn edit_level(config: EditorConfig, file: &Path, edit: impl FnOnce(&mut EditorSession) -> bool) -> Result<()> {
    let mut session = open(config, file)?;
    if !edit(&mut session) {
        anyhow::bail!("Brush does not touch the terrain of {}", file.display());
    }
    session
        .save_level(file)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    println!("Updated {}", file.display());
    Ok(())
}

fn check_asset(mut config: EditorConfig, file: &Path, kind: AssetKind) -> Result<()> {
    config.default_assets.clear();
    let mut session = EditorSession::new(config);
    let filename = file.to_string_lossy();
    let display_name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());

    let id = session
        .load_asset(&filename, &display_name, kind)
        .with_context(|| format!("{} is not a valid {}", file.display(), kind))?;
    if let Some(asset) = session.assets().get(id) {
        println!("{}: {} ({} bytes)", asset.display_name, asset.kind, asset.data_size());
        if kind.has_thumbnail() && session.config().thumbnail_dir.is_some() {
            println!("  thumbnail: {}", asset.thumbnail_path.display());
        }
    }
    Ok(())
}

fn write_config(config: &EditorConfig, file: Option<PathBuf>) -> Result<()> {
    let path = file
        .or_else(EditorConfig::default_path)
        .context("No config directory on this platform; pass a file")?;
    config
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
