#![deny(unsafe_code)]
//! CLI binary for the map texturizer.
//!
//! Subcommands:
//! - `texturize <input>`: texturize a mask image, write RGBA or indexed PNG
//! - `terrains`: print the registered terrains and their indices
//! - `palettes`: generate the palette store from a terrain directory

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use wa_texturizer_core::{Color, ColorPalette, GrassLayout, RenderConfig, WalvRecord};
use wa_texturizer_indexed::encode_indexed;
use wa_texturizer_terrain::loader::{load_image, save_image, AssetLoader};
use wa_texturizer_terrain::render::Texturizer;
use wa_texturizer_terrain::store::PaletteStore;
use wa_texturizer_terrain::{Terrain, TERRAINS};

#[derive(Parser)]
#[command(name = "wa-texturizer", about = "Texturize mask images into terrain maps")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log debug diagnostics (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Left half is the bottom strip.
    BottomLeft,
    /// Left half is the top strip.
    TopLeft,
}

impl From<LayoutArg> for GrassLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::BottomLeft => GrassLayout::BottomLeft,
            LayoutArg::TopLeft => GrassLayout::TopLeft,
        }
    }
}

/// Render options that can also come from a `--config` file.
#[derive(clap::Args, Default)]
struct RenderArgs {
    /// JSON file holding a render configuration; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terrain name (see `terrains`).
    #[arg(short, long)]
    terrain: Option<String>,

    /// Mask color as `#rrggbb`.
    #[arg(long, value_parser = parse_color)]
    mask_color: Option<Color>,

    /// Background color as `#rrggbb`.
    #[arg(long, value_parser = parse_color)]
    background: Option<Color>,

    /// Use a transparent background.
    #[arg(long)]
    transparent: bool,

    /// No grass along the top border.
    #[arg(long)]
    pad_top: bool,

    /// No grass along the bottom border.
    #[arg(long)]
    pad_bottom: bool,

    /// Pad the result to valid map dimensions.
    #[arg(long)]
    resize: bool,

    /// Which half of the grass sheet holds which strip [default: top-left,
    /// the layout of the game's grass.png].
    #[arg(long, value_enum)]
    grass_layout: Option<LayoutArg>,
}

#[derive(Subcommand)]
enum Command {
    /// Texturize a mask image and write a PNG.
    Texturize {
        /// Mask image.
        input: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Directory holding `<terrain>/text.png` and `<terrain>/grass.png`.
        #[arg(long, default_value = "Terrain")]
        terrain_dir: PathBuf,

        /// Write an 8-bit indexed PNG with the waLV level chunk.
        #[arg(long)]
        indexed: bool,

        /// Palette store JSON; without it indexed output derives the
        /// terrain palette from its assets.
        #[arg(long)]
        palettes: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// List the registered terrains.
    Terrains,
    /// Generate the palette store for every terrain found in a directory.
    Palettes {
        /// Directory holding `<terrain>/text.png` and `<terrain>/grass.png`.
        #[arg(long, default_value = "Terrain")]
        terrain_dir: PathBuf,

        /// Output file path.
        #[arg(short, long, default_value = "palettes.json")]
        output: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::from_hex(s).map_err(|e| e.to_string())
}

/// Configuration used when neither a config file nor a flag says otherwise.
///
/// Differs from [`RenderConfig::default`] in the grass layout: the CLI works
/// on the game's own asset directories, whose sheets keep the top strip on
/// the left.
fn cli_defaults() -> RenderConfig {
    RenderConfig {
        grass_layout: GrassLayout::TopLeft,
        ..RenderConfig::default()
    }
}

/// Reads a config file and lays its keys over [`cli_defaults`].
fn read_config_file(path: &Path) -> Result<RenderConfig, CliError> {
    let invalid = |e: serde_json::Error| CliError::Input(format!("invalid config {}: {e}", path.display()));
    let json = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let overrides: serde_json::Value = serde_json::from_str(&json).map_err(invalid)?;
    let serde_json::Value::Object(overrides) = overrides else {
        return Err(CliError::Input(format!(
            "invalid config {}: expected a JSON object",
            path.display()
        )));
    };
    let mut merged = serde_json::to_value(cli_defaults())?;
    if let serde_json::Value::Object(fields) = &mut merged {
        fields.extend(overrides);
    }
    serde_json::from_value(merged).map_err(invalid)
}

/// Starts from the `--config` file (or defaults) and applies explicit flags.
fn resolve_config(args: &RenderArgs) -> Result<RenderConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => cli_defaults(),
    };
    if let Some(terrain) = &args.terrain {
        config.terrain = terrain.clone();
    }
    if let Some(mask) = args.mask_color {
        config.mask_color = mask;
    }
    if let Some(background) = args.background {
        config.background_color = background;
    }
    if let Some(layout) = args.grass_layout {
        config.grass_layout = layout.into();
    }
    config.transparent_background |= args.transparent;
    config.pad_top |= args.pad_top;
    config.pad_bottom |= args.pad_bottom;
    config.resize |= args.resize;
    Ok(config)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn texturize(
    input: &Path,
    output: &Path,
    terrain_dir: &Path,
    indexed: bool,
    palettes: Option<&Path>,
    mut config: RenderConfig,
) -> Result<serde_json::Value, CliError> {
    config.build_palette |= indexed;
    let terrain = Terrain::from_name(&config.terrain)?;
    let mut loader = AssetLoader::new(terrain_dir);
    let assets = loader.terrain(&terrain)?;
    let source = load_image(input)?;

    let texturizer = match palettes {
        Some(path) => Texturizer::with_palettes(PaletteStore::load(path)?),
        None if indexed => {
            let mut store = PaletteStore::new();
            store.insert(
                terrain.name,
                assets.palette(config.background(), config.grass_layout)?,
            );
            Texturizer::with_palettes(store)
        }
        None => Texturizer::new(),
    };
    let render = texturizer.render(&source, &assets, &config)?;

    let palette_len = match (&render.palette, indexed) {
        (Some(palette), true) => {
            let record = WalvRecord::for_terrain(render.terrain.index);
            let bytes = encode_indexed(&render.image, palette, &record)?;
            fs::write(output, bytes)
                .map_err(|e| CliError::Io(format!("{}: {e}", output.display())))?;
            log::info!("wrote indexed map to {}", output.display());
            Some(palette.len())
        }
        _ => {
            save_image(&render.image, output)?;
            None
        }
    };

    Ok(serde_json::json!({
        "terrain": render.terrain.name,
        "terrain_index": render.terrain.index,
        "width": render.image.width(),
        "height": render.image.height(),
        "indexed": indexed,
        "palette_len": palette_len,
        "output": output.display().to_string(),
    }))
}

fn generate_palettes(
    terrain_dir: &Path,
    output: &Path,
    config: &RenderConfig,
) -> Result<PaletteStore, CliError> {
    let mut loader = AssetLoader::new(terrain_dir);
    let mut store = PaletteStore::new();
    for terrain in TERRAINS {
        if !loader.has_terrain(terrain) {
            log::debug!("no assets for {} in {}", terrain.name, terrain_dir.display());
            continue;
        }
        let assets = loader.terrain(terrain)?;
        let palette: ColorPalette = assets.palette(config.background(), config.grass_layout)?;
        log::debug!("{}: {} colors", terrain.name, palette.len());
        store.insert(terrain.name, palette);
        // each terrain's images are only needed once
        loader.cache_mut().clear();
    }
    if store.is_empty() {
        return Err(CliError::Input(format!(
            "no terrain assets found in {}",
            terrain_dir.display()
        )));
    }
    store.save(output)?;
    Ok(store)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Terrains => {
            if cli.json {
                let list: Vec<_> = TERRAINS
                    .iter()
                    .map(|t| serde_json::json!({"name": t.name, "index": t.index}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                println!("Terrains:");
                for t in TERRAINS {
                    println!("  {:>2}  {}", t.index, t.name);
                }
            }
        }
        Command::Texturize {
            input,
            output,
            terrain_dir,
            indexed,
            palettes,
            render,
        } => {
            let config = resolve_config(&render)?;
            let info = texturize(
                &input,
                &output,
                &terrain_dir,
                indexed,
                palettes.as_deref(),
                config,
            )?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "texturized {} with {} ({}x{}) -> {}",
                    input.display(),
                    info["terrain"].as_str().unwrap_or_default(),
                    info["width"],
                    info["height"],
                    output.display()
                );
            }
        }
        Command::Palettes {
            terrain_dir,
            output,
            render,
        } => {
            let config = resolve_config(&render)?;
            let store = generate_palettes(&terrain_dir, &output, &config)?;
            if cli.json {
                let sizes: serde_json::Map<_, _> = store
                    .terrains()
                    .filter_map(|name| {
                        let len = store.palette_for(name).ok()?.len();
                        Some((name.to_string(), serde_json::json!(len)))
                    })
                    .collect();
                let info = serde_json::json!({
                    "output": output.display().to_string(),
                    "palettes": sizes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "wrote {} terrain palettes -> {}",
                    store.len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
