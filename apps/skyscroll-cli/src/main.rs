use clap::{Parser, Subcommand};
use serde::Serialize;
use skyscroll_assets::{
    DeferredTextureLoader, ImmediateTextureLoader, TextureLoader, TextureState,
};
use skyscroll_composer::{
    CancellationToken, FrameLoop, ManualScheduler, SceneConfig, SceneState, Viewport, compose,
    on_scroll,
};
use skyscroll_input::{PageScroll, ScrollInput};
use skyscroll_render::{DebugTextRenderer, Renderer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyscroll-cli", about = "Headless tools for the skyscroll scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fixed star layout seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective configuration as YAML
    Config,
    /// Compose the scene and describe it
    Describe {
        /// Emit a JSON summary instead of text
        #[arg(long)]
        json: bool,
        /// List every object
        #[arg(long)]
        listing: bool,
        /// Skip texture files; every texture stays pending
        #[arg(long)]
        no_textures: bool,
    },
    /// Scroll the page, then run frames headless
    Simulate {
        /// Frames to run after scrolling
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Lines to scroll before running frames (negative scrolls up)
        #[arg(short, long, default_value = "0")]
        lines: f32,
    },
}

#[derive(Serialize)]
struct MeshSummary {
    name: String,
    position: [f32; 3],
    rotation: [f32; 3],
}

#[derive(Serialize)]
struct SceneSummary {
    seed: u64,
    objects: usize,
    meshes: usize,
    lights: usize,
    stars: usize,
    camera_position: [f32; 3],
    camera_rotation: [f32; 3],
    textures: Vec<(String, String)>,
    animated: Vec<MeshSummary>,
}

impl SceneSummary {
    fn new(state: &SceneState, textures: &[(String, TextureState)]) -> Self {
        let animated = [state.torus(), state.avatar(), state.moon()]
            .into_iter()
            .flatten()
            .map(|mesh| MeshSummary {
                name: mesh.name.clone(),
                position: mesh.transform.position.to_array(),
                rotation: mesh.transform.rotation.to_array(),
            })
            .collect();
        Self {
            seed: state.seed,
            objects: state.scene.len(),
            meshes: state.scene.mesh_count(),
            lights: state.scene.light_count(),
            stars: state.stars.len(),
            camera_position: state.camera.position.to_array(),
            camera_rotation: state.camera.rotation.to_array(),
            textures: textures
                .iter()
                .map(|(name, s)| (name.clone(), format!("{s:?}")))
                .collect(),
            animated,
        }
    }
}

/// Texture states of everything the scene references, labelled by path.
fn texture_states(state: &SceneState) -> Vec<(String, TextureState)> {
    let background = state.scene.background().into_iter();
    let materials = state
        .scene
        .meshes()
        .filter(|(id, _)| *id == state.avatar || *id == state.moon)
        .flat_map(|(_, mesh)| [&mesh.material.map, &mesh.material.normal_map])
        .flatten();
    background
        .chain(materials)
        .map(|h| (h.path().display().to_string(), h.state()))
        .collect()
}

fn viewport(config: &SceneConfig) -> Viewport {
    Viewport::new(config.window.width, config.window.height, 1.0)
}

fn build(
    config: &SceneConfig,
    loader: &dyn TextureLoader,
    renderer: &mut DebugTextRenderer,
) -> SceneState {
    let (state, first_pass) = compose(config, viewport(config), loader, renderer);
    tracing::debug!("initial pass:\n{first_pass}");
    state
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if cli.seed.is_some() {
        config.stars.seed = cli.seed;
    }
    config.validate()?;

    match cli.command {
        Commands::Info => {
            println!("skyscroll-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", skyscroll_scene::crate_info());
            println!("assets: {}", skyscroll_assets::crate_info());
            println!("input: {}", skyscroll_input::crate_info());
            println!("render: {}", skyscroll_render::crate_info());
            println!("composer: {}", skyscroll_composer::crate_info());
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Describe {
            json,
            listing,
            no_textures,
        } => {
            let mut renderer = if listing {
                DebugTextRenderer::listing()
            } else {
                DebugTextRenderer::new()
            };
            let mut state = if no_textures {
                build(&config, &DeferredTextureLoader::new(), &mut renderer)
            } else {
                build(
                    &config,
                    &ImmediateTextureLoader::new(config.assets.dir.clone()),
                    &mut renderer,
                )
            };
            let page = PageScroll::new(config.page, viewport(&config).logical_height());
            on_scroll(&mut state, page.top());

            if json {
                let summary = SceneSummary::new(&state, &texture_states(&state));
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", renderer.render(&state.scene, &state.camera));
            }
        }
        Commands::Simulate { frames, lines } => {
            let mut renderer = DebugTextRenderer::new();
            let mut state = build(&config, &DeferredTextureLoader::new(), &mut renderer);

            let mut page = PageScroll::new(config.page, viewport(&config).logical_height());
            on_scroll(&mut state, page.top());
            if let Some(t) = page.apply(ScrollInput::Lines(lines)) {
                on_scroll(&mut state, t);
                println!("scrolled to t={t}");
            }

            let mut frame_loop = FrameLoop::with_budget(CancellationToken::new(), frames);
            let mut scheduler = ManualScheduler::new();
            let ran = frame_loop.run_until_cancelled(&mut state, &mut scheduler, &mut renderer);

            let summary = SceneSummary::new(&state, &texture_states(&state));
            println!("frames: {ran}");
            println!(
                "camera: position={:?} rotation={:?}",
                summary.camera_position, summary.camera_rotation
            );
            for mesh in &summary.animated {
                println!("{}: rotation={:?}", mesh.name, mesh.rotation);
            }
        }
    }

    Ok(())
}
