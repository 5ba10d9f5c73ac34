use anyhow::Result;
use clap::Parser;
use skyscroll_assets::ThreadedTextureLoader;
use skyscroll_composer::{
    CancellationToken, FrameLoop, FrameOutcome, FrameScheduler, SceneConfig, SceneState,
    Viewport, compose, on_scroll,
};
use skyscroll_input::{PageScroll, ScrollInput};
use skyscroll_render_wgpu::GpuContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "skyscroll-desktop", about = "Scroll-driven 3D scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the texture files
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Fixed star layout seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Requests the next frame from the window system.
struct WindowScheduler<'a>(&'a Window);

impl FrameScheduler for WindowScheduler<'_> {
    fn schedule_next(&mut self) {
        self.0.request_redraw();
    }
}

/// Everything that exists once the window is up.
struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    state: SceneState,
    page: PageScroll,
}

struct App {
    config: SceneConfig,
    frames: FrameLoop,
    running: Option<Running>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        Self {
            config,
            frames: FrameLoop::new(CancellationToken::new()),
            running: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let pixel_ratio = window.scale_factor();
        let mut gpu = GpuContext::new(
            window.clone(),
            size.width,
            size.height,
            pixel_ratio as f32,
        )?;

        let viewport = Viewport::new(size.width, size.height, pixel_ratio);
        let loader = ThreadedTextureLoader::new(self.config.assets.dir.clone());
        let (mut state, first_pass) = compose(&self.config, viewport, &loader, &mut gpu);
        if let Err(e) = first_pass {
            tracing::warn!("initial render failed: {e}");
        }

        let page = PageScroll::new(self.config.page, viewport.logical_height());
        on_scroll(&mut state, page.top());

        Ok(Running {
            window,
            gpu,
            state,
            page,
        })
    }

    fn scroll(&mut self, input: ScrollInput) {
        let Some(running) = &mut self.running else {
            return;
        };
        if let Some(t) = running.page.apply(input) {
            on_scroll(&mut running.state, t);
            running.window.request_redraw();
        }
    }
}

fn key_scroll(key: KeyCode) -> Option<ScrollInput> {
    match key {
        KeyCode::ArrowDown => Some(ScrollInput::Lines(1.0)),
        KeyCode::ArrowUp => Some(ScrollInput::Lines(-1.0)),
        KeyCode::PageDown | KeyCode::Space => Some(ScrollInput::PageDown),
        KeyCode::PageUp => Some(ScrollInput::PageUp),
        KeyCode::Home => Some(ScrollInput::Home),
        KeyCode::End => Some(ScrollInput::End),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.frames.token().cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let track = self.config.window.track_resize;
                if let Some(running) = &mut self.running {
                    running.gpu.resize(new_size.width, new_size.height);
                    if track {
                        running
                            .state
                            .camera
                            .set_viewport(new_size.width, new_size.height);
                        let viewport = Viewport::new(
                            new_size.width,
                            new_size.height,
                            running.window.scale_factor(),
                        );
                        running.page.set_viewport_height(viewport.logical_height());
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let input = match delta {
                    MouseScrollDelta::LineDelta(_, y) => ScrollInput::Lines(-y),
                    MouseScrollDelta::PixelDelta(p) => {
                        let scale = self
                            .running
                            .as_ref()
                            .map_or(1.0, |r| r.window.scale_factor());
                        ScrollInput::Pixels((-p.y / scale) as f32)
                    }
                };
                self.scroll(input);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(input) = key_scroll(key) {
                    self.scroll(input);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(running) = &mut self.running else {
                    return;
                };
                let mut scheduler = WindowScheduler(&running.window);
                match self
                    .frames
                    .run_frame(&mut running.state, &mut scheduler, &mut running.gpu)
                {
                    FrameOutcome::Rendered(Err(e)) => tracing::error!("frame failed: {e}"),
                    FrameOutcome::Rendered(Ok(())) => {}
                    FrameOutcome::Stopped => event_loop.exit(),
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(dir) = cli.assets {
        config.assets.dir = dir;
    }
    if cli.seed.is_some() {
        config.stars.seed = cli.seed;
    }
    config.validate()?;

    tracing::info!("skyscroll-desktop v{}", env!("CARGO_PKG_VERSION"));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
