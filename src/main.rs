//! OceanVisuo - audio-reactive ocean and sky
//!
//! A rough sphere floats above an animated sea; the loudest low band pushes
//! it outward and the high band roughens its surface.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use oceanvisuo::cli::Args;
use oceanvisuo::frame_loop::FrameLoop;
use oceanvisuo::params::RenderConfig;
use oceanvisuo::rendering::{FrameView, MeshUniforms, RenderSystem};
use oceanvisuo::sky::{sun_direction, SkyUniforms};
use oceanvisuo::visualizer::{SceneParams, Visualizer};

/// How often the title's fps readout refreshes
const TITLE_REFRESH: Duration = Duration::from_secs(1);

/// Pixels of trackpad scroll per wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    render_config: RenderConfig,

    // Scene, driven one tick per redraw
    frame_loop: FrameLoop<Visualizer>,

    // Input
    dragging: bool,
    cursor: Option<(f64, f64)>,

    // Title bar
    status: Option<String>,
    last_title_refresh: Instant,
}

impl App {
    fn new(args: Args) -> anyhow::Result<Self> {
        let visualizer =
            Visualizer::new(SceneParams::default()).context("invalid scene parameters")?;

        let mut app = Self {
            window: None,
            render_system: None,
            render_config: RenderConfig::default(),
            frame_loop: FrameLoop::new(visualizer),
            dragging: false,
            cursor: None,
            status: None,
            last_title_refresh: Instant::now(),
        };

        if let Some(path) = args.audio.as_deref() {
            app.load_file(path);
        }
        Ok(app)
    }

    /// Start playing `path`; a rejected file leaves the current session alone
    fn load_file(&mut self, path: &Path) {
        match self.frame_loop.handler_mut().load_audio(path) {
            Ok(()) => {
                info!("Now playing {}", path.display());
                self.status = None;
            }
            Err(e) => {
                error!("Rejected {}: {}", path.display(), e);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.status = Some(format!("cannot play {name}"));
            }
        }
        self.refresh_title();
    }

    fn title(&self) -> String {
        let mut title = self.frame_loop.handler().title();
        if let Some(status) = &self.status {
            title.push_str(&format!(" ({status})"));
        }
        let stats = self.frame_loop.stats();
        if stats.frames > 0 {
            title.push_str(&format!(" | {:.0} fps", stats.fps));
        }
        title
    }

    fn refresh_title(&mut self) {
        if let Some(window) = &self.window {
            window.set_title(&self.title());
        }
        self.last_title_refresh = Instant::now();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.frame_loop.tick() {
            event_loop.exit();
            return;
        }

        self.render_frame(event_loop);

        if self.last_title_refresh.elapsed() >= TITLE_REFRESH {
            let stats = self.frame_loop.stats();
            debug!(
                "{} frames, {} skipped, {:.1} fps",
                stats.frames, stats.skipped, stats.fps
            );
            self.refresh_title();
        }
    }

    /// Upload the scene the last tick produced and draw it
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };
        let vis = self.frame_loop.handler();

        let (view_proj, camera_pos) = vis.camera.create_view_proj_matrix(&self.render_config);
        let view = FrameView {
            view_proj,
            camera_pos,
            sun_direction: sun_direction(vis.sky.elevation_deg, vis.sky.azimuth_deg),
            exposure: self.render_config.exposure,
        };

        let water_params = &vis.ocean.params;
        let water = MeshUniforms::water(
            &view,
            vis.ocean.time_s(),
            water_params.distortion_scale,
            water_params.water_color,
        );
        let sphere =
            MeshUniforms::solid(&view, vis.sphere.model_matrix(), vis.sphere.params().color);
        let sky = SkyUniforms::new(
            &vis.sky,
            view_proj.inverse().to_cols_array_2d(),
            camera_pos,
            self.render_config.exposure,
        );

        render_system.update_water_vertices(&vis.ocean.surface.mesh.vertices);
        render_system.update_sphere_vertices(&vis.sphere.mesh.vertices);
        render_system.update_uniforms(&water, &sphere, &sky);

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
                warn!("Surface lost or outdated, reconfigured");
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("Dropped frame: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // One redraw request per frame
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.render_config.window_width = size.width;
        self.render_config.window_height = size.height;

        let vis = self.frame_loop.handler();
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &vis.ocean.surface.mesh,
            &vis.sphere.mesh,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("Failed to initialise renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        info!("OceanVisuo is running. Drop an audio file on the window, ESC quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.render_config.window_width = size.width;
                self.render_config.window_height = size.height;
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::DroppedFile(path) => self.load_file(&path),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some((x, y))) = (self.dragging, self.cursor) {
                    let camera = &mut self.frame_loop.handler_mut().camera;
                    camera.rotate((position.x - x) as f32, (position.y - y) as f32);
                }
                self.cursor = Some((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.frame_loop.handler_mut().camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    info!("OceanVisuo - audio-reactive ocean and sky");

    let mut app = App::new(args)?;
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("event loop exited with an error")?;
    Ok(())
}
