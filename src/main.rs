use anyhow::{anyhow, Context, Result};
use clap::Parser;
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::info;
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, path::PathBuf, sync::Arc, time::Instant};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use glsketch::{
    config::{self, AppConfig},
    render::{pipeline::Renderer, shaders::ShaderProgram},
    scene::SceneState,
    ui::{DebugPanel, PanelAction},
};

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Args {
    /// Config file, defaults to the per-user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Combined shader file, overrides the config
    #[arg(short, long)]
    shader: Option<PathBuf>,
}

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    painter: egui_glow::Painter,
    renderer: Renderer,
    panel: DebugPanel,
    scene: SceneState,
    rotation_speed: f32,
    last_frame: Instant,
}

impl App {
    fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .max_by_key(|config| config.num_samples())
                    .expect("glutin always offers at least one config")
            })
            .map_err(|e| anyhow!("Failed to create window: {e}"))?;

        let window = window.context("Display builder returned no window")?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .context("Failed to create OpenGL context")?
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .context("Failed to create GL surface")?
        };

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        let interval = if config.window.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            log::warn!("Failed to set swap interval: {}", e);
        }

        // Load OpenGL functions
        let proc_address = |symbol: &str| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()),
            Err(_) => std::ptr::null(),
        };
        gl::load_with(|symbol| proc_address(symbol) as *const _);
        let glow_context =
            Arc::new(unsafe { glow::Context::from_loader_function(|s| proc_address(s)) });

        let size = window.inner_size();
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }

        let program = ShaderProgram::from_file(&config.shader.path)
            .with_context(|| format!("Failed to build shader program from {:?}", config.shader.path))?;
        let renderer = Renderer::new(program, &config.scene.geometry);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &event_loop,
            Some(window.scale_factor() as f32),
            None,
        );
        let painter = egui_glow::Painter::new(glow_context, "", None)
            .map_err(|e| anyhow!("Failed to create egui painter: {e}"))?;

        info!("Window ready ({}x{})", size.width, size.height);

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                egui_ctx,
                egui_winit,
                painter,
                renderer,
                panel: DebugPanel::new(),
                scene: SceneState::default(),
                rotation_speed: config.scene.rotation_speed,
                last_frame: Instant::now(),
            },
            event_loop,
        ))
    }

    /// Returns `true` when the application should exit.
    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let response = self.egui_winit.on_window_event(&self.window, event);
        if response.repaint {
            self.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    self.gl_surface.resize(&self.gl_context, width, height);
                    self.renderer.resize(size.width, size.height);
                }
                false
            }
            WindowEvent::RedrawRequested => self.redraw() == PanelAction::Exit,
            _ => false,
        }
    }

    fn redraw(&mut self) -> PanelAction {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.scene.advance(dt, self.rotation_speed);

        let size = self.window.inner_size();
        let aspect = size.width as f32 / size.height.max(1) as f32;
        self.renderer.draw(&self.scene, aspect);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let mut action = PanelAction::None;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            action = self.panel.show(ctx, &mut self.scene);
        });

        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let clipped_primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            full_output.pixels_per_point,
            &clipped_primitives,
            &full_output.textures_delta,
        );

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::error!("Failed to swap buffers: {}", e);
        }

        action
    }

    fn cleanup(&mut self) {
        info!("Shutting down");
        self.painter.destroy();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => config::load_or_create_config().context("Failed to load config")?,
    };
    if let Some(shader) = args.shader {
        config.shader.path = shader;
    }

    SimpleLogger::new().with_level(config.log_level()).init()?;
    info!("Starting with shader {:?}", config.shader.path);

    let (mut app, event_loop) = App::new(&config)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => {
            if app.handle_window_event(&event) {
                app.cleanup();
                elwt.exit();
            }
        }
        Event::AboutToWait => {
            app.window.request_redraw();
        }
        _ => (),
    })?;

    Ok(())
}
