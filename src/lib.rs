//! Interactive separating axis test.
//!
//! A white rectangle steered with the arrow keys, and a square spinning in
//! the middle of the window that turns red whenever the rectangle or the
//! mouse cursor touches it.

pub mod config;
mod frame_timer;
mod renderer;
pub mod scene;
mod wgpu_context;

use cfg_if::cfg_if;
use config::Config;
use frame_timer::{FrameTimer, TickClock};
use log::{debug, error, info, trace, warn, LevelFilter};
use renderer::Renderer;
use sat_core::P2;
use scene::{Direction, Scene};
use std::sync::Arc;
use wgpu::SurfaceConfiguration;
use wgpu_context::{FutureWgpuContext, WgpuContext};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    error::EventLoopError,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Run the application.
///
/// This is the main entry point for native builds and the **WASM32** entry
/// point. It tries to run the app, and panics if unable to do so.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn run() {
    run_app().unwrap(); // Panic on error (intentional).
}

/// Run the application.
///
/// Sets up logging and the winit event loop, and runs the `App` with it.
fn run_app() -> Result<(), EventLoopError> {
    let app = App::default();
    init_logger(app.config.log_level);

    let event_loop = EventLoop::builder().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            // Spawning returns immediately instead of using exceptions for
            // control flow.
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
            Ok(())
        } else {
            let mut app = app;
            event_loop.run_app(&mut app)
        }
    }
}

#[derive(Debug)]
pub struct App {
    config: Config,
    /// Shapes and their collision state.
    scene: Scene,
    /// Measures wall-clock time between frames.
    frame_timer: Option<FrameTimer>,
    /// Turns wall-clock time into simulation ticks.
    tick_clock: TickClock,
    /// The Application's winit window.
    window: Option<Arc<Window>>,
    /// WGPU context - has async setup.
    wgpu_context: Option<FutureWgpuContext>,
    /// Flag to indicate whether all WGPU setup has finished.
    extra_wgpu_setup_completed: bool,
    /// Surface configuration for WGPU.
    surface_configuration: Option<SurfaceConfiguration>,
    /// Polygon renderer.
    renderer: Option<Renderer>,
}

impl Default for App {
    fn default() -> Self {
        App::new(Config::default())
    }
}

impl App {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            const CANVAS_ID: &str = "sat-testing-host-canvas";
            const BACKENDS: wgpu::Backends = wgpu::Backends::BROWSER_WEBGPU;
        } else {
            const BACKENDS: wgpu::Backends = wgpu::Backends::PRIMARY;
        }
    }

    pub fn new(config: Config) -> Self {
        App {
            scene: Scene::new(&config),
            tick_clock: TickClock::new(config.tick_period),
            config,
            frame_timer: None,
            window: None,
            wgpu_context: None,
            extra_wgpu_setup_completed: false,
            surface_configuration: None,
            renderer: None,
        }
    }

    /// Return a reference to the application window, incrementing its
    /// reference count.
    ///
    /// # Panics
    ///
    /// - If called before [`App::resumed`] created the window.
    fn window(&self) -> Arc<Window> {
        self.window
            .clone()
            .expect("App::resumed must have created the window.")
    }

    /// Fetches the WGPU context, making the assumption it is available.
    ///
    /// # Panics
    ///
    /// - If the `WgpuContext` is not available.
    fn wgpu_context(&self) -> &WgpuContext {
        self.wgpu_context
            .as_ref()
            .and_then(|ctx| ctx.ready().ok().flatten())
            .expect("WgpuContext was not (yet) available.")
    }

    /// Choose the surface configuration for rendering.
    ///
    /// This must be called after the WGPU context is available.
    fn choose_surface_configuration(&mut self) {
        let ctx = self.wgpu_context();
        let surface_caps = ctx.surface().get_capabilities(ctx.adapter());

        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or_else(|| {
                warn!(
                    "Could not select sRGB surface format. Falling back to \
                     first format available."
                );
                surface_caps.formats[0]
            });
        trace!("Surface format: {:?}", surface_format);

        let size = self.window().inner_size();
        let surface_configuration = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        self.surface_configuration = Some(surface_configuration);
        trace!("Chose surface configuration.");
    }

    /// Create the polygon renderer.
    fn create_renderer(&mut self) {
        let (Some(surface_configuration), Some(ctx)) = (
            self.surface_configuration.as_ref(),
            self.wgpu_context.as_ref().and_then(|c| c.ready().ok().flatten()),
        ) else {
            return;
        };
        let renderer = Renderer::new(
            ctx.device(),
            surface_configuration.format,
            self.config.window_width,
            self.config.window_height,
            self.config.background_color,
        );
        self.renderer = Some(renderer);
    }

    /// Configure the surface post-resize. This sets the size of the surface.
    ///
    /// The scene keeps its own coordinates; it is stretched over whatever
    /// size the surface has.
    fn resize(&mut self) {
        // The window might be resized before WGPU setup has finished. If so,
        // just bail.
        if !self.extra_wgpu_setup_completed {
            return;
        }
        let size = self.window().inner_size();
        if size.width > 0 && size.height > 0 {
            if let Some(cfg) = self.surface_configuration.as_mut() {
                cfg.width = size.width;
                cfg.height = size.height;
            }
            if let Some(cfg) = self.surface_configuration.as_ref() {
                let ctx = self.wgpu_context();
                ctx.surface().configure(ctx.device(), cfg);
            }
        }
        trace!("Configured surface size: {:?}", size);
    }

    /// Finish the WGPU static setup.
    ///
    /// This should be called from the event loop until the `WgpuContext` has
    /// finished its async setup.
    fn finish_wgpu_static_setup(&mut self, event_loop: &ActiveEventLoop) {
        let Some(future_context) = self.wgpu_context.as_ref() else {
            return;
        };
        let ready = match future_context.ready() {
            Ok(context) => context.is_some(),
            Err(graphics_error) => {
                error!("{}", graphics_error);
                event_loop.exit();
                return;
            }
        };

        if ready {
            self.choose_surface_configuration();
            self.create_renderer();
            self.frame_timer = Some(FrameTimer::new());
            self.extra_wgpu_setup_completed = true;
            self.resize();
            debug!("WGPU setup completed.");
        }
        // Either draw the first frame, or try the setup again on the next
        // one.
        self.window().request_redraw();
    }

    /// Advance the simulation by the wall-clock time since the last frame.
    fn simulate(&mut self) {
        let Some(frame_timer) = self.frame_timer.as_mut() else {
            return;
        };
        let ticks = self.tick_clock.advance(frame_timer.tick());
        self.scene.run(ticks);
        trace!(
            "Simulated {} ticks, {:?} carried over",
            ticks,
            self.tick_clock.remainder()
        );
    }

    /// Render a single frame.
    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        let Some(ctx) = self
            .wgpu_context
            .as_ref()
            .and_then(|c| c.ready().ok().flatten())
        else {
            return Ok(());
        };
        let device = ctx.device();
        let queue = ctx.queue();

        // get_current_texture will block when in FIFO present mode.
        let output_texture = ctx.surface().get_current_texture()?;
        let view = output_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Only queue polygons once there is a texture to draw them into.
        renderer.begin_frame();
        renderer.fill_polygon(self.scene.player_vertices(), self.config.player_color);
        renderer.fill_polygon(self.scene.spinner_vertices(), self.scene.spinner_color());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Command Encoder"),
        });
        renderer.render(device, &mut encoder, queue, &view);

        queue.submit(std::iter::once(encoder.finish()));
        output_texture.present();

        Ok(())
    }

    /// Redraw the window: simulate, render a frame and handle any errors.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Bail if setup has not completed.
        if !self.extra_wgpu_setup_completed {
            return;
        }

        self.simulate();

        use wgpu::SurfaceError::{Lost, OutOfMemory, Outdated, Timeout};
        match self.render() {
            Ok(()) => {}
            Err(Lost) | Err(Outdated) => self.resize(),
            Err(Timeout) => warn!("Surface timeout"),
            Err(OutOfMemory) => {
                error!("OutOfMemory");
                event_loop.exit();
            }
        }

        // Request a new redraw after this one.
        self.window().request_redraw();
    }

    fn handle_keyboard_input(&mut self, event_loop: &ActiveEventLoop, key_event: &KeyEvent) {
        let PhysicalKey::Code(keycode) = key_event.physical_key else {
            return;
        };
        match (key_event.state, keycode) {
            (ElementState::Pressed, KeyCode::Escape | KeyCode::KeyQ) => event_loop.exit(),
            (state, keycode) => match (state, direction_for(keycode)) {
                (ElementState::Pressed, Some(direction)) => self.scene.press(direction),
                (ElementState::Released, Some(direction)) => self.scene.release(direction),
                (_, None) => trace!("Ignored keycode: {:?}", keycode),
            },
        }
    }

    /// Maps a cursor position in window pixels to scene coordinates.
    fn cursor_to_scene(&self, position: PhysicalPosition<f64>) -> P2 {
        let size = self.window().inner_size();
        window_to_scene(position, size, &self.config)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut attributes = Window::default_attributes();
        #[cfg(not(target_arch = "wasm32"))]
        {
            attributes = attributes
                .with_title(self.config.title)
                .with_inner_size(PhysicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ))
                .with_resizable(false);
        }
        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;
            attributes = attributes.with_canvas(get_canvas(App::CANVAS_ID));
        }

        // Create the window, and launch async WGPU setup.
        match event_loop.create_window(attributes) {
            Err(os_error) => {
                panic!("Could not create window: {:?}", os_error)
            }
            Ok(window) => {
                let window = Arc::new(window);
                self.window = Some(window.clone());
                self.wgpu_context = Some(create_wgpu_context(window));
                info!(
                    "Window created; arrow keys move the rectangle, Escape or Q quits."
                );
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if !self.extra_wgpu_setup_completed {
            self.finish_wgpu_static_setup(event_loop);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_) => self.resize(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_keyboard_input(event_loop, &event)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = self.cursor_to_scene(position);
                self.scene.set_cursor(Some(cursor));
            }
            WindowEvent::CursorLeft { .. } => self.scene.set_cursor(None),
            _ => (),
        }
    }
}

/// Arrow key to movement direction.
fn direction_for(keycode: KeyCode) -> Option<Direction> {
    match keycode {
        KeyCode::ArrowLeft => Some(Direction::Left),
        KeyCode::ArrowRight => Some(Direction::Right),
        KeyCode::ArrowUp => Some(Direction::Up),
        KeyCode::ArrowDown => Some(Direction::Down),
        _ => None,
    }
}

/// Scales a position in a window of `size` pixels to the scene's
/// coordinates.
fn window_to_scene(
    position: PhysicalPosition<f64>,
    size: PhysicalSize<u32>,
    config: &Config,
) -> P2 {
    let sx = config.window_width as f64 / size.width.max(1) as f64;
    let sy = config.window_height as f64 / size.height.max(1) as f64;
    P2::new(position.x * sx, position.y * sy)
}

/// Create the WGPU context.
///
/// This launches the creation of the async parts of the WGPU context. The
/// [`FutureWgpuContext`] is polled from the event loop to see when WGPU is
/// ready.
fn create_wgpu_context(window: Arc<Window>) -> FutureWgpuContext {
    let instance_descriptor = wgpu::InstanceDescriptor {
        backends: App::BACKENDS,
        ..Default::default()
    };
    let request_adapter_options = wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None, // filled in by `FutureWgpuContext`
        force_fallback_adapter: false,
    };
    let device_descriptor = wgpu::DeviceDescriptor {
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        label: Some("Device Descriptor"),
        memory_hints: Default::default(),
    };

    FutureWgpuContext::new(
        window,
        instance_descriptor,
        request_adapter_options,
        device_descriptor,
    )
}

/// Get the HTML canvas element named `canvas_id` on the **WASM32** platform.
///
/// # Returns
///
/// Canvas as an `Option<HtmlCanvasElement>`. `None` indicates that the canvas
/// could not be found.
#[cfg(target_arch = "wasm32")]
fn get_canvas(canvas_id: &str) -> Option<wgpu::web_sys::HtmlCanvasElement> {
    use wgpu::web_sys;
    let window: web_sys::Window = web_sys::window()?;
    let document: web_sys::Document = window.document()?;
    let element: web_sys::Element = document.get_element_by_id(canvas_id)?;
    let canvas: web_sys::HtmlCanvasElement =
        element.dyn_into::<web_sys::HtmlCanvasElement>().ok()?;
    Some(canvas)
}

/// Initializes the logger in a platform-dependent way.
///
/// - **WASM32 (WebAssembly):** Uses `console_log`.
/// - **Native Platforms:** Uses `env_logger`.
///
/// # Parameters
///
/// - `level_filter`: The logging level to be applied globally. If this is
///   not set, then default logging levels are used.
///
/// # Panics
///
/// - On **WASM32**, the function will panic if the `console_log` fails to
///   initialize.
fn init_logger(level_filter: Option<LevelFilter>) {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let opt_logger = match level_filter {
                None => console_log::init(),
                Some(level_filt) => {
                    let level = level_filt.to_level().unwrap_or(log::Level::Warn);
                    console_log::init_with_level(level)
                }
            };
            opt_logger.expect("Could not initialize WASM32 logger.")
        } else {
            let mut builder = env_logger::Builder::from_default_env();
            if let Some(level) = level_filter {
                builder.filter_level(level);
            }
            builder.init()
        }
    }
}
