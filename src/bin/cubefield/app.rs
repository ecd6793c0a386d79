use glutin::config::{Config as DisplayConfig, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::{c_char, CStr, CString};
use std::num::NonZeroU32;
use std::path::PathBuf;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{
    DeviceEvent, ElementState, Event, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use gl_wrapper::program::ProgramError;
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::TextureError;
use gl_wrapper::vertex_array::VertexArrayError;
use gl_wrapper::GlError;

use cubefield::camera::{CameraController, Movement};
use cubefield::config::Config;
use cubefield::frame::FrameTimer;

use crate::scene::CubeField;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    renderer: GlRenderer,
    field: CubeField,
    camera: CameraController,
    config: Config,
}

impl App {
    pub fn new(config: Config, shader: Option<PathBuf>) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.window.width,
                config.window.height,
            )))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title(&config.window.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .max_by_key(|c| c.depth_size())
                    .expect("display offers no framebuffer configs")
            })
            .map_err(|e| AppError::Window(e.to_string()))?;

        let window = window.ok_or_else(|| AppError::Window(String::from("no window created")))?;
        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        log::info!("OpenGL {}", gl_string(gl::VERSION));
        log::info!("Renderer {}", gl_string(gl::RENDERER));

        if config.window.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = gl_window.surface.set_swap_interval(&gl_context, interval) {
                log::warn!("Could not enable vsync: {e}");
            }
        }

        gl_window.grab_cursor();

        let renderer = GlRenderer::new();
        renderer.enable_depth_test()?;
        let (width, height): (u32, u32) = gl_window.window.inner_size().into();
        renderer.resize(width, height)?;

        let field = CubeField::new(&config.scene, shader.as_deref())?;
        let camera = config.camera.controller();

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            renderer,
            field,
            camera,
            config,
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            gl_context,
            gl_window,
            mut renderer,
            field,
            mut camera,
            config,
        } = self;

        let mut field = Some(field);
        let mut keys = ActiveKeys::default();
        let mut focused = true;
        let mut timer = FrameTimer::new();
        let mut size: (u32, u32) = gl_window.window.inner_size().into();
        let [r, g, b] = config.scene.clear_color;

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::MainEventsCleared => {
                    let elapsed = timer.tick();
                    keys.apply(&mut camera, elapsed);
                    gl_window.window.request_redraw();
                }
                Event::RedrawRequested(_) => {
                    let Some(field) = &field else {
                        return;
                    };

                    let aspect_ratio = size.0 as f32 / size.1.max(1) as f32;
                    let frame = renderer
                        .clear(r, g, b)
                        .and_then(|_| field.draw(&mut renderer, &camera, aspect_ratio));

                    if let Err(e) = frame {
                        log::error!("Frame failed: {e}");
                        control_flow.set_exit();
                        return;
                    }

                    if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                        log::error!("Could not present frame: {e}");
                        control_flow.set_exit();
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(new_size) => {
                        if let (Some(w), Some(h)) = (
                            NonZeroU32::new(new_size.width),
                            NonZeroU32::new(new_size.height),
                        ) {
                            gl_window.surface.resize(&gl_context, w, h);
                            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                                log::error!("{e}");
                            }
                            size = (new_size.width, new_size.height);
                        }
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        let pressed = input.state == ElementState::Pressed;
                        match input.virtual_keycode {
                            Some(VirtualKeyCode::Escape) => control_flow.set_exit(),
                            Some(key) => keys.set(key, pressed),
                            None => {}
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let lines = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => (pos.y / 20.0) as f32,
                        };
                        camera.process_scroll(lines);
                    }
                    WindowEvent::Focused(now_focused) => {
                        focused = now_focused;
                        if !focused {
                            keys = ActiveKeys::default();
                            camera.reset_pointer();
                        }
                    }
                    WindowEvent::CloseRequested => control_flow.set_exit(),
                    _ => (),
                },
                // The cursor is confined, so look around with raw motion; its
                // window position stops changing at the edges.
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta },
                    ..
                } if focused => camera.process_pointer_motion(delta.0, delta.1),
                Event::LoopDestroyed => {
                    // The context is still current here, after this it is gone.
                    field.take();
                    log::info!("Released GPU resources");
                }
                _ => (),
            }
        })
    }
}

fn gl_string(name: u32) -> String {
    let Ok(ptr) = gl_wrapper::checked("glGetString(name)", || unsafe { gl::GetString(name) })
    else {
        return String::from("<unknown>");
    };

    if ptr.is_null() {
        return String::from("<unknown>");
    }

    unsafe { CStr::from_ptr(ptr as *const c_char) }
        .to_string_lossy()
        .into_owned()
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &DisplayConfig) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }

    fn grab_cursor(&self) {
        let grab = self
            .window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked));

        if let Err(e) = grab {
            log::warn!("Could not grab cursor: {e}");
        }

        self.window.set_cursor_visible(false);
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not create window: {0}")]
    Window(String),
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::error::Error),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    VertexArray(#[from] VertexArrayError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Gl(#[from] GlError),
}

/// Movement keys currently held down.
#[derive(Default)]
pub struct ActiveKeys {
    w: bool,
    a: bool,
    s: bool,
    d: bool,
}

impl ActiveKeys {
    fn set(&mut self, key: VirtualKeyCode, pressed: bool) {
        match key {
            VirtualKeyCode::W => self.w = pressed,
            VirtualKeyCode::A => self.a = pressed,
            VirtualKeyCode::S => self.s = pressed,
            VirtualKeyCode::D => self.d = pressed,
            _ => {}
        }
    }

    fn apply(&self, camera: &mut CameraController, elapsed_secs: f32) {
        let held = [
            (self.w, Movement::Forward),
            (self.s, Movement::Backward),
            (self.a, Movement::Left),
            (self.d, Movement::Right),
        ];

        for (_, movement) in held.into_iter().filter(|(down, _)| *down) {
            camera.process_keyboard(movement, elapsed_secs);
        }
    }
}
