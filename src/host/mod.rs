//! Windowed reference host.
//!
//! Opens a winit window, drives a [`NavigationEngine`] from the frame loop and
//! draws its vertices with [`Renderer`]. Navigation requests are only logged;
//! an application would route them instead.
//!
//! Controls: move the mouse to tilt and hover, swipe horizontally to rotate,
//! click a word to open it, arrow keys rotate, `[` and `]` are the prev/next
//! buttons, Enter opens the front section, Escape quits.

mod renderer;

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::EngineConfig;
use crate::engine::{NavigationEngine, Navigator};
use crate::error::HostError;
use crate::input::InputTranslator;
use crate::interaction::InteractionEvent;
use crate::section::SectionId;
use crate::time::FrameClock;

pub use renderer::Renderer;

/// Navigator that logs each request.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate_to(&mut self, section: SectionId) {
        log::info!("Navigation requested: {} ({})", section, section.route());
    }
}

/// Open a window and run until it is closed.
pub fn run(config: EngineConfig) -> Result<(), HostError> {
    let engine = NavigationEngine::new(config, LoggingNavigator)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(engine);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Window title for the current indicator label.
fn window_title(label: &str) -> String {
    format!("Particle Navigation - Navigate: {}", label)
}

struct App {
    engine: NavigationEngine,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    input: InputTranslator,
    clock: FrameClock,
    title_label: &'static str,
    error: Option<HostError>,
}

impl App {
    fn new(engine: NavigationEngine) -> Self {
        Self {
            engine,
            window: None,
            renderer: None,
            input: InputTranslator::new(),
            clock: FrameClock::new(),
            title_label: "",
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: HostError) {
        log::error!("{}", error);
        self.error = Some(error);
        self.engine.unmount();
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.update();
        self.engine.tick(dt);

        for event in self.engine.drain_events() {
            log::debug!("{:?}", event);
        }

        let label = self.engine.indicator_label();
        if label != self.title_label {
            self.title_label = label;
            if let Some(window) = &self.window {
                window.set_title(&window_title(label));
            }
        }

        if let Some(renderer) = &mut self.renderer {
            match renderer.render(&self.engine) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("Surface lost, reconfiguring");
                    renderer.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
        if self.clock.frame() % 600 == 0 {
            log::debug!("{:.1} fps", self.clock.fps());
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.engine.config().camera.viewport;
        let window_attrs = Window::default_attributes()
            .with_title(window_title(self.engine.indicator_label()))
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        let renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        self.engine.mount();
        let size = window.inner_size();
        self.engine.handle_event(InteractionEvent::Resized {
            width: size.width,
            height: size.height,
        });
        self.clock = FrameClock::new();

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(translated) = self.input.translate(&event) {
            self.engine.handle_event(translated);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.engine.unmount();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed =>
            {
                self.engine.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine.unmount();
    }
}
