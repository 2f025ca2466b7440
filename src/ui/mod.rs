use softbuffer::Surface;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use crate::error::GalleryError;
use crate::loader::{lock, UserEvent};
use crate::ui::render::Canvas;
use crate::ui::state::{PageCommand, PageState};

pub mod layout;
pub mod render;
pub mod state;

const FRAME: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

pub struct App {
    pub state: PageState,
    pub window: Option<Arc<Window>>,
    pub context: Option<softbuffer::Context<Arc<Window>>>,
    pub surface: Option<Surface<Arc<Window>, Arc<Window>>>,
    pub next_redraw: Option<Instant>,
}

impl App {
    pub fn new(state: PageState) -> Self {
        Self {
            state,
            window: None,
            context: None,
            surface: None,
            next_redraw: None,
        }
    }

    fn request_redraw(&self) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn apply(&self, event_loop: &ActiveEventLoop, command: PageCommand) {
        match command {
            PageCommand::Quit => event_loop.exit(),
            PageCommand::Redraw => self.request_redraw(),
            PageCommand::Nothing => {}
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GalleryError> {
        let attrs = Window::default_attributes()
            .with_title("Gallery")
            .with_inner_size(LogicalSize::new(1280u32, 720u32));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = softbuffer::Context::new(Arc::clone(&window))?;
        let surface = Surface::new(&context, Arc::clone(&window))?;

        let size = window.inner_size();
        self.state.set_viewport(size.width, size.height);
        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);
        Ok(())
    }

    fn redraw(&mut self) {
        let (Some(window), Some(surface)) = (self.window.as_ref(), self.surface.as_mut()) else {
            return;
        };
        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        if let Err(e) = surface.resize(w, h) {
            log::error!("Failed to resize surface: {}", e);
            return;
        }
        let now = Instant::now();
        match surface.buffer_mut() {
            Ok(mut buffer) => {
                let mut canvas = Canvas::new(&mut buffer, w.get(), h.get());
                self.state.render(&mut canvas, now);
                if let Err(e) = buffer.present() {
                    log::error!("Failed to present frame: {}", e);
                }
            }
            Err(e) => log::error!("Failed to get frame buffer: {}", e),
        }

        self.next_redraw = self.state.is_animating(now).then(|| now + FRAME);
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("{}", e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::ImageReady(idx) => {
                if self.state.document().displayed == Some(idx) && self.state.lightbox.is_open() {
                    self.request_redraw();
                }
            }
            UserEvent::ThumbnailReady(idx) => {
                let on_screen = self.state.grid().visible(self.state.scroll).contains(&idx);
                let in_modal = self.state.document().displayed == Some(idx);
                if on_screen || in_modal {
                    self.request_redraw();
                }
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
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.state.set_viewport(width, height);
                self.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    let command = self.state.handle_key(&event.logical_key);
                    self.apply(event_loop, command);
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.state.mouse_pos;
                let command = self.state.handle_click(x as f32, y as f32);
                self.apply(event_loop, command);
            }

            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.state.mouse_pos = (x, y);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32 / 40.0,
                };
                let command = self.state.handle_wheel(lines);
                self.apply(event_loop, command);
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(when) = self.next_redraw {
            if Instant::now() >= when {
                self.next_redraw = None;
                self.request_redraw();
            } else {
                event_loop.set_control_flow(ControlFlow::WaitUntil(when));
            }
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let mut cache = lock(&self.state.shared);
        cache.shutdown = true;
        self.state.shared.1.notify_all();
        log::debug!("Shutting down decode workers");
    }
}
