use super::collection::{GalleryImage, ImageCollection};
use super::input::{route, Action, Input, JumpTarget};
use super::state::{LightboxState, Phase, Transition};
use super::surface::{Controls, ModalSurface};

/// Owns the lightbox state and applies its transitions to a surface.
///
/// An empty collection yields a disabled controller: no input is routed and
/// every operation returns [`Transition::Unchanged`].
pub struct LightboxController<S: ModalSurface> {
    collection: ImageCollection,
    state: LightboxState,
    surface: S,
    controls: Controls,
    enabled: bool,
}

impl<S: ModalSurface> LightboxController<S> {
    pub fn new(collection: ImageCollection, surface: S, controls: Controls) -> Self {
        let enabled = !collection.is_empty();
        if !enabled {
            log::debug!("[lightbox] no selectable images, controller disabled");
        }
        Self {
            state: LightboxState::new(collection.len()),
            collection,
            surface,
            controls,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.enabled.then(|| self.state.current_index())
    }

    /// The image on display, if the modal is open.
    pub fn current_image(&self) -> Option<&GalleryImage> {
        if !self.is_open() {
            return None;
        }
        self.collection.get(self.state.current_index())
    }

    pub fn collection(&self) -> &ImageCollection {
        &self.collection
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn state(&self) -> &LightboxState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn open(&mut self, index: i64) -> Transition {
        self.run(|s| s.open(index))
    }

    pub fn show_next(&mut self) -> Transition {
        self.run(LightboxState::show_next)
    }

    pub fn show_previous(&mut self) -> Transition {
        self.run(LightboxState::show_previous)
    }

    pub fn close(&mut self) -> Transition {
        self.run(LightboxState::close)
    }

    pub fn jump_to(&mut self, index: i64) -> Transition {
        self.run(|s| s.jump_to(index))
    }

    /// Route one input through the dispatch table and perform the result.
    ///
    /// Returns `true` when the lightbox claimed the input. Unclaimed input
    /// belongs to the host.
    pub fn handle(&mut self, input: Input) -> bool {
        if !self.enabled {
            return false;
        }
        match route(input, self.state.phase(), self.controls) {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }

    pub fn perform(&mut self, action: Action) -> Transition {
        match action {
            Action::Open(index) => self.open(i64::try_from(index).unwrap_or(i64::MAX)),
            Action::ShowNext => self.show_next(),
            Action::ShowPrevious => self.show_previous(),
            Action::Close => self.close(),
            Action::JumpTo(JumpTarget::First) => self.jump_to(0),
            Action::JumpTo(JumpTarget::Last) => self.jump_to(self.state.last_index() as i64),
        }
    }

    fn run(&mut self, op: impl FnOnce(&mut LightboxState) -> Transition) -> Transition {
        if !self.enabled {
            return Transition::Unchanged;
        }
        let transition = op(&mut self.state);
        self.apply(transition);
        transition
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Opened { index } => {
                log::debug!("[lightbox] open at {}", index);
                self.show(index);
                self.surface.set_modal_visible(true);
                self.surface.set_scroll_locked(true);
                self.surface.play_open_transition();
            }
            Transition::Moved { from, to } => {
                log::debug!("[lightbox] move {} -> {}", from, to);
                self.show(to);
            }
            Transition::Closed => {
                log::debug!("[lightbox] close");
                self.surface.set_modal_visible(false);
                self.surface.set_scroll_locked(false);
            }
            Transition::Unchanged => {}
        }
    }

    fn show(&mut self, index: usize) {
        if let Some(image) = self.collection.get(index) {
            self.surface.show_image(index, image);
        }
    }
}
