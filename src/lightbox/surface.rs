use super::collection::GalleryImage;

/// The environment a lightbox controller drives.
///
/// A host implements this over whatever it draws with: the modal container,
/// the image display target and the document's scroll lock. The controller
/// only ever calls these in response to a state transition, so a host never
/// has to compare flags against the controller itself.
pub trait ModalSurface {
    /// Show `image` (source and accessible label) in the display target.
    fn show_image(&mut self, index: usize, image: &GalleryImage);

    /// Toggle the "modal open" visibility marker.
    fn set_modal_visible(&mut self, visible: bool);

    /// Toggle the "scroll locked" marker on the background document.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Start the "just opened" transition. Not called on navigation.
    fn play_open_transition(&mut self) {}
}

/// Optional controls the host provides on the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub close: bool,
    pub next: bool,
    pub previous: bool,
}

impl Controls {
    pub const ALL: Controls = Controls {
        close: true,
        next: true,
        previous: true,
    };

    pub const NONE: Controls = Controls {
        close: false,
        next: false,
        previous: false,
    };
}

impl Default for Controls {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SurfaceCall {
        Show(usize, String),
        Visible(bool),
        ScrollLocked(bool),
        OpenTransition,
    }

    /// Records every call so tests can assert on the exact side effects.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<SurfaceCall>,
        pub visible: bool,
        pub scroll_locked: bool,
    }

    impl RecordingSurface {
        pub fn take(&mut self) -> Vec<SurfaceCall> {
            std::mem::take(&mut self.calls)
        }
    }

    impl ModalSurface for RecordingSurface {
        fn show_image(&mut self, index: usize, image: &GalleryImage) {
            self.calls.push(SurfaceCall::Show(index, image.label.clone()));
        }

        fn set_modal_visible(&mut self, visible: bool) {
            self.visible = visible;
            self.calls.push(SurfaceCall::Visible(visible));
        }

        fn set_scroll_locked(&mut self, locked: bool) {
            self.scroll_locked = locked;
            self.calls.push(SurfaceCall::ScrollLocked(locked));
        }

        fn play_open_transition(&mut self) {
            self.calls.push(SurfaceCall::OpenTransition);
        }
    }
}
