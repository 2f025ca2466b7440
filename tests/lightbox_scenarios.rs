use gallery_lightbox::lightbox::{
    Controls, GalleryImage, ImageCollection, Input, LightboxController, LightboxKey, ModalSurface,
    PointerTarget, Transition,
};

/// Minimal host: remembers what is on screen and the two markers.
#[derive(Default)]
struct Page {
    showing: Option<(usize, String)>,
    modal_open: bool,
    scroll_locked: bool,
    fades: usize,
}

impl ModalSurface for Page {
    fn show_image(&mut self, index: usize, image: &GalleryImage) {
        self.showing = Some((index, image.label.clone()));
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.modal_open = visible;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn play_open_transition(&mut self) {
        self.fades += 1;
    }
}

fn certificates(labels: &[&str]) -> ImageCollection {
    labels
        .iter()
        .map(|l| GalleryImage::new(format!("certs/{l}.png"), *l))
        .collect()
}

fn showing(c: &LightboxController<Page>) -> (usize, &str) {
    let (i, label) = c.surface().showing.as_ref().expect("something displayed");
    (*i, label.as_str())
}

#[test]
fn click_and_keyboard_session() {
    let mut c = LightboxController::new(certificates(&["A", "B", "C"]), Page::default(), Controls::ALL);

    assert!(c.handle(Input::Click(PointerTarget::Thumbnail(1))));
    assert_eq!(showing(&c), (1, "B"));
    assert!(c.surface().modal_open && c.surface().scroll_locked);

    c.handle(Input::Key(LightboxKey::ArrowRight));
    assert_eq!(showing(&c), (2, "C"));
    c.handle(Input::Click(PointerTarget::NextControl));
    assert_eq!(showing(&c), (0, "A"));
    c.handle(Input::Key(LightboxKey::ArrowLeft));
    assert_eq!(showing(&c), (2, "C"));

    c.handle(Input::Key(LightboxKey::Escape));
    assert!(!c.is_open());
    assert!(!c.surface().modal_open && !c.surface().scroll_locked);

    // Closed: keys fall through untouched.
    assert!(!c.handle(Input::Key(LightboxKey::ArrowRight)));
    assert_eq!(showing(&c), (2, "C"));
    assert_eq!(c.surface().fades, 1);
}

#[test]
fn open_out_of_range_clamps() {
    let mut c = LightboxController::new(certificates(&["A", "B", "C"]), Page::default(), Controls::ALL);
    assert_eq!(c.open(5), Transition::Opened { index: 2 });
    c.close();
    assert_eq!(c.open(-7), Transition::Opened { index: 0 });
    assert_eq!(c.surface().fades, 2);
}

#[test]
fn cycle_returns_home() {
    let labels = ["a", "b", "c", "d", "e", "f", "g"];
    let mut c = LightboxController::new(certificates(&labels), Page::default(), Controls::ALL);
    for start in 0..labels.len() {
        c.open(start as i64);
        for _ in 0..labels.len() {
            c.show_next();
        }
        assert_eq!(c.current_index(), Some(start));
        for _ in 0..labels.len() {
            c.show_previous();
        }
        assert_eq!(c.current_index(), Some(start));
    }
}

#[test]
fn single_image_wraps_onto_itself() {
    let mut c = LightboxController::new(certificates(&["only"]), Page::default(), Controls::ALL);
    c.open(0);
    assert_eq!(c.show_next(), Transition::Moved { from: 0, to: 0 });
    assert_eq!(c.show_previous(), Transition::Moved { from: 0, to: 0 });
    assert!(c.is_open());
}

#[test]
fn empty_gallery_stays_closed() {
    let mut c = LightboxController::new(ImageCollection::default(), Page::default(), Controls::ALL);
    for input in [
        Input::Click(PointerTarget::Thumbnail(0)),
        Input::Click(PointerTarget::Backdrop),
        Input::Key(LightboxKey::ArrowRight),
        Input::Key(LightboxKey::Escape),
    ] {
        assert!(!c.handle(input));
    }
    c.open(3);
    c.jump_to(1);
    assert!(!c.is_open());
    assert!(c.surface().showing.is_none());
}
