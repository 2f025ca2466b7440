use super::state::Phase;
use super::surface::Controls;

// ---------------------------------------------------------------------------
// Input vocabulary and the single dispatch table
// ---------------------------------------------------------------------------

/// The innermost thing a click landed on, as resolved by the host's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// A selectable image on the page, by collection position.
    Thumbnail(usize),
    NextControl,
    PreviousControl,
    CloseControl,
    /// The modal overlay itself, outside its content.
    Backdrop,
    /// The displayed image or caption inside the modal.
    Content,
    /// Anything on the page that isn't a selectable image.
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    Escape,
    ArrowRight,
    ArrowLeft,
    Home,
    End,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Click(PointerTarget),
    Key(LightboxKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open(usize),
    ShowNext,
    ShowPrevious,
    Close,
    JumpTo(JumpTarget),
}

/// Keys the lightbox answers to while open, in precedence order.
const KEY_BINDINGS: &[(LightboxKey, Action)] = &[
    (LightboxKey::Escape, Action::Close),
    (LightboxKey::ArrowRight, Action::ShowNext),
    (LightboxKey::ArrowLeft, Action::ShowPrevious),
    (LightboxKey::Home, Action::JumpTo(JumpTarget::First)),
    (LightboxKey::End, Action::JumpTo(JumpTarget::Last)),
];

/// Map one input to at most one lightbox action.
///
/// `None` means the lightbox does not want the input and the host is free to
/// use it. Control clicks resolve to their own action only; they are never
/// reinterpreted as a backdrop click.
pub fn route(input: Input, phase: Phase, controls: Controls) -> Option<Action> {
    match input {
        Input::Key(key) => {
            if phase != Phase::Open {
                return None;
            }
            KEY_BINDINGS
                .iter()
                .find(|(bound, _)| *bound == key)
                .map(|&(_, action)| action)
        }
        Input::Click(target) => route_click(target, phase, controls),
    }
}

fn route_click(target: PointerTarget, phase: Phase, controls: Controls) -> Option<Action> {
    let open = phase == Phase::Open;
    match target {
        PointerTarget::Thumbnail(index) => Some(Action::Open(index)),
        PointerTarget::NextControl if open && controls.next => Some(Action::ShowNext),
        PointerTarget::PreviousControl if open && controls.previous => Some(Action::ShowPrevious),
        PointerTarget::CloseControl if open && controls.close => Some(Action::Close),
        PointerTarget::Backdrop if open => Some(Action::Close),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: Phase = Phase::Open;
    const CLOSED: Phase = Phase::Closed;

    fn key(k: LightboxKey, phase: Phase) -> Option<Action> {
        route(Input::Key(k), phase, Controls::ALL)
    }

    fn click(t: PointerTarget, phase: Phase) -> Option<Action> {
        route(Input::Click(t), phase, Controls::ALL)
    }

    #[test]
    fn keys_map_while_open() {
        assert_eq!(key(LightboxKey::Escape, OPEN), Some(Action::Close));
        assert_eq!(key(LightboxKey::ArrowRight, OPEN), Some(Action::ShowNext));
        assert_eq!(key(LightboxKey::ArrowLeft, OPEN), Some(Action::ShowPrevious));
        assert_eq!(
            key(LightboxKey::End, OPEN),
            Some(Action::JumpTo(JumpTarget::Last))
        );
        assert_eq!(key(LightboxKey::Other, OPEN), None);
    }

    #[test]
    fn every_key_ignored_while_closed() {
        for k in [
            LightboxKey::Escape,
            LightboxKey::ArrowRight,
            LightboxKey::ArrowLeft,
            LightboxKey::Home,
            LightboxKey::End,
            LightboxKey::Other,
        ] {
            assert_eq!(key(k, CLOSED), None, "{k:?}");
        }
    }

    #[test]
    fn controls_never_fall_through_to_backdrop() {
        assert_eq!(click(PointerTarget::NextControl, OPEN), Some(Action::ShowNext));
        assert_eq!(
            click(PointerTarget::PreviousControl, OPEN),
            Some(Action::ShowPrevious)
        );
        assert_eq!(click(PointerTarget::CloseControl, OPEN), Some(Action::Close));
        assert_eq!(click(PointerTarget::Backdrop, OPEN), Some(Action::Close));
        assert_eq!(click(PointerTarget::Content, OPEN), None);
    }

    #[test]
    fn thumbnail_opens_in_either_phase() {
        assert_eq!(click(PointerTarget::Thumbnail(4), CLOSED), Some(Action::Open(4)));
        assert_eq!(click(PointerTarget::Thumbnail(0), OPEN), Some(Action::Open(0)));
        assert_eq!(click(PointerTarget::Page, CLOSED), None);
    }

    #[test]
    fn modal_clicks_ignored_while_closed() {
        assert_eq!(click(PointerTarget::Backdrop, CLOSED), None);
        assert_eq!(click(PointerTarget::NextControl, CLOSED), None);
        assert_eq!(click(PointerTarget::CloseControl, CLOSED), None);
    }

    #[test]
    fn missing_controls_are_inert() {
        let controls = Controls {
            close: true,
            ..Controls::NONE
        };
        let r = |t| route(Input::Click(t), OPEN, controls);
        assert_eq!(r(PointerTarget::NextControl), None);
        assert_eq!(r(PointerTarget::PreviousControl), None);
        assert_eq!(r(PointerTarget::CloseControl), Some(Action::Close));
        // Keyboard navigation still works without buttons.
        assert_eq!(
            route(Input::Key(LightboxKey::ArrowRight), OPEN, controls),
            Some(Action::ShowNext)
        );
    }
}
