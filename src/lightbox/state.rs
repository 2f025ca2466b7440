// ---------------------------------------------------------------------------
// Pure lightbox state: index arithmetic and the open/closed phase.
// Nothing here knows about windows, surfaces or input devices.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Closed,
    Open,
}

/// What a state operation changed. The controller turns this into
/// surface calls; tests can inspect it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Went from closed to open, showing `index`.
    Opened { index: usize },
    /// Stayed open, display moved (possibly to the same index).
    Moved { from: usize, to: usize },
    /// Went from open to closed.
    Closed,
    /// Nothing happened.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxState {
    len: usize,
    current_index: usize,
    phase: Phase,
}

impl LightboxState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current_index: 0,
            phase: Phase::Closed,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == Phase::Open
    }

    /// Index of the last image. Only meaningful when `len > 0`.
    pub fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Clamp an arbitrary requested position into `[0, len-1]`.
    pub fn clamp_index(&self, requested: i64) -> usize {
        let last = self.last_index() as i64;
        requested.clamp(0, last) as usize
    }

    pub fn open(&mut self, requested: i64) -> Transition {
        if self.len == 0 {
            return Transition::Unchanged;
        }
        let from = self.current_index;
        self.current_index = self.clamp_index(requested);
        match self.phase {
            Phase::Closed => {
                self.phase = Phase::Open;
                Transition::Opened {
                    index: self.current_index,
                }
            }
            Phase::Open => Transition::Moved {
                from,
                to: self.current_index,
            },
        }
    }

    /// Like `open`, but only while already open.
    pub fn jump_to(&mut self, requested: i64) -> Transition {
        if !self.is_open() {
            return Transition::Unchanged;
        }
        self.open(requested)
    }

    pub fn show_next(&mut self) -> Transition {
        self.step(1)
    }

    pub fn show_previous(&mut self) -> Transition {
        self.step(self.len.saturating_sub(1))
    }

    pub fn close(&mut self) -> Transition {
        match self.phase {
            Phase::Open => {
                self.phase = Phase::Closed;
                Transition::Closed
            }
            Phase::Closed => Transition::Unchanged,
        }
    }

    // `delta` is already reduced to a forward step in [0, len).
    fn step(&mut self, delta: usize) -> Transition {
        if !self.is_open() || self.len == 0 {
            return Transition::Unchanged;
        }
        let from = self.current_index;
        self.current_index = (from + delta) % self.len;
        Transition::Moved {
            from,
            to: self.current_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(len: usize, at: i64) -> LightboxState {
        let mut s = LightboxState::new(len);
        s.open(at);
        s
    }

    #[test]
    fn starts_closed_at_zero() {
        let s = LightboxState::new(3);
        assert_eq!(s.phase(), Phase::Closed);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn open_clamps_for_every_requested_index() {
        for n in 1..6usize {
            for i in -8i64..12 {
                let mut s = LightboxState::new(n);
                s.open(i);
                assert!(s.is_open());
                assert_eq!(s.current_index(), i.clamp(0, n as i64 - 1) as usize);
            }
        }
    }

    #[test]
    fn open_past_end_lands_on_last() {
        let s = opened(3, 5);
        assert_eq!(s.current_index(), 2);
    }

    #[test]
    fn open_extreme_values_do_not_overflow() {
        assert_eq!(opened(4, i64::MAX).current_index(), 3);
        assert_eq!(opened(4, i64::MIN).current_index(), 0);
    }

    #[test]
    fn open_reports_opened_then_moved() {
        let mut s = LightboxState::new(3);
        assert_eq!(s.open(1), Transition::Opened { index: 1 });
        assert_eq!(s.open(2), Transition::Moved { from: 1, to: 2 });
    }

    #[test]
    fn next_wraps_and_cycles_back() {
        for n in 1..7usize {
            for start in 0..n {
                let mut s = opened(n, start as i64);
                for _ in 0..n {
                    s.show_next();
                }
                assert_eq!(s.current_index(), start);
            }
        }
    }

    #[test]
    fn previous_undoes_next() {
        for n in 1..7usize {
            for start in 0..n {
                let mut s = opened(n, start as i64);
                s.show_next();
                s.show_previous();
                assert_eq!(s.current_index(), start);
            }
        }
    }

    #[test]
    fn previous_from_zero_wraps_to_last() {
        let mut s = opened(3, 0);
        assert_eq!(s.show_previous(), Transition::Moved { from: 0, to: 2 });
    }

    #[test]
    fn navigation_while_closed_is_ignored() {
        let mut s = LightboxState::new(3);
        assert_eq!(s.show_next(), Transition::Unchanged);
        assert_eq!(s.show_previous(), Transition::Unchanged);
        assert_eq!(s.jump_to(2), Transition::Unchanged);
        assert_eq!(s.current_index(), 0);
        assert!(!s.is_open());
    }

    #[test]
    fn close_is_idempotent() {
        let mut s = opened(2, 1);
        assert_eq!(s.close(), Transition::Closed);
        let once = s.clone();
        assert_eq!(s.close(), Transition::Unchanged);
        assert_eq!(s, once);
    }

    #[test]
    fn close_keeps_position_for_inspection() {
        let mut s = opened(4, 3);
        s.close();
        assert_eq!(s.current_index(), 3);
    }

    #[test]
    fn empty_never_opens() {
        let mut s = LightboxState::new(0);
        assert_eq!(s.open(0), Transition::Unchanged);
        assert_eq!(s.open(-1), Transition::Unchanged);
        assert_eq!(s.show_next(), Transition::Unchanged);
        assert!(!s.is_open());
    }

    #[test]
    fn jump_while_open_moves_without_reopening() {
        let mut s = opened(5, 0);
        assert_eq!(s.jump_to(9), Transition::Moved { from: 0, to: 4 });
        assert!(s.is_open());
    }
}
