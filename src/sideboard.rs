//! A board that slides on and off the screen from one edge.
//!
//! Only a small part of a closed board, the handle, stays on screen so a
//! click can pull it back out. Opening and closing are two independent
//! interpolators; reversing mid-flight hands the current value of the
//! running one to the other so the board never jumps.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::animator::Animator;
use crate::easing::Easing;
use crate::geometry::{compute_anchors, compute_size, Position, HANDLE_WIDTH};
use crate::types::{Point, Size};

/// Input delivered to a board by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PointerClick(Point),
    PointerMotion(Point),
}

/// Duration and curve of one direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub const fn default_open() -> Self {
        Self::new(Duration::from_millis(1000), Easing::CubicInOut)
    }

    pub const fn default_close() -> Self {
        Self::new(Duration::from_millis(1000), Easing::CircularInOut)
    }
}

/// Derived view of the two interpolators and the direction flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug)]
pub struct SideBoard {
    position: Position,
    requested: Size,
    screen: Size,
    size: Size,
    origin: Point,
    open_anim: Animator,
    close_anim: Animator,
    /// true = open (or opening)
    dir: bool,
}

impl SideBoard {
    /// Board with the default one-second transitions.
    pub fn new(position: Position, requested: Size, screen: Size) -> Self {
        Self::with_transitions(position, requested, screen, Transition::default_open(), Transition::default_close())
    }

    pub fn with_transitions(
        position: Position,
        requested: Size,
        screen: Size,
        open: Transition,
        close: Transition,
    ) -> Self {
        let mut board = Self {
            position,
            requested,
            screen,
            size: compute_size(position, requested, screen, HANDLE_WIDTH),
            origin: Point::default(),
            open_anim: Animator::new(open.duration, open.easing),
            close_anim: Animator::new(close.duration, close.easing),
            dir: false,
        };
        board.reset_animations();
        board.move_to(board.open_anim.starting());
        board
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Move the board to another edge. It comes back fully retracted.
    pub fn set_position(&mut self, position: Position) {
        if self.position == position {
            return;
        }
        self.open_anim.stop();
        self.close_anim.stop();
        self.position = position;
        self.size = compute_size(position, self.requested, self.screen, HANDLE_WIDTH);
        self.dir = false;
        self.reset_animations();
        self.move_to(self.open_anim.starting());
        debug!(%position, size = ?self.size, "board repositioned");
    }

    /// Follow a screen size change: stop travelling and settle where the
    /// current direction says the board should be.
    pub fn set_screen_size(&mut self, screen: Size) {
        if self.screen == screen {
            return;
        }
        self.open_anim.stop();
        self.close_anim.stop();
        self.screen = screen;
        self.size = compute_size(self.position, self.requested, screen, HANDLE_WIDTH);
        self.reset_animations();
        let settled = if self.dir { self.open_anim.ending() } else { self.open_anim.starting() };
        self.move_to(settled);
    }

    pub fn requested_size(&self) -> Size {
        self.requested
    }

    /// Actual board size including the handle.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn is_open(&self) -> bool {
        self.dir
    }

    pub fn is_animating(&self) -> bool {
        self.open_anim.running() || self.close_anim.running()
    }

    pub fn state(&self) -> BoardState {
        match (self.dir, self.is_animating()) {
            (true, true) => BoardState::Opening,
            (true, false) => BoardState::Open,
            (false, true) => BoardState::Closing,
            (false, false) => BoardState::Closed,
        }
    }

    pub fn open_animation(&self) -> &Animator {
        &self.open_anim
    }

    pub fn close_animation(&self) -> &Animator {
        &self.close_anim
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.size.width
            && p.y < self.origin.y + self.size.height
    }

    /// Slide out. A no-op when already open or opening.
    pub fn open(&mut self, now: Instant) {
        if self.dir {
            return;
        }
        self.open_anim.stop();
        let reversing = self.close_anim.running();
        self.close_anim.stop();
        let current = self.close_anim.current();
        self.reset_animations();
        if reversing {
            self.open_anim.set_starting(current);
        }
        self.open_anim.start(now);
        self.dir = true;
        info!(position = %self.position, from = self.open_anim.starting(), reversing, "board opening");
    }

    /// Slide back in. A no-op when already closed or closing.
    pub fn close(&mut self, now: Instant) {
        if !self.dir {
            return;
        }
        self.close_anim.stop();
        let reversing = self.open_anim.running();
        self.open_anim.stop();
        let current = self.open_anim.current();
        self.reset_animations();
        if reversing {
            self.close_anim.set_starting(current);
        }
        self.close_anim.start(now);
        self.dir = false;
        info!(position = %self.position, from = self.close_anim.starting(), reversing, "board closing");
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.dir {
            self.close(now);
        } else {
            self.open(now);
        }
    }

    /// Only clicks do anything; returns whether the event was consumed.
    pub fn handle(&mut self, event: &Event, now: Instant) -> bool {
        match event {
            Event::PointerClick(_) => {
                self.toggle(now);
                true
            }
            Event::PointerMotion(_) => false,
        }
    }

    /// Advance whichever interpolator is running. Returns the new origin
    /// when the board moved.
    pub fn tick(&mut self, now: Instant) -> Option<Point> {
        let anim = if self.open_anim.running() {
            &mut self.open_anim
        } else if self.close_anim.running() {
            &mut self.close_anim
        } else {
            return None;
        };
        let value = anim.tick(now)?;
        let before = self.origin;
        self.move_to(value);
        if !self.is_animating() {
            debug!(state = ?self.state(), "board settled");
        }
        (self.origin != before).then_some(self.origin)
    }

    /// Recompute travel from the current geometry. Never cached.
    fn reset_animations(&mut self) {
        let a = compute_anchors(self.position, self.requested, self.screen, HANDLE_WIDTH);
        self.open_anim.set_starting(a.open_start as f32);
        self.open_anim.set_ending(a.open_end as f32);
        self.close_anim.set_starting(a.close_start as f32);
        self.close_anim.set_ending(a.close_end as f32);
    }

    fn move_to(&mut self, value: f32) {
        let v = value.round() as i32;
        self.origin = if self.position.slides_horizontally() {
            Point::new(v, 0)
        } else {
            Point::new(0, v)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCREEN: Size = Size::new(800, 480);

    fn linear_board(position: Position, requested: Size) -> SideBoard {
        let t = Transition::new(Duration::from_millis(1000), Easing::Linear);
        SideBoard::with_transitions(position, requested, SCREEN, t, t)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_closed_and_retracted() {
        let board = SideBoard::new(Position::Left, Size::new(140, 0), SCREEN);
        assert_eq!(board.state(), BoardState::Closed);
        assert_eq!(board.origin(), Point::new(-140, 0));
        assert_eq!(board.size(), Size::new(190, 480));

        let bottom = SideBoard::new(Position::Bottom, Size::new(0, 200), SCREEN);
        assert_eq!(bottom.origin(), Point::new(0, 430));
    }

    #[test]
    fn opens_then_settles() {
        let t0 = Instant::now();
        let mut board = linear_board(Position::Left, Size::new(140, 0));
        board.open(t0);
        assert_eq!(board.state(), BoardState::Opening);
        assert_eq!(board.tick(t0 + ms(500)), Some(Point::new(-70, 0)));
        board.tick(t0 + ms(1000));
        assert_eq!(board.state(), BoardState::Open);
        assert_eq!(board.origin(), Point::new(0, 0));
        assert_eq!(board.tick(t0 + ms(1100)), None);
    }

    #[test]
    fn reversal_continues_from_last_emitted_value() {
        let t0 = Instant::now();
        let mut board = linear_board(Position::Left, Size::new(140, 0));
        board.open(t0);
        board.tick(t0 + ms(500));
        let last = board.open_animation().current();
        assert_eq!(last, -70.0);

        board.close(t0 + ms(500));
        assert_eq!(board.state(), BoardState::Closing);
        assert_eq!(board.close_animation().starting(), last);
        assert_eq!(board.close_animation().ending(), -140.0);
        assert!(!board.open_animation().running());

        // And back again: opening resumes from where closing got to.
        board.tick(t0 + ms(750));
        let closing_at = board.close_animation().current();
        board.open(t0 + ms(750));
        assert_eq!(board.open_animation().starting(), closing_at);
        assert_eq!(board.open_animation().ending(), 0.0);
    }

    #[test]
    fn repeated_open_does_not_restart() {
        let t0 = Instant::now();
        let mut board = linear_board(Position::Right, Size::new(200, 0));
        board.open(t0);
        let first = (board.open_animation().starting(), board.open_animation().ending());
        board.tick(t0 + ms(300));
        board.open(t0 + ms(300));
        let second = (board.open_animation().starting(), board.open_animation().ending());
        assert_eq!(first, (750.0, 550.0));
        assert_eq!(first, second);
        assert_eq!(board.origin(), Point::new(690, 0));

        // Settled open: another open() does not start anything.
        board.tick(t0 + ms(1000));
        board.open(t0 + ms(1200));
        assert!(!board.is_animating());
        assert_eq!(board.origin(), Point::new(550, 0));
    }

    #[test]
    fn close_when_closed_is_a_no_op() {
        let t0 = Instant::now();
        let mut board = linear_board(Position::Top, Size::new(0, 200));
        board.close(t0);
        assert_eq!(board.state(), BoardState::Closed);
        assert!(!board.close_animation().running());
    }

    #[test]
    fn click_toggles() {
        let t0 = Instant::now();
        let mut board = linear_board(Position::Left, Size::new(140, 0));
        let click = Event::PointerClick(Point::new(10, 10));
        assert!(board.handle(&click, t0));
        assert!(board.is_open());
        assert!(board.handle(&click, t0 + ms(100)));
        assert!(!board.is_open());
        assert!(!board.handle(&Event::PointerMotion(Point::new(1, 1)), t0));
    }

    #[test]
    fn changing_position_retracts_without_animating() {
        let t0 = Instant::now();
        let mut board = linear_board(Position::Left, Size::new(200, 200));
        board.open(t0);
        board.tick(t0 + ms(400));

        board.set_position(Position::Bottom);
        assert_eq!(board.position(), Position::Bottom);
        assert_eq!(board.state(), BoardState::Closed);
        assert_eq!(board.size(), Size::new(200, 250));
        assert_eq!(board.origin(), Point::new(0, 430));
        assert_eq!(board.tick(t0 + ms(500)), None);

        // Same position again changes nothing.
        board.open(t0 + ms(600));
        board.set_position(Position::Bottom);
        assert!(board.is_open());
    }

    #[test]
    fn screen_resize_recomputes_anchors() {
        let t0 = Instant::now();
        let mut board = linear_board(Position::Right, Size::new(200, 0));
        board.set_screen_size(Size::new(1024, 600));
        assert_eq!(board.origin(), Point::new(974, 0));
        board.open(t0);
        assert_eq!(board.open_animation().ending(), 774.0);
        board.set_screen_size(Size::new(800, 480));
        assert_eq!(board.state(), BoardState::Open);
        assert_eq!(board.origin(), Point::new(550, 0));
    }

    #[test]
    fn hit_test_follows_origin() {
        let board = SideBoard::new(Position::Left, Size::new(140, 0), SCREEN);
        // Only the 50px handle is on screen.
        assert!(board.contains(Point::new(49, 100)));
        assert!(!board.contains(Point::new(50, 100)));
    }
}
