// A board that frosts the screen behind itself while it is open.
// Opening captures the screen and hands it to the blur worker; the finished
// image is installed once it arrives, unless the board closed or reopened in
// the meantime. Closing releases the backdrop immediately.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::sideboard::{Event, SideBoard};
use crate::snapshot::{BackdropImage, BlurAlgorithm, BlurWorker};
use crate::types::{PixelBuffer, Point};

pub struct BlurredBoard {
    board: SideBoard,
    algorithm: BlurAlgorithm,
    worker: BlurWorker,
    pending: Option<u64>,
    backdrop: Option<BackdropImage>,
}

impl BlurredBoard {
    pub fn new(board: SideBoard, algorithm: BlurAlgorithm) -> Result<Self> {
        Ok(Self {
            board,
            algorithm,
            worker: BlurWorker::spawn()?,
            pending: None,
            backdrop: None,
        })
    }

    pub fn board(&self) -> &SideBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut SideBoard {
        &mut self.board
    }

    pub fn backdrop(&self) -> Option<&BackdropImage> {
        self.backdrop.as_ref()
    }

    pub fn is_blur_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn algorithm(&self) -> BlurAlgorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: BlurAlgorithm) {
        self.algorithm = algorithm;
    }

    /// Whether `event` would open the board, i.e. whether the caller should
    /// capture the screen before dispatching it.
    pub fn wants_snapshot(&self, event: &Event) -> bool {
        matches!(event, Event::PointerClick(_)) && !self.board.is_open()
    }

    /// Dispatch an event. `snapshot` is the screen captured just before,
    /// used only when the event opens the board.
    pub fn handle(&mut self, event: &Event, now: Instant, snapshot: Option<Result<PixelBuffer>>) -> bool {
        if let Event::PointerClick(_) = event {
            if self.board.is_open() {
                self.release_backdrop();
            } else {
                self.request_backdrop(snapshot);
            }
        }
        self.board.handle(event, now)
    }

    pub fn open(&mut self, now: Instant, snapshot: Option<Result<PixelBuffer>>) {
        if self.board.is_open() {
            return;
        }
        self.request_backdrop(snapshot);
        self.board.open(now);
    }

    pub fn close(&mut self, now: Instant) {
        if !self.board.is_open() {
            return;
        }
        self.release_backdrop();
        self.board.close(now);
    }

    pub fn contains(&self, p: Point) -> bool {
        self.board.contains(p)
    }

    /// Advance the slide and collect a finished blur. Returns true when
    /// anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let moved = self.board.tick(now).is_some();
        moved | self.collect()
    }

    /// Install the worker's result if it is the one we are waiting for.
    pub fn collect(&mut self) -> bool {
        if self.pending.is_none() {
            return false;
        }
        let Some(result) = self.worker.poll() else {
            return false;
        };
        self.pending = None;
        match result {
            Ok(image) if self.board.is_open() => {
                info!(position = %self.board.position(), "backdrop installed");
                // Previous image goes before the new one is installed.
                self.backdrop.take();
                self.backdrop = Some(image);
                true
            }
            Ok(_) => {
                debug!("board closed before its backdrop was ready");
                false
            }
            Err(e) => {
                warn!(error = %e, "backdrop blur failed, opening without it");
                false
            }
        }
    }

    fn request_backdrop(&mut self, snapshot: Option<Result<PixelBuffer>>) {
        match snapshot {
            Some(Ok(frame)) => {
                let generation = self.worker.submit(frame, self.algorithm);
                debug!(generation, algorithm = ?self.algorithm, "backdrop blur submitted");
                self.pending = Some(generation);
            }
            Some(Err(e)) => {
                warn!(error = %e, "screen capture failed, opening without backdrop");
                self.pending = None;
            }
            None => self.pending = None,
        }
    }

    fn release_backdrop(&mut self) {
        if self.pending.take().is_some() {
            self.worker.cancel();
        }
        if self.backdrop.take().is_some() {
            debug!(position = %self.board.position(), "backdrop released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::Position;
    use crate::types::Size;
    use std::time::Duration;

    const SCREEN: Size = Size::new(64, 48);

    fn board() -> BlurredBoard {
        let b = SideBoard::new(Position::Left, Size::new(20, 0), SCREEN);
        BlurredBoard::new(b, BlurAlgorithm::BoxBlur).unwrap()
    }

    fn snapshot() -> Option<Result<PixelBuffer>> {
        let mut frame = PixelBuffer::new(64, 48).unwrap();
        frame.fill(0xFF30_3030);
        Some(Ok(frame))
    }

    fn settle(b: &mut BlurredBoard, now: Instant) {
        for _ in 0..500 {
            b.tick(now);
            if b.backdrop().is_some() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn click_opens_with_backdrop_and_click_again_releases_it() {
        let t0 = Instant::now();
        let mut b = board();
        let click = Event::PointerClick(Point::new(5, 5));

        assert!(b.wants_snapshot(&click));
        b.handle(&click, t0, snapshot());
        assert!(b.board().is_open());
        assert!(b.is_blur_pending());

        settle(&mut b, t0);
        let img = b.backdrop().expect("backdrop");
        assert_eq!((img.width(), img.height()), (64, 48));

        assert!(!b.wants_snapshot(&click));
        b.handle(&click, t0, None);
        assert!(!b.board().is_open());
        assert!(b.backdrop().is_none());
        assert!(!b.is_blur_pending());
    }

    #[test]
    fn failed_capture_still_opens() {
        let t0 = Instant::now();
        let mut b = board();
        b.open(t0, Some(Err(Error::Allocation { width: 64, height: 48 })));
        assert!(b.board().is_open());
        assert!(!b.is_blur_pending());
        assert!(b.backdrop().is_none());
    }

    #[test]
    fn closing_before_blur_lands_discards_it() {
        let t0 = Instant::now();
        let mut b = board();
        b.open(t0, snapshot());
        b.close(t0);
        std::thread::sleep(Duration::from_millis(50));
        assert!(!b.collect());
        assert!(b.backdrop().is_none());
    }

    #[test]
    fn reopening_replaces_the_backdrop() {
        let t0 = Instant::now();
        let mut b = board();
        b.open(t0, snapshot());
        settle(&mut b, t0);
        assert!(b.backdrop().is_some());

        b.close(t0);
        let mut bright = PixelBuffer::new(32, 16).unwrap();
        bright.fill(0xFFFF_FFFF);
        b.open(t0, Some(Ok(bright)));
        settle(&mut b, t0);
        assert_eq!(b.backdrop().map(|i| i.width()), Some(32));
    }
}
