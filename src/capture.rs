// Grabs the currently composited screen into an off-screen buffer.
// The windowing side is abstracted by two small traits so the capture can
// run against the demo scene, a test double, or a real compositor.

use crate::error::Result;
use crate::types::{PixelBuffer, Size};
use tracing::trace;

/// One drawable the compositor knows about.
pub trait Surface {
    fn is_visible(&self) -> bool;

    /// Top-level frames are the application's own windows.
    fn is_top_level(&self) -> bool;

    /// Hardware-plane surfaces are composited by the display controller.
    fn is_plane(&self) -> bool;

    /// Draw this surface onto `target` at its own screen position.
    fn paint(&self, target: &mut PixelBuffer);
}

/// What the capture needs from the windowing system.
pub trait Compositor {
    fn screen_size(&self) -> Size;

    /// Surfaces in back-to-front order.
    fn visible_surfaces(&self) -> Vec<&dyn Surface>;
}

/// Composite `surfaces` back-to-front into a fresh buffer of `screen` size.
///
/// Hidden surfaces are skipped, and so is anything that is neither a
/// top-level frame nor a plane surface (child widgets paint through their
/// parent frame).
pub fn capture(surfaces: &[&dyn Surface], screen: Size) -> Result<PixelBuffer> {
    let width = usize::try_from(screen.width).unwrap_or(0);
    let height = usize::try_from(screen.height).unwrap_or(0);
    let mut frame = PixelBuffer::new(width, height)?;

    let mut painted = 0;
    for surface in surfaces {
        if !surface.is_visible() {
            continue;
        }
        if surface.is_top_level() || surface.is_plane() {
            surface.paint(&mut frame);
            painted += 1;
        }
    }
    trace!(painted, total = surfaces.len(), "screen captured");

    Ok(frame)
}

/// Capture whatever `compositor` currently shows.
pub fn capture_screen(compositor: &dyn Compositor) -> Result<PixelBuffer> {
    capture(&compositor.visible_surfaces(), compositor.screen_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;

    struct Fake<'a> {
        name: &'static str,
        visible: bool,
        top_level: bool,
        plane: bool,
        color: u32,
        log: &'a RefCell<Vec<&'static str>>,
    }

    impl Surface for Fake<'_> {
        fn is_visible(&self) -> bool {
            self.visible
        }
        fn is_top_level(&self) -> bool {
            self.top_level
        }
        fn is_plane(&self) -> bool {
            self.plane
        }
        fn paint(&self, target: &mut PixelBuffer) {
            self.log.borrow_mut().push(self.name);
            *target.pixel_mut(0, 0) = self.color;
        }
    }

    fn fake<'a>(
        name: &'static str,
        (visible, top_level, plane): (bool, bool, bool),
        color: u32,
        log: &'a RefCell<Vec<&'static str>>,
    ) -> Fake<'a> {
        Fake { name, visible, top_level, plane, color, log }
    }

    #[test]
    fn paints_eligible_surfaces_back_to_front() {
        let log = RefCell::new(Vec::new());
        let desk = fake("desk", (true, true, false), 0xFF00_0001, &log);
        let hidden = fake("hidden", (false, true, false), 0xFF00_0002, &log);
        let child = fake("child", (true, false, false), 0xFF00_0003, &log);
        let plane = fake("plane", (true, false, true), 0xFF00_0004, &log);

        let frame = capture(&[&desk, &hidden, &child, &plane], Size::new(4, 3)).unwrap();

        assert_eq!(*log.borrow(), vec!["desk", "plane"]);
        assert_eq!(frame.pixel(0, 0), 0xFF00_0004);
        assert_eq!((frame.width(), frame.height()), (4, 3));
    }

    #[test]
    fn nothing_visible_gives_a_cleared_frame() {
        let log = RefCell::new(Vec::new());
        let hidden = fake("hidden", (false, true, true), 0xFFFF_FFFF, &log);
        let frame = capture(&[&hidden], Size::new(2, 2)).unwrap();
        assert!(frame.raw().iter().all(|&p| p == 0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn empty_screen_is_rejected() {
        assert!(matches!(capture(&[], Size::new(0, 10)), Err(Error::InvalidLayout(_))));
        assert!(matches!(capture(&[], Size::new(-5, 10)), Err(Error::InvalidLayout(_))));
    }
}
