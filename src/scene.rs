// The demo screen: one top-level desktop window and a set of sliding boards
// drawn as hardware-plane surfaces. Also routes clicks to the right board.

use std::time::Instant;

use tracing::debug;

use crate::backdrop::BlurredBoard;
use crate::capture::{capture_screen, Compositor, Surface};
use crate::config::{Config, PanelConfig};
use crate::draw::{blit, draw_text_5x7, fill_rect, stroke_rect, text_width};
use crate::error::Result;
use crate::geometry::Position;
use crate::sideboard::{Event, SideBoard};
use crate::snapshot::BlurAlgorithm;
use crate::types::{PixelBuffer, Point, Size};

const OPAQUE: u32 = 0xFF00_0000;

pub struct Desktop {
    size: Size,
    status: String,
}

impl Desktop {
    pub fn new(size: Size) -> Self {
        Self { size, status: "0, 0".to_string() }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

impl Surface for Desktop {
    fn is_visible(&self) -> bool {
        true
    }

    fn is_top_level(&self) -> bool {
        true
    }

    fn is_plane(&self) -> bool {
        false
    }

    fn paint(&self, fb: &mut PixelBuffer) {
        let (w, h) = (self.size.width, self.size.height);

        // Vertical gradient background
        for y in 0..fb.height() {
            let t = (y * 255 / fb.height().max(1)) as u32;
            let color = OPAQUE | ((40 + t / 3) << 16) | ((60 + t / 4) << 8) | (120 + t / 2);
            fb.row_mut(y).fill(color);
        }

        // Checker stripes give the blur something to chew on
        for i in 0..(w / 40) {
            if i % 2 == 0 {
                fill_rect(fb, i * 40, h / 2 - 90, 40, 20, OPAQUE | 0xF0C040);
            }
        }

        let title = "SIDEBOARD WIDGET";
        draw_text_5x7(fb, (w - text_width(title, 4)) / 2, h / 2 - 60, title, 4, OPAQUE);

        let status_w = text_width(&self.status, 2);
        fill_rect(fb, w / 2 - 100, h / 2 + 10, 200, 30, OPAQUE | 0xFFFFFF);
        draw_text_5x7(fb, (w - status_w) / 2, h / 2 + 18, &self.status, 2, OPAQUE);

        let button = "MAIN BUTTON";
        fill_rect(fb, w / 2 - 80, h / 2 + 60, 160, 40, OPAQUE | 0xD0D0D0);
        stroke_rect(fb, w / 2 - 80, h / 2 + 60, 160, 40, OPAQUE | 0x404040);
        draw_text_5x7(fb, (w - text_width(button, 2)) / 2, h / 2 + 73, button, 2, OPAQUE);
    }
}

/// A board plus the way it looks.
pub struct Panel {
    pub board: BlurredBoard,
    color: u32,
    label: String,
    backdrop_enabled: bool,
}

impl Panel {
    pub fn from_config(cfg: &PanelConfig, screen: Size, algorithm: BlurAlgorithm) -> Result<Self> {
        let board = SideBoard::with_transitions(
            cfg.position,
            cfg.requested_size(),
            screen,
            cfg.open_transition(),
            cfg.close_transition(),
        );
        Ok(Self {
            board: BlurredBoard::new(board, algorithm)?,
            color: OPAQUE | (cfg.color & 0x00FF_FFFF),
            label: cfg.label.clone(),
            backdrop_enabled: cfg.backdrop,
        })
    }

    fn wants_backdrop(&self, event: &Event) -> bool {
        self.backdrop_enabled && self.board.wants_snapshot(event)
    }
}

impl Surface for Panel {
    fn is_visible(&self) -> bool {
        true
    }

    fn is_top_level(&self) -> bool {
        false
    }

    fn is_plane(&self) -> bool {
        true
    }

    fn paint(&self, fb: &mut PixelBuffer) {
        let board = self.board.board();
        let Point { x, y } = board.origin();
        let Size { width, height } = board.size();
        fill_rect(fb, x, y, width, height, self.color);
        stroke_rect(fb, x, y, width, height, OPAQUE);

        let label_w = text_width(&self.label, 3);
        draw_text_5x7(fb, x + (width - label_w) / 2, y + (height - 21) / 2, &self.label, 3, OPAQUE);
    }
}

pub struct Scene {
    size: Size,
    desktop: Desktop,
    panels: Vec<Panel>,
}

impl Scene {
    pub fn from_config(cfg: &Config, algorithm: BlurAlgorithm) -> Result<Self> {
        let size = cfg.screen.size();
        let panels = cfg
            .panels
            .iter()
            .map(|p| Panel::from_config(p, size, algorithm))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { size, desktop: Desktop::new(size), panels })
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn set_algorithm(&mut self, algorithm: BlurAlgorithm) {
        for panel in &mut self.panels {
            panel.board.set_algorithm(algorithm);
        }
    }

    /// Drawing order, back to front: closed panels, then panels showing a
    /// backdrop with the backdrop right under its panel.
    fn stacking(&self) -> Vec<usize> {
        let (mut raised, mut rest): (Vec<usize>, Vec<usize>) =
            (0..self.panels.len()).partition(|&i| self.panels[i].board.backdrop().is_some());
        rest.append(&mut raised);
        rest
    }

    /// Route a click: the topmost panel under the pointer gets it. A click
    /// anywhere else dismisses open panels that frost the screen.
    pub fn click(&mut self, point: Point, now: Instant) {
        let event = Event::PointerClick(point);
        let target = self
            .stacking()
            .into_iter()
            .rev()
            .find(|&i| self.panels[i].board.contains(point));

        match target {
            Some(i) => {
                let snapshot = self.panels[i].wants_backdrop(&event).then(|| capture_screen(&*self));
                let panel = &mut self.panels[i];
                let opening = !panel.board.board().is_open();
                panel.board.handle(&event, now, snapshot);
                let position = panel.board.board().position();
                self.desktop
                    .set_status(format!("{position}: {}", if opening { "open" } else { "close" }));
            }
            None => {
                let mut dismissed = false;
                for panel in &mut self.panels {
                    if panel.backdrop_enabled && panel.board.board().is_open() {
                        panel.board.close(now);
                        dismissed = true;
                    }
                }
                if !dismissed {
                    self.desktop.set_status(format!("win: {}, {}", point.x, point.y));
                }
            }
        }
        debug!(?point, status = self.desktop.status(), "click routed");
    }

    /// Move the first panel to the next edge.
    pub fn rotate_first_panel(&mut self) {
        if let Some(panel) = self.panels.first_mut() {
            let next = match panel.board.board().position() {
                Position::Left => Position::Top,
                Position::Top => Position::Right,
                Position::Right => Position::Bottom,
                Position::Bottom => Position::Left,
            };
            panel.board.close(Instant::now());
            panel.board.board_mut().set_position(next);
        }
    }

    /// Advance animations; true when a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for panel in &mut self.panels {
            changed |= panel.board.tick(now);
        }
        changed
    }

    pub fn render(&self, fb: &mut PixelBuffer) {
        self.desktop.paint(fb);
        for i in self.stacking() {
            let panel = &self.panels[i];
            if let Some(image) = panel.board.backdrop() {
                blit(fb, image.pixels(), 0, 0);
            }
            panel.paint(fb);
        }
    }
}

impl Compositor for Scene {
    fn screen_size(&self) -> Size {
        self.size
    }

    fn visible_surfaces(&self) -> Vec<&dyn Surface> {
        let mut surfaces: Vec<&dyn Surface> = vec![&self.desktop];
        surfaces.extend(self.stacking().into_iter().map(|i| &self.panels[i] as &dyn Surface));
        surfaces
    }
}
