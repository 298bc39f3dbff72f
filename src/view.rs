//! Per-instance view binding a grid load to a reveal engine.
//!
//! Loading (decode plus sampling) happens outside the view. The view hands out
//! a [`LoadTicket`] per request and only accepts the result for the newest
//! ticket, so a late result for a replaced or torn-down view is dropped
//! without side effects.

use std::fmt::Display;
use std::sync::Arc;

use rand::Rng;

use crate::grid::GlyphGrid;
use crate::reveal::{RevealConfig, RevealEngine, RevealPhase};

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// How a loaded grid is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Scramble-decode into place.
    #[default]
    Reveal,
    /// Show the grid as soon as it arrives.
    Static,
}

/// What happened to a delivered load result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The grid is now showing (or revealing).
    Shown,
    /// The load failed; the last known rows stay on screen.
    Failed,
    /// The ticket was stale or the view was torn down.
    Discarded,
}

/// One rendered ASCII image.
#[derive(Debug)]
pub struct AsciiView<R> {
    engine: RevealEngine<R>,
    mode: ViewMode,
    grid: Option<Arc<GlyphGrid>>,
    next_ticket: u64,
    pending: Option<LoadTicket>,
    torn_down: bool,
}

impl<R: Rng> AsciiView<R> {
    pub fn new(config: RevealConfig, rng: R) -> Self {
        Self {
            engine: RevealEngine::new(config, rng),
            mode: ViewMode::Reveal,
            grid: None,
            next_ticket: 0,
            pending: None,
            torn_down: false,
        }
    }

    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Start a new load, superseding any earlier one.
    ///
    /// A reveal in progress is stopped; its last frame stays visible until
    /// the new grid arrives, or the last grid is shown in full if the load fails.
    pub fn request(&mut self) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        if !self.torn_down {
            if self.engine.is_running() {
                self.engine.cancel();
            }
            self.pending = Some(ticket);
        }
        ticket
    }

    /// Deliver the result of a load.
    pub fn resolve<E: Display>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Arc<GlyphGrid>, E>,
    ) -> LoadOutcome {
        if self.torn_down || self.pending != Some(ticket) {
            log::debug!("Discarding stale load result {:?}", ticket);
            return LoadOutcome::Discarded;
        }
        self.pending = None;

        match result {
            Ok(grid) => {
                if self.mode == ViewMode::Reveal {
                    self.engine.start(Arc::clone(&grid));
                }
                self.grid = Some(grid);
                LoadOutcome::Shown
            }
            Err(e) => {
                log::warn!("Failed to load ASCII grid: {}", e);
                self.settle_on_last_grid();
                LoadOutcome::Failed
            }
        }
    }

    /// Show the last delivered grid in full, replacing a cancelled reveal's
    /// scrambled frame.
    fn settle_on_last_grid(&mut self) {
        if self.mode != ViewMode::Reveal || self.engine.phase() == RevealPhase::Complete {
            return;
        }
        if let Some(grid) = &self.grid {
            self.engine.start(Arc::clone(grid));
            self.engine.finish();
        }
    }

    /// Advance the reveal. Returns the new rows while a reveal is running.
    pub fn tick(&mut self, delta_secs: f32) -> Option<&[String]> {
        if self.torn_down || self.mode == ViewMode::Static {
            return None;
        }
        self.engine.tick(delta_secs)
    }

    /// Rows to draw right now. Empty until the first grid arrives.
    pub fn rows(&self) -> &[String] {
        match self.mode {
            ViewMode::Reveal => self.engine.frame(),
            ViewMode::Static => self.grid.as_deref().map(GlyphGrid::rows).unwrap_or(&[]),
        }
    }

    /// The last grid delivered.
    pub fn grid(&self) -> Option<&Arc<GlyphGrid>> {
        self.grid.as_ref()
    }

    pub fn phase(&self) -> RevealPhase {
        self.engine.phase()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Destroy the view: cancel the reveal and drop any pending load.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            log::debug!("Tearing down ASCII view");
        }
        self.torn_down = true;
        self.pending = None;
        self.engine.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn view() -> AsciiView<StdRng> {
        AsciiView::new(RevealConfig::default(), StdRng::seed_from_u64(11))
    }

    fn grid(text: &str) -> Arc<GlyphGrid> {
        Arc::new(GlyphGrid::from_text(text).unwrap())
    }

    #[test]
    fn test_resolve_starts_reveal() {
        let mut view = view();
        let ticket = view.request();
        assert!(view.is_pending());
        let outcome = view.resolve::<ResolveError>(ticket, Ok(grid("abc")));
        assert_eq!(outcome, LoadOutcome::Shown);
        assert_eq!(view.phase(), RevealPhase::Running);
        assert_eq!(view.rows().len(), 1);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut view = view();
        let old = view.request();
        let new = view.request();
        assert_eq!(
            view.resolve::<ResolveError>(old, Ok(grid("old"))),
            LoadOutcome::Discarded
        );
        assert_eq!(view.phase(), RevealPhase::Idle);
        assert_eq!(
            view.resolve::<ResolveError>(new, Ok(grid("new"))),
            LoadOutcome::Shown
        );
    }

    #[test]
    fn test_teardown_before_resolution() {
        let mut view = view();
        let ticket = view.request();
        view.teardown();
        assert_eq!(
            view.resolve::<ResolveError>(ticket, Ok(grid("abc"))),
            LoadOutcome::Discarded
        );
        assert_ne!(view.phase(), RevealPhase::Running);
        assert!(view.tick(0.1).is_none());
    }

    #[test]
    fn test_failure_keeps_last_rows() {
        let mut view = view().with_mode(ViewMode::Static);
        let first = view.request();
        view.resolve::<ResolveError>(first, Ok(grid("ab\ncd")));
        let second = view.request();
        let outcome = view.resolve(second, Err(ResolveError::UnknownAsset("x".to_string())));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(view.rows(), &["ab".to_string(), "cd".to_string()]);
    }

    #[test]
    fn test_failed_reload_mid_reveal_shows_last_grid() {
        let mut view = view();
        let first = view.request();
        let target = grid("abcdefgh\nijklmnop");
        view.resolve::<ResolveError>(first, Ok(Arc::clone(&target)));
        view.tick(0.5);

        let second = view.request();
        let outcome = view.resolve(second, Err(ResolveError::UnknownAsset("x".to_string())));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(view.rows(), target.rows());
        assert_eq!(view.phase(), RevealPhase::Complete);
        assert!(view.tick(0.5).is_none());
    }

    #[test]
    fn test_failed_first_load_shows_nothing() {
        let mut view = view();
        let ticket = view.request();
        let outcome = view.resolve(ticket, Err(ResolveError::UnknownAsset("x".to_string())));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(view.rows().is_empty());
        assert_eq!(view.phase(), RevealPhase::Idle);
    }

    #[test]
    fn test_static_mode_shows_grid_immediately() {
        let mut view = view().with_mode(ViewMode::Static);
        assert!(view.rows().is_empty());
        let ticket = view.request();
        view.resolve::<ResolveError>(ticket, Ok(grid("@@")));
        assert_eq!(view.rows(), &["@@".to_string()]);
        assert!(view.tick(0.1).is_none());
    }

    #[test]
    fn test_new_request_stops_running_reveal() {
        let mut view = view();
        let ticket = view.request();
        view.resolve::<ResolveError>(ticket, Ok(grid("abcdef")));
        view.tick(0.5);
        view.request();
        assert_eq!(view.phase(), RevealPhase::Cancelled);
        assert!(view.tick(0.5).is_none());
    }

    #[test]
    fn test_reveal_reaches_target() {
        let mut view = view();
        let ticket = view.request();
        let target = grid("#%$@\n .:;");
        view.resolve::<ResolveError>(ticket, Ok(Arc::clone(&target)));
        while view.tick(0.25).is_some() {}
        assert_eq!(view.rows(), target.rows());
    }
}
