//! Per-panel render dispatch.
//!
//! Each cycle the dispatch task calls [`prepare`] once with the context
//! locked, then hands the resulting view to one [`Dispatcher`] per panel
//! with the lock released. A dispatcher redraws only when the view
//! differs from the last one it rendered, and commits every cycle.

use memorymode::PanelContext;

use crate::layout::DisplayConfig;
use crate::renderer::PanelRenderer;
use crate::view::PageView;

/// Fire timed transitions and snapshot the page to draw.
///
/// Call with the context lock held; the returned view is independent of
/// the context so the lock can be dropped before any bus traffic.
pub fn prepare(ctx: &mut PanelContext, now_ms: u64) -> Option<PageView> {
    if ctx.expire(now_ms) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Reinitialise hold elapsed");
    }
    let view = PageView::capture(ctx, now_ms);
    if view.is_none() {
        #[cfg(feature = "defmt")]
        defmt::warn!("page {} has no content, skipping frame", ctx.page());
    }
    view
}

/// What one [`Dispatcher::present`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// Content changed; a new frame was rendered and committed.
    Redrawn,
    /// Content unchanged; only the commit ran.
    Unchanged,
    /// No view this cycle; the previous frame stays on the panel.
    Skipped,
    /// Rendering failed; nothing was committed and the next cycle retries.
    Failed,
}

/// Dirty-checking front end for one panel.
pub struct Dispatcher<R> {
    renderer: R,
    last: Option<PageView>,
    redraws: u32,
}

impl<R> Dispatcher<R>
where
    R: PanelRenderer,
{
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            last: None,
            redraws: 0,
        }
    }

    /// Initialise the panel and show the boot splash.
    ///
    /// Clears the last-rendered snapshot so the first page frame after
    /// the splash always redraws.
    pub async fn start(&mut self, version: &str, config: &DisplayConfig) -> Result<(), R::Error> {
        self.renderer.init().await?;
        self.renderer.render_boot(version, config)?;
        self.renderer.commit().await?;
        self.last = None;
        Ok(())
    }

    /// Start `renderer`, or log and give up on it.
    ///
    /// Returns `None` when the panel did not initialise, so a caller
    /// driving several panels can keep the working ones.
    pub async fn launch(renderer: R, version: &str, config: &DisplayConfig) -> Option<Self> {
        let mut dispatcher = Self::new(renderer);
        match dispatcher.start(version, config).await {
            Ok(()) => Some(dispatcher),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Panel init failed, panel disabled");
                None
            }
        }
    }

    /// Draw `view` if it differs from the last rendered one, then commit.
    pub async fn present(&mut self, view: Option<&PageView>, config: &DisplayConfig) -> Frame {
        let frame = match view {
            None => Frame::Skipped,
            Some(v) if self.last.as_ref() == Some(v) => Frame::Unchanged,
            Some(v) => match self.renderer.render(v, config) {
                Ok(()) => {
                    self.last = Some(v.clone());
                    self.redraws = self.redraws.wrapping_add(1);
                    Frame::Redrawn
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!("Render failed for page {}", v.page());
                    return Frame::Failed;
                }
            },
        };

        if let Err(_e) = self.renderer.commit().await {
            #[cfg(feature = "defmt")]
            defmt::error!("Commit failed");
        }
        frame
    }

    /// Forget the last rendered view so the next `present` redraws.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Number of frames rendered since construction.
    pub fn redraw_count(&self) -> u32 {
        self.redraws
    }

    pub fn last_view(&self) -> Option<&PageView> {
        self.last.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use memorymode::catalog::PatchName;
    use memorymode::context::ParameterKind;
    use memorymode::{Page, PanelConfig};

    /// Records calls instead of drawing.
    #[derive(Default)]
    struct Recorder {
        renders: usize,
        commits: usize,
        fail_init: bool,
        fail_render: bool,
        fail_commit: bool,
        drawn: Option<PageView>,
    }

    impl PanelRenderer for Recorder {
        type Error = ();

        async fn init(&mut self) -> Result<(), ()> {
            if self.fail_init {
                Err(())
            } else {
                Ok(())
            }
        }

        fn render_boot(&mut self, _version: &str, _config: &DisplayConfig) -> Result<(), ()> {
            Ok(())
        }

        fn render(&mut self, view: &PageView, _config: &DisplayConfig) -> Result<(), ()> {
            if self.fail_render {
                return Err(());
            }
            self.renders += 1;
            self.drawn = Some(view.clone());
            Ok(())
        }

        async fn commit(&mut self) -> Result<(), ()> {
            self.commits += 1;
            if self.fail_commit {
                Err(())
            } else {
                Ok(())
            }
        }
    }

    fn cycle(d: &mut Dispatcher<Recorder>, ctx: &mut PanelContext, now_ms: u64) -> Frame {
        let view = prepare(ctx, now_ms);
        block_on(d.present(view.as_ref(), &DisplayConfig::default()))
    }

    fn patch_ctx() -> PanelContext {
        let mut ctx = PanelContext::new(PanelConfig::default());
        ctx.show_patch_summary(1, &PatchName::new("Init").unwrap());
        ctx.set_page(Page::Patch, 0);
        ctx
    }

    #[test]
    fn unchanged_content_redraws_once() {
        let mut ctx = patch_ctx();
        let mut d = Dispatcher::new(Recorder::default());

        assert_eq!(cycle(&mut d, &mut ctx, 0), Frame::Redrawn);
        assert_eq!(cycle(&mut d, &mut ctx, 33), Frame::Unchanged);
        assert_eq!(d.renderer().renders, 1);
        assert_eq!(d.renderer().commits, 2);
        assert_eq!(d.redraw_count(), 1);
    }

    #[test]
    fn parameter_change_redraws() {
        let mut ctx = PanelContext::new(PanelConfig::default());
        let mut d = Dispatcher::new(Recorder::default());

        ctx.show_parameter("Cutoff", 10, ParameterKind::Parameter, 0);
        cycle(&mut d, &mut ctx, 0);
        ctx.show_parameter("Cutoff", 11, ParameterKind::Parameter, 10);
        assert_eq!(cycle(&mut d, &mut ctx, 20), Frame::Redrawn);
        ctx.show_parameter("Cutoff", 11, ParameterKind::Parameter, 30);
        assert_eq!(cycle(&mut d, &mut ctx, 40), Frame::Unchanged);
    }

    #[test]
    fn parameter_timeout_switches_to_patch_frame() {
        let mut ctx = patch_ctx();
        let mut d = Dispatcher::new(Recorder::default());
        ctx.set_page(Page::Parameter, 100);
        ctx.show_parameter("Cutoff", 10, ParameterKind::Parameter, 100);

        cycle(&mut d, &mut ctx, 100);
        assert_eq!(d.last_view().map(PageView::page), Some(Page::Parameter));
        assert_eq!(cycle(&mut d, &mut ctx, 1601), Frame::Redrawn);
        assert_eq!(d.last_view().map(PageView::page), Some(Page::Patch));
        assert_eq!(ctx.page(), Page::Parameter);
    }

    #[test]
    fn reinitialise_renders_once_then_returns_to_parameter() {
        let mut ctx = PanelContext::new(PanelConfig::default());
        let mut d = Dispatcher::new(Recorder::default());
        ctx.set_page(Page::Reinitialise, 1000);

        assert_eq!(cycle(&mut d, &mut ctx, 1000), Frame::Redrawn);
        assert_eq!(cycle(&mut d, &mut ctx, 1500), Frame::Unchanged);
        assert_eq!(cycle(&mut d, &mut ctx, 2000), Frame::Unchanged);
        assert_eq!(ctx.page(), Page::Reinitialise);

        assert_eq!(cycle(&mut d, &mut ctx, 2001), Frame::Redrawn);
        assert_eq!(ctx.page(), Page::Parameter);
        assert_eq!(d.renderer().renders, 2);
    }

    #[test]
    fn missing_view_keeps_previous_frame() {
        let mut ctx = patch_ctx();
        let mut d = Dispatcher::new(Recorder::default());
        cycle(&mut d, &mut ctx, 0);

        ctx.set_page(Page::Delete, 10);
        assert_eq!(cycle(&mut d, &mut ctx, 20), Frame::Skipped);
        assert_eq!(d.last_view().map(PageView::page), Some(Page::Patch));
        assert_eq!(d.renderer().renders, 1);
    }

    #[test]
    fn render_failure_retries_next_cycle() {
        let mut ctx = patch_ctx();
        let mut d = Dispatcher::new(Recorder {
            fail_render: true,
            ..Recorder::default()
        });

        assert_eq!(cycle(&mut d, &mut ctx, 0), Frame::Failed);
        assert_eq!(d.renderer().commits, 0);
        assert!(d.last_view().is_none());

        d.renderer_mut().fail_render = false;
        assert_eq!(cycle(&mut d, &mut ctx, 33), Frame::Redrawn);
    }

    #[test]
    fn commit_failure_is_not_fatal() {
        let mut ctx = patch_ctx();
        let mut d = Dispatcher::new(Recorder {
            fail_commit: true,
            ..Recorder::default()
        });
        assert_eq!(cycle(&mut d, &mut ctx, 0), Frame::Redrawn);
        assert_eq!(cycle(&mut d, &mut ctx, 33), Frame::Unchanged);
        assert_eq!(d.renderer().commits, 2);
    }

    #[test]
    fn start_forces_first_redraw() {
        let mut ctx = patch_ctx();
        let mut d = Dispatcher::new(Recorder::default());
        cycle(&mut d, &mut ctx, 0);

        block_on(d.start("0.1.0", &DisplayConfig::default())).unwrap();
        assert_eq!(cycle(&mut d, &mut ctx, 33), Frame::Redrawn);
    }

    #[test]
    fn failed_panel_does_not_stop_the_other() {
        let config = DisplayConfig::default();
        let dead = block_on(Dispatcher::launch(
            Recorder {
                fail_init: true,
                ..Recorder::default()
            },
            "0.1.0",
            &config,
        ));
        assert!(dead.is_none());

        let mut live = block_on(Dispatcher::launch(Recorder::default(), "0.1.0", &config)).unwrap();
        let mut ctx = patch_ctx();
        assert_eq!(cycle(&mut live, &mut ctx, 0), Frame::Redrawn);
    }

    #[test]
    fn panels_dirty_check_independently() {
        let mut ctx = patch_ctx();
        let mut a = Dispatcher::new(Recorder::default());
        let mut b = Dispatcher::new(Recorder::default());

        let view = prepare(&mut ctx, 0);
        let config = DisplayConfig::default();
        block_on(a.present(view.as_ref(), &config));
        block_on(b.present(view.as_ref(), &config));
        block_on(a.present(view.as_ref(), &config));

        b.invalidate();
        assert_eq!(block_on(b.present(view.as_ref(), &config)), Frame::Redrawn);
        assert_eq!(a.redraw_count(), 1);
        assert_eq!(b.redraw_count(), 2);
    }
}
