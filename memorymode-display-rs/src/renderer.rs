//! The seam between the dispatcher and a physical panel.

use crate::layout::DisplayConfig;
use crate::view::PageView;

/// A front-panel display the dispatcher can draw on.
///
/// Drawing is split in two: [`render`](Self::render) prepares a frame
/// (frame buffer, shadow text buffer) without bus traffic, and
/// [`commit`](Self::commit) pushes whatever is pending to the hardware.
/// The dispatcher calls `render` only when the page content changed, but
/// calls `commit` every cycle, so `commit` must be cheap when nothing is
/// pending.
#[allow(async_fn_in_trait)]
pub trait PanelRenderer {
    type Error;

    /// Send the hardware initialisation sequence.
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Prepare the boot splash carrying the firmware `version`.
    fn render_boot(&mut self, version: &str, config: &DisplayConfig) -> Result<(), Self::Error>;

    /// Prepare a frame for `view`.
    fn render(&mut self, view: &PageView, config: &DisplayConfig) -> Result<(), Self::Error>;

    /// Transfer the prepared frame to the panel.
    async fn commit(&mut self) -> Result<(), Self::Error>;
}
