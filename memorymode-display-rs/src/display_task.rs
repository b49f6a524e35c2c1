//! Render dispatch task.
//!
//! [`display_dispatch_task`] drives both front-panel displays from the
//! shared [`PanelContext`] at a fixed cadence.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker, Timer};
use memorymode::PanelContext;

use crate::dispatcher::{prepare, Dispatcher, Frame};
use crate::layout::DisplayConfig;
use crate::renderer::PanelRenderer;

/// Periodic render loop for the graphic and character panels.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// create a thin, concrete task wrapper, since Embassy tasks cannot be
/// generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn display_task(
///     graphic: GraphicPanel<MyI2c>,
///     character: CharacterPanel<MyI2c, Delay>,
///     ctx: &'static Mutex<CriticalSectionRawMutex, PanelContext>,
///     config: DisplayConfig,
/// ) {
///     display_dispatch_task(graphic, character, ctx, config, "1.0").await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise both panels and show the boot page. A panel whose
///    initialisation fails is left dark; the other one keeps running.
/// 2. Hold the boot page for `config.startup_grace_ms`.
/// 3. Loop at `config.update_frequency_hz`:
///    - Lock `ctx`, fire the Reinitialise timeout and capture the
///      effective page. Release the mutex.
///    - Present the view to each panel: render if it changed, then commit.
///
/// # Errors
///
/// * Initialisation failure of one panel: logged; that panel is skipped.
/// * Both panels failed: logs and **returns** (task exits).
/// * Render / commit failure: logged by the dispatcher; the loop continues.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn display_dispatch_task<G, C>(
    graphic: G,
    character: C,
    ctx: &'static Mutex<CriticalSectionRawMutex, PanelContext>,
    config: DisplayConfig,
    version: &'static str,
) where
    G: PanelRenderer,
    C: PanelRenderer,
{
    // ── Initialisation ───────────────────────────────────────────────
    // A panel that fails to start is dropped; the other keeps running.
    let mut graphic = Dispatcher::launch(graphic, version, &config).await;
    let mut character = Dispatcher::launch(character, version, &config).await;
    if graphic.is_none() && character.is_none() {
        #[cfg(feature = "defmt")]
        defmt::error!("No panel initialised, display task exiting");
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("Panels initialised, boot page up");

    Timer::after(Duration::from_millis(config.startup_grace_ms)).await;

    let mut ticker = Ticker::every(Duration::from_millis(config.update_period_ms()));

    // ── Main loop ────────────────────────────────────────────────────
    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis();

        let view = {
            let mut ctx = ctx.lock().await;
            prepare(&mut ctx, now_ms)
        }; // ← mutex released here, before any I2C work

        if let Some(graphic) = graphic.as_mut() {
            if graphic.present(view.as_ref(), &config).await == Frame::Redrawn {
                #[cfg(feature = "defmt")]
                defmt::trace!("frame {}", graphic.redraw_count());
            }
        }
        if let Some(character) = character.as_mut() {
            character.present(view.as_ref(), &config).await;
        }
    }
}
