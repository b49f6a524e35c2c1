//! SSD1306 128×64 graphic panel.
//!
//! [`GraphicPanel`] wraps the [`ssd1306`] crate in async buffered-graphics
//! mode: `render` redraws the whole frame buffer with
//! [`render_page`](crate::layout::render_page), `commit` flushes it.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use ssd1306::{mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async};

use crate::error::DisplayError;
use crate::layout::{render_boot, render_page, DisplayConfig};
use crate::renderer::PanelRenderer;
use crate::view::PageView;

/// Concrete display type used internally by [`GraphicPanel`].
type Display<I2C> =
    Ssd1306Async<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsModeAsync<DisplaySize128x64>>;

/// Async SSD1306 driver over I2C.
///
/// # Lifecycle
///
/// 1. [`GraphicPanel::new()`]: no I2C traffic.
/// 2. [`init()`](PanelRenderer::init): sends the SSD1306 initialisation
///    sequence.
/// 3. [`render()`](PanelRenderer::render) into the frame buffer, then
///    [`commit()`](PanelRenderer::commit).
///
/// Commits with nothing rendered since the last flush skip the bus.
pub struct GraphicPanel<I2C> {
    display: Display<I2C>,
    initialized: bool,
    pending: bool,
}

impl<I2C> GraphicPanel<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised panel at 7-bit `address` (typically
    /// `0x3C` or `0x3D`).
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
            pending: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn fresh_buffer(&mut self) -> Result<&mut Display<I2C>, DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.display.clear_buffer();
        self.pending = true;
        Ok(&mut self.display)
    }
}

impl<I2C> PanelRenderer for GraphicPanel<I2C>
where
    I2C: I2c,
{
    type Error = DisplayError;

    async fn init(&mut self) -> Result<(), DisplayError> {
        self.display
            .init()
            .await
            .map_err(|_| DisplayError::InitializationFailed)?;
        self.initialized = true;
        Ok(())
    }

    fn render_boot(&mut self, version: &str, config: &DisplayConfig) -> Result<(), DisplayError> {
        let display = self.fresh_buffer()?;
        render_boot(display, version, config)?;
        Ok(())
    }

    fn render(&mut self, view: &PageView, config: &DisplayConfig) -> Result<(), DisplayError> {
        let display = self.fresh_buffer()?;
        render_page(display, view, config)?;
        Ok(())
    }

    /// At 400 kHz I2C a full 1024-byte frame takes about 20 ms.
    async fn commit(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if !self.pending {
            return Ok(());
        }
        self.display.flush().await?;
        self.pending = false;
        Ok(())
    }
}
