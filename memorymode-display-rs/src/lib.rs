//! Render dispatcher and panel drivers for the MemoryMode front panel.
//!
//! The panel has two displays showing the same page: an SSD1306 128×64
//! OLED ([`GraphicPanel`]) and an HD44780 20×2 LCD on a PCF8574 backpack
//! ([`CharacterPanel`]). Both implement [`PanelRenderer`]; a
//! [`Dispatcher`] per panel turns [`PageView`] snapshots of the shared
//! [`PanelContext`] into frames, redrawing only on change.
//!
//! # Quick Start
//!
//! ```ignore
//! use memorymode_display_rs::{CharacterPanel, DisplayConfig, GraphicPanel};
//!
//! // In your Embassy main:
//! let graphic = GraphicPanel::new(i2c_oled, 0x3C);
//! let character = CharacterPanel::new(i2c_lcd, Delay, 0x27);
//! spawner.spawn(display_task(graphic, character, panel_ctx, DisplayConfig::default())).unwrap();
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`].
//! - **`task`**: [`display_dispatch_task`], the Embassy render loop.
//!
//! [`PanelContext`]: memorymode::PanelContext

#![cfg_attr(not(test), no_std)]

pub mod character;
pub mod dispatcher;
#[cfg(feature = "task")]
pub mod display_task;
pub mod error;
pub mod graphic;
pub mod layout;
pub mod renderer;
pub mod view;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use character::CharacterPanel;
pub use dispatcher::{prepare, Dispatcher, Frame};
#[cfg(feature = "task")]
pub use display_task::display_dispatch_task;
pub use error::DisplayError;
pub use graphic::GraphicPanel;
pub use layout::{render_boot, render_page, DisplayConfig};
pub use renderer::PanelRenderer;
pub use view::PageView;
