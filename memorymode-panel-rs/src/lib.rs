//! Front-panel state for the MemoryMode synthesizer.
//!
//! This crate holds everything the panel needs to decide *what* to show,
//! independent of *how* it is drawn:
//!
//! - [`page::Page`]: the mutually exclusive UI pages.
//! - [`context::PanelContext`]: the shared page/content state written by
//!   the input task and read by the render dispatcher.
//! - [`pickup::Reconciler`]: the pick-up discipline that stops a pot from
//!   jumping a freshly recalled value.
//! - [`catalog::PatchCatalog`]: the ordered, contiguously numbered patch
//!   list and its browsing views.
//! - [`settings::SettingsMenu`]: the two-level global settings menu.
//! - [`controller::PanelController`]: maps front-panel events onto the
//!   above and reports which storage work the firmware must do.
//!
//! # Data flow
//!
//! ```text
//! pot / button / encoder
//!        │
//!        ▼
//!  Reconciler ──► PanelController ──► PanelContext ──► render dispatcher
//!  (accept?)       (transitions)       (shared, mutex)     (memorymode-display-rs)
//! ```
//!
//! # `no_std` Compatibility
//!
//! No heap allocation. Text is stored in [`heapless::String`] and the
//! catalog in a [`heapless::Vec`] sized by [`MAX_PATCHES`]. The optional
//! `defmt` feature enables structured logging on embedded targets.

#![cfg_attr(not(test), no_std)]

pub mod catalog;
pub mod context;
pub mod controller;
pub mod error;
pub mod page;
pub mod pickup;
pub mod settings;

pub use catalog::{PatchCatalog, PatchName, PatchRecord};
pub use context::{PanelConfig, PanelContext};
pub use controller::{PanelAction, PanelController, PanelEvent};
pub use error::{CatalogError, PanelError};
pub use page::Page;
pub use pickup::{PickUpConfig, Reconciler};
pub use settings::{SettingsLevel, SettingsMenu};

/// Lowest program number in the catalog. Programs run contiguously from here.
pub const FIRST_PROGRAM: u16 = 1;

/// Maximum number of stored patches.
pub const MAX_PATCHES: usize = 128;

/// Maximum patch name length in UTF-8 bytes. The panels draw ASCII, where
/// this is also the character count (graphic panel line width).
pub const PATCH_NAME_MAX_LEN: usize = 16;

/// The catalog never shrinks below this many records.
pub const DELETE_FLOOR: usize = 1;

/// Name given to a freshly staged save slot.
pub const INIT_PATCH_NAME: &str = "Initial Patch";

/// Maximum length of a parameter name or value label.
pub const LABEL_LEN: usize = 20;

/// Idle time (ms) after which the Parameter page shows the Patch page.
pub const DISPLAY_TIMEOUT_MS: u64 = 1500;

/// How long (ms) the Reinitialise confirmation stays up.
pub const REINITIALISE_HOLD_MS: u64 = 1000;

/// Pick-up window: a control is picked up within this distance of the target.
pub const TOLERANCE: i32 = 2;

/// Number of pick-up controlled parameters (front-panel pots).
pub const N_PARAMETERS: usize = 48;

/// Fixed-capacity label type used for parameter names and values.
pub type Label = heapless::String<LABEL_LEN>;

/// Copy `text` into a [`Label`], truncating at [`LABEL_LEN`] bytes on a
/// character boundary.
pub fn label(text: &str) -> Label {
    let mut out = Label::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
