//! Shared page and content state.
//!
//! [`PanelContext`] is the single object both tasks see: the input task
//! writes it through the `show_*`/`set_page` methods, the render
//! dispatcher reads it once per cycle. In the firmware it sits behind an
//! `embassy_sync` mutex, so every method call is one atomic update from
//! the dispatcher's point of view and a page never renders with a torn mix
//! of old and new fields.
//!
//! # Timed transitions
//!
//! Both self-driven transitions are deadline timestamps checked by the
//! dispatcher, never asynchronous callbacks:
//!
//! - **Parameter → Patch** is display-only: [`effective_page`] returns
//!   [`Page::Patch`] once the page timer is older than the display timeout,
//!   but the stored page stays [`Page::Parameter`].
//! - **Reinitialise → Parameter** is a real transition made by
//!   [`expire`] strictly after the hold time.
//!
//! [`effective_page`]: PanelContext::effective_page
//! [`expire`]: PanelContext::expire

use crate::catalog::{DeleteView, PatchName, RecallView, SaveView};
use crate::error::PanelError;
use crate::page::Page;
use crate::settings::SettingsLevel;
use crate::{label, Label, DISPLAY_TIMEOUT_MS, REINITIALISE_HOLD_MS};

/// Timing configuration for the self-driven transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Parameter page idle time before the Patch page is shown. Default: 1500 ms.
    pub display_timeout_ms: u64,
    /// Reinitialise confirmation hold. Default: 1000 ms.
    pub reinitialise_hold_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            display_timeout_ms: DISPLAY_TIMEOUT_MS,
            reinitialise_hold_ms: REINITIALISE_HOLD_MS,
        }
    }
}

/// Whether a displayed value belongs to a synth parameter or a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterKind {
    #[default]
    Parameter,
    SettingsOption,
}

/// A parameter value as shown on the panels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterValue {
    /// Preformatted text ("Saw", "1/8", "On").
    Text(Label),
    /// Numeric value, rendered with two decimals.
    Number(f32),
}

impl Default for ParameterValue {
    fn default() -> Self {
        ParameterValue::Text(Label::new())
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::Text(label(s))
    }
}

impl From<f32> for ParameterValue {
    fn from(v: f32) -> Self {
        ParameterValue::Number(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Number(v as f32)
    }
}

impl core::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            ParameterValue::Text(s) => f.write_str(s),
            ParameterValue::Number(v) => write!(f, "{:.2}", v),
        }
    }
}

/// Content of the Parameter page.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterDisplay {
    pub name: Label,
    pub value: ParameterValue,
    pub kind: ParameterKind,
}

/// Content of the Patch page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatchSummary {
    pub program: u16,
    pub name: PatchName,
}

/// Content of the Settings/SettingsValue pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsDisplay {
    pub option: Label,
    pub value: Label,
    pub level: SettingsLevel,
}

/// Shared UI state: the active page plus everything needed to render it.
pub struct PanelContext {
    config: PanelConfig,
    page: Page,
    /// Last activity on the Parameter page (ms); `None` once a patch flow
    /// has parked the panel on the patch summary.
    page_timer_ms: Option<u64>,
    /// When the Reinitialise page was entered (ms).
    reinitialise_since_ms: Option<u64>,
    parameter: ParameterDisplay,
    patch: PatchSummary,
    settings: SettingsDisplay,
    rename_buffer: PatchName,
    recall: Option<RecallView>,
    save: Option<SaveView>,
    delete: Option<DeleteView>,
}

impl Default for PanelContext {
    fn default() -> Self {
        Self::new(PanelConfig::default())
    }
}

impl PanelContext {
    /// Context on the Parameter page with empty content and the page timer
    /// at 0 ms.
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            page: Page::Parameter,
            page_timer_ms: Some(0),
            reinitialise_since_ms: None,
            parameter: ParameterDisplay::default(),
            patch: PatchSummary::default(),
            settings: SettingsDisplay::default(),
            rename_buffer: PatchName::default(),
            recall: None,
            save: None,
            delete: None,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    // ── Page state ───────────────────────────────────────────────────

    /// The stored active page.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Make `page` active.
    ///
    /// Entering Parameter resets the page timer; entering Reinitialise
    /// starts its hold.
    pub fn set_page(&mut self, page: Page, now_ms: u64) {
        #[cfg(feature = "defmt")]
        {
            if page != self.page {
                defmt::debug!("page {} -> {}", self.page, page);
            }
        }
        self.page = page;
        match page {
            Page::Parameter => self.page_timer_ms = Some(now_ms),
            Page::Reinitialise => self.reinitialise_since_ms = Some(now_ms),
            _ => {}
        }
        if page != Page::Reinitialise {
            self.reinitialise_since_ms = None;
        }
    }

    /// Enter the Parameter page with its timer already expired.
    ///
    /// The panels show the patch summary until the next parameter change
    /// restarts the timer. Used when a patch flow (boot, recall, save,
    /// delete, rename) completes.
    pub fn return_to_patch(&mut self, now_ms: u64) {
        self.set_page(Page::Parameter, now_ms);
        self.page_timer_ms = None;
    }

    /// Set the page from its byte encoding (MIDI/EEPROM input).
    ///
    /// An unknown byte leaves the active page untouched.
    pub fn set_page_raw(&mut self, page: u8, now_ms: u64) -> Result<(), PanelError> {
        match Page::try_from(page) {
            Ok(page) => {
                self.set_page(page, now_ms);
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("set_page_raw: {}", e);
                Err(e)
            }
        }
    }

    /// The page the panels should show at `now_ms`.
    ///
    /// Identical to [`page`](Self::page) except that an idle Parameter page
    /// reads as [`Page::Patch`]. Nothing is written.
    ///
    /// # Examples
    ///
    /// ```
    /// use memorymode::{Page, PanelContext};
    ///
    /// let mut ctx = PanelContext::default();
    /// ctx.show_parameter("Cutoff", 64, Default::default(), 0);
    /// assert_eq!(ctx.effective_page(1500), Page::Parameter);
    /// assert_eq!(ctx.effective_page(1501), Page::Patch);
    /// assert_eq!(ctx.page(), Page::Parameter);
    /// ```
    pub fn effective_page(&self, now_ms: u64) -> Page {
        if self.page == Page::Parameter && self.parameter_timed_out(now_ms) {
            Page::Patch
        } else {
            self.page
        }
    }

    /// `true` once the Parameter page timer is older than the display timeout.
    pub fn parameter_timed_out(&self, now_ms: u64) -> bool {
        match self.page_timer_ms {
            Some(since) => now_ms.saturating_sub(since) > self.config.display_timeout_ms,
            None => true,
        }
    }

    /// Run the Reinitialise → Parameter self-transition if its hold has
    /// elapsed. Returns `true` when the page changed.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match (self.page, self.reinitialise_since_ms) {
            (Page::Reinitialise, Some(since))
                if now_ms.saturating_sub(since) > self.config.reinitialise_hold_ms =>
            {
                self.set_page(Page::Parameter, now_ms);
                true
            }
            _ => false,
        }
    }

    // ── Content updates ──────────────────────────────────────────────

    /// Show a parameter name and value.
    ///
    /// Resets the page timer only while the Parameter page is active. A
    /// plain parameter change arriving on a Settings page takes the panel
    /// back to the Parameter page.
    pub fn show_parameter(
        &mut self,
        name: &str,
        value: impl Into<ParameterValue>,
        kind: ParameterKind,
        now_ms: u64,
    ) {
        self.parameter = ParameterDisplay {
            name: label(name),
            value: value.into(),
            kind,
        };
        if self.page.is_settings() && kind == ParameterKind::Parameter {
            self.set_page(Page::Parameter, now_ms);
        }
        if self.page == Page::Parameter {
            self.page_timer_ms = Some(now_ms);
        }
    }

    /// Update the Patch page summary.
    pub fn show_patch_summary(&mut self, program: u16, name: &PatchName) {
        self.patch = PatchSummary {
            program,
            name: name.clone(),
        };
    }

    /// Update the settings pages. Settings have no timeout, so the page
    /// timer is left alone.
    pub fn show_settings(&mut self, option: &str, value: &str, level: SettingsLevel) {
        self.settings = SettingsDisplay {
            option: label(option),
            value: label(value),
            level,
        };
    }

    /// Update the name shown on the PatchNaming page.
    pub fn show_rename_buffer(&mut self, text: &PatchName) {
        self.rename_buffer = text.clone();
    }

    pub fn show_recall(&mut self, view: RecallView) {
        self.recall = Some(view);
    }

    pub fn show_save(&mut self, view: SaveView) {
        self.save = Some(view);
    }

    pub fn show_delete(&mut self, view: DeleteView) {
        self.delete = Some(view);
    }

    // ── Readers (render dispatcher) ──────────────────────────────────

    pub fn parameter(&self) -> &ParameterDisplay {
        &self.parameter
    }

    pub fn patch(&self) -> &PatchSummary {
        &self.patch
    }

    pub fn settings(&self) -> &SettingsDisplay {
        &self.settings
    }

    pub fn rename_buffer(&self) -> &PatchName {
        &self.rename_buffer
    }

    pub fn recall(&self) -> Option<&RecallView> {
        self.recall.as_ref()
    }

    pub fn save(&self) -> Option<&SaveView> {
        self.save.as_ref()
    }

    pub fn delete(&self) -> Option<&DeleteView> {
        self.delete.as_ref()
    }
}
