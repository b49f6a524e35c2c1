//! Front-panel event handling.
//!
//! [`PanelController`] is owned by the input task. It holds the pieces only
//! the input side writes (catalog, settings menu, pick-up reconciler,
//! browse cursors) and pushes what the panels need into the shared
//! [`PanelContext`]. Storage work (SD card reads, writes and renumbering)
//! is not done here; [`PanelController::handle`] returns a [`PanelAction`]
//! telling the firmware what to run.
//!
//! ```text
//!            Recall        Recall/Select
//! Patch ───────────► Recall ───────────► Patch   + LoadPatch(p)
//!            Save          Save/Select
//!       ───────────► Save   ───────────► Patch   + StorePatch(p)
//!            Delete        Delete/Select
//!       ───────────► Delete ───────────► DeleteMessage + RenumberStorage
//!                                              └─ finish_delete ──► Patch
//! ```

use crate::catalog::{PatchCatalog, PatchName, SaveStaging};
use crate::context::{ParameterKind, PanelContext};
use crate::error::CatalogError;
use crate::page::Page;
use crate::pickup::{PickUpConfig, Reconciler};
use crate::settings::{SettingChange, SettingId, SettingsMenu};
use crate::{DELETE_FLOOR, FIRST_PROGRAM, INIT_PATCH_NAME};

/// Characters offered by the encoder on the PatchNaming page.
const NAME_CHARSET: &[u8] =
    b" ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-+";

/// A debounced front-panel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelEvent {
    Recall,
    Save,
    Delete,
    Settings,
    Rename,
    Reinitialise,
    Back,
    /// Encoder push.
    Select,
    /// Encoder detents since the last event; positive is clockwise.
    Encoder(i32),
}

/// Work the firmware must do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelAction {
    None,
    /// Load the patch from storage, apply it, then call
    /// [`PanelController::patch_loaded`].
    LoadPatch(u16),
    /// Write the current sound to this program.
    StorePatch(u16),
    /// Remove the deleted program's file and shift every later file down,
    /// then call [`PanelController::finish_delete`].
    RenumberStorage { from: u16 },
    /// Rewrite the stored name of this program.
    RenamePatch(u16),
    /// Reload every parameter from the physical control positions.
    ReinitialiseFromPanel,
    /// Persist a changed global setting.
    SettingChanged(SettingChange),
}

/// Input-side owner of the catalog, settings and pick-up state.
pub struct PanelController {
    catalog: PatchCatalog,
    settings: SettingsMenu,
    reconciler: Reconciler,
    /// Program currently loaded.
    current: u16,
    /// Program under the Recall/Delete cursor.
    browse: u16,
    staging: Option<SaveStaging>,
    rename: PatchName,
    /// Program removed by the delete awaiting `finish_delete`.
    deleted: Option<u16>,
}

impl PanelController {
    /// Controller over a loaded catalog. Pick-up follows the settings menu.
    pub fn new(catalog: PatchCatalog, settings: SettingsMenu) -> Self {
        let reconciler = Reconciler::new(PickUpConfig {
            enabled: settings.pick_up_enabled(),
            ..PickUpConfig::default()
        });
        let current = catalog.first().map_or(FIRST_PROGRAM, |r| r.program);
        Self {
            catalog,
            settings,
            reconciler,
            current,
            browse: current,
            staging: None,
            rename: PatchName::default(),
            deleted: None,
        }
    }

    pub fn catalog(&self) -> &PatchCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &SettingsMenu {
        &self.settings
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn current_program(&self) -> u16 {
        self.current
    }

    /// Show the first patch and ask for it to be loaded.
    pub fn boot(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        let first = self.catalog.first()?;
        self.current = first.program;
        ctx.show_patch_summary(first.program, &first.name);
        ctx.return_to_patch(now_ms);
        Ok(PanelAction::LoadPatch(self.current))
    }

    /// Feed a pot reading through pick-up and show it if accepted.
    ///
    /// Returns the value to apply to the synth engine.
    pub fn pot_moved(
        &mut self,
        ctx: &mut PanelContext,
        id: usize,
        name: &str,
        raw: i32,
        now_ms: u64,
    ) -> Option<i32> {
        let value = self.reconciler.reconcile(id, raw)?;
        ctx.show_parameter(name, value, ParameterKind::Parameter, now_ms);
        Some(value)
    }

    /// A recalled patch has been applied; its values become the pick-up
    /// targets.
    pub fn patch_loaded(&mut self, targets: &[i32]) {
        self.reconciler.on_patch_recalled(targets);
    }

    /// Handle one front-panel event.
    pub fn handle(
        &mut self,
        ctx: &mut PanelContext,
        event: PanelEvent,
        now_ms: u64,
    ) -> Result<PanelAction, CatalogError> {
        let page = ctx.page();
        #[cfg(feature = "defmt")]
        defmt::debug!("event {} on page {}", event, page);

        match (event, page) {
            (PanelEvent::Recall | PanelEvent::Select, Page::Recall) => self.confirm_recall(ctx, now_ms),
            (PanelEvent::Recall, _) => self.open_recall(ctx, now_ms),

            (PanelEvent::Save | PanelEvent::Select, Page::Save) => self.confirm_save(ctx, now_ms),
            (PanelEvent::Save, _) => self.open_save(ctx, now_ms),

            (PanelEvent::Delete | PanelEvent::Select, Page::Delete) => self.confirm_delete(ctx, now_ms),
            (PanelEvent::Delete, _) => self.open_delete(ctx, now_ms),

            (PanelEvent::Rename, Page::PatchNaming) => self.confirm_rename(ctx, now_ms),
            (PanelEvent::Rename, _) => self.open_rename(ctx, now_ms),
            (PanelEvent::Select, Page::PatchNaming) => {
                if self.rename.push(NAME_CHARSET[1] as char).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("rename buffer full");
                }
                ctx.show_rename_buffer(&self.rename);
                Ok(PanelAction::None)
            }

            (PanelEvent::Settings, Page::Settings | Page::SettingsValue) => {
                ctx.set_page(Page::Parameter, now_ms);
                Ok(PanelAction::None)
            }
            (PanelEvent::Settings, _) => {
                self.settings.reset_cursor();
                self.show_settings(ctx, now_ms);
                Ok(PanelAction::None)
            }
            (PanelEvent::Select, Page::Settings | Page::SettingsValue) => {
                self.settings.select();
                self.show_settings(ctx, now_ms);
                Ok(PanelAction::None)
            }

            (PanelEvent::Reinitialise, _) => {
                ctx.set_page(Page::Reinitialise, now_ms);
                Ok(PanelAction::ReinitialiseFromPanel)
            }

            (PanelEvent::Back, _) => {
                self.staging = None;
                ctx.set_page(Page::Parameter, now_ms);
                Ok(PanelAction::None)
            }

            (PanelEvent::Encoder(delta), _) => self.turn(ctx, page, delta, now_ms),

            (PanelEvent::Select, _) => Ok(PanelAction::None),
        }
    }

    /// Leave the DeleteMessage page once storage renumbering is done.
    pub fn finish_delete(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<(), CatalogError> {
        if let Some(removed) = self.deleted.take() {
            // Later programs moved down one slot, the loaded one included.
            if removed < self.current {
                self.current -= 1;
            }
        }
        let last = self.catalog.last()?.program;
        self.current = self.current.min(last);
        self.browse = self.current;
        let record = self.catalog.get(self.current)?;
        ctx.show_patch_summary(record.program, &record.name);
        ctx.return_to_patch(now_ms);
        Ok(())
    }

    // ── Recall ───────────────────────────────────────────────────────

    fn open_recall(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        self.browse = self.current;
        ctx.show_recall(self.catalog.recall_view(self.browse)?);
        ctx.set_page(Page::Recall, now_ms);
        Ok(PanelAction::None)
    }

    fn confirm_recall(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        let record = self.catalog.get(self.browse)?;
        self.current = record.program;
        ctx.show_patch_summary(record.program, &record.name);
        ctx.return_to_patch(now_ms);
        Ok(PanelAction::LoadPatch(self.current))
    }

    // ── Save ─────────────────────────────────────────────────────────

    fn open_save(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        let staging = self.catalog.stage_save();
        ctx.show_save(staging.view(&self.catalog)?);
        self.staging = Some(staging);
        ctx.set_page(Page::Save, now_ms);
        Ok(PanelAction::None)
    }

    fn confirm_save(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        let Some(staging) = self.staging.take() else {
            return self.open_save(ctx, now_ms);
        };
        let target = staging.target(&self.catalog)?;
        let name = match self.catalog.get(self.current) {
            Ok(record) => record.name.clone(),
            Err(_) => PatchName::new(INIT_PATCH_NAME)?,
        };
        self.catalog.save(target.program, name.clone())?;
        self.current = target.program;
        ctx.show_patch_summary(target.program, &name);
        ctx.return_to_patch(now_ms);
        Ok(PanelAction::StorePatch(target.program))
    }

    // ── Delete ───────────────────────────────────────────────────────

    fn open_delete(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        if self.catalog.len() <= DELETE_FLOOR {
            return Err(CatalogError::DeleteFloor);
        }
        self.browse = self.current;
        ctx.show_delete(self.catalog.delete_view(self.browse)?);
        ctx.set_page(Page::Delete, now_ms);
        Ok(PanelAction::None)
    }

    fn confirm_delete(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        let program = self.browse;
        ctx.set_page(Page::DeleteMessage, now_ms);
        if let Err(e) = self.catalog.delete(program) {
            ctx.return_to_patch(now_ms);
            return Err(e);
        }
        self.deleted = Some(program);
        Ok(PanelAction::RenumberStorage { from: program })
    }

    // ── Rename ───────────────────────────────────────────────────────

    fn open_rename(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        self.rename = self.catalog.get(self.current)?.name.clone();
        ctx.show_rename_buffer(&self.rename);
        ctx.set_page(Page::PatchNaming, now_ms);
        Ok(PanelAction::None)
    }

    fn confirm_rename(&mut self, ctx: &mut PanelContext, now_ms: u64) -> Result<PanelAction, CatalogError> {
        self.catalog.rename(self.current, self.rename.clone())?;
        ctx.show_patch_summary(self.current, &self.rename);
        ctx.return_to_patch(now_ms);
        Ok(PanelAction::RenamePatch(self.current))
    }

    // ── Encoder ──────────────────────────────────────────────────────

    fn turn(
        &mut self,
        ctx: &mut PanelContext,
        page: Page,
        delta: i32,
        now_ms: u64,
    ) -> Result<PanelAction, CatalogError> {
        match page {
            Page::Recall => {
                self.browse = self.catalog.neighbor(self.browse, delta)?.program;
                ctx.show_recall(self.catalog.recall_view(self.browse)?);
            }
            Page::Delete => {
                self.browse = self.catalog.neighbor(self.browse, delta)?.program;
                ctx.show_delete(self.catalog.delete_view(self.browse)?);
            }
            Page::Save => {
                if let Some(staging) = self.staging.as_mut() {
                    staging.scroll(delta);
                    ctx.show_save(staging.view(&self.catalog)?);
                }
            }
            Page::PatchNaming => {
                let last = self.rename.pop().unwrap_or(' ');
                let pos = NAME_CHARSET.iter().position(|&c| c as char == last).unwrap_or(0);
                let next = (pos as i64 + delta as i64).rem_euclid(NAME_CHARSET.len() as i64);
                self.rename.push(NAME_CHARSET[next as usize] as char)?;
                ctx.show_rename_buffer(&self.rename);
            }
            Page::Settings | Page::SettingsValue => {
                let change = self.settings.scroll(delta);
                self.show_settings(ctx, now_ms);
                if let Some(change) = change {
                    if change.id == SettingId::PickUp {
                        self.reconciler.set_enabled(self.settings.pick_up_enabled());
                    }
                    return Ok(PanelAction::SettingChanged(change));
                }
            }
            _ => {}
        }
        Ok(PanelAction::None)
    }

    fn show_settings(&self, ctx: &mut PanelContext, now_ms: u64) {
        let level = self.settings.level();
        ctx.show_settings(self.settings.option_name(), self.settings.value_name(), level);
        ctx.set_page(level.page(), now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(n: usize) -> (PanelController, PanelContext) {
        let names = ["Brass", "Strings", "Bass", "Lead", "Pad"];
        let catalog = PatchCatalog::from_names(names.iter().copied().take(n)).unwrap();
        let mut controller = PanelController::new(catalog, SettingsMenu::new());
        let mut ctx = PanelContext::default();
        assert_eq!(controller.boot(&mut ctx, 0), Ok(PanelAction::LoadPatch(1)));
        (controller, ctx)
    }

    #[test]
    fn boot_shows_first_patch() {
        let (_, ctx) = setup(3);
        assert_eq!(ctx.page(), Page::Parameter);
        assert_eq!(ctx.effective_page(0), Page::Patch);
        assert_eq!(ctx.patch().program, 1);
        assert_eq!(ctx.patch().name.as_str(), "Brass");
    }

    #[test]
    fn boot_on_empty_catalog_fails() {
        let mut controller = PanelController::new(PatchCatalog::new(), SettingsMenu::new());
        let mut ctx = PanelContext::default();
        assert_eq!(controller.boot(&mut ctx, 0), Err(CatalogError::EmptyCatalog));
    }

    #[test]
    fn recall_browse_and_confirm() {
        let (mut c, mut ctx) = setup(4);
        c.handle(&mut ctx, PanelEvent::Recall, 10).unwrap();
        assert_eq!(ctx.page(), Page::Recall);
        assert_eq!(ctx.recall().unwrap().selected.program, 1);

        c.handle(&mut ctx, PanelEvent::Encoder(2), 20).unwrap();
        assert_eq!(ctx.recall().unwrap().selected.program, 3);
        c.handle(&mut ctx, PanelEvent::Encoder(9), 30).unwrap();
        assert_eq!(ctx.recall().unwrap().selected.program, 4);

        let action = c.handle(&mut ctx, PanelEvent::Select, 40).unwrap();
        assert_eq!(action, PanelAction::LoadPatch(4));
        assert_eq!(ctx.effective_page(40), Page::Patch);
        assert_eq!(ctx.patch().name.as_str(), "Lead");
        assert_eq!(c.current_program(), 4);
    }

    #[test]
    fn save_to_fresh_slot() {
        let (mut c, mut ctx) = setup(3);
        c.handle(&mut ctx, PanelEvent::Save, 10).unwrap();
        assert_eq!(ctx.page(), Page::Save);
        let view = ctx.save().unwrap();
        assert_eq!(view.previous.as_ref().unwrap().program, 3);
        assert_eq!(view.target.program, 4);

        let action = c.handle(&mut ctx, PanelEvent::Save, 20).unwrap();
        assert_eq!(action, PanelAction::StorePatch(4));
        assert_eq!(c.catalog().len(), 4);
        assert_eq!(c.catalog().last().unwrap().name.as_str(), "Brass");
        assert_eq!(ctx.patch().program, 4);
    }

    #[test]
    fn save_overwrites_after_scrolling() {
        let (mut c, mut ctx) = setup(3);
        c.handle(&mut ctx, PanelEvent::Save, 10).unwrap();
        c.handle(&mut ctx, PanelEvent::Encoder(-2), 20).unwrap();
        assert_eq!(ctx.save().unwrap().target.program, 2);
        let action = c.handle(&mut ctx, PanelEvent::Select, 30).unwrap();
        assert_eq!(action, PanelAction::StorePatch(2));
        assert_eq!(c.catalog().len(), 3);
    }

    #[test]
    fn delete_flow_renumbers_and_returns_to_patch() {
        let (mut c, mut ctx) = setup(4);
        c.handle(&mut ctx, PanelEvent::Delete, 10).unwrap();
        c.handle(&mut ctx, PanelEvent::Encoder(1), 20).unwrap();
        assert_eq!(ctx.delete().unwrap().candidate.program, 2);

        let action = c.handle(&mut ctx, PanelEvent::Delete, 30).unwrap();
        assert_eq!(action, PanelAction::RenumberStorage { from: 2 });
        assert_eq!(ctx.page(), Page::DeleteMessage);
        assert_eq!(c.catalog().len(), 3);

        c.finish_delete(&mut ctx, 40).unwrap();
        assert_eq!(ctx.effective_page(40), Page::Patch);
        assert_eq!(c.catalog().get(2).unwrap().name.as_str(), "Bass");
    }

    #[test]
    fn finish_delete_clamps_current_program() {
        let (mut c, mut ctx) = setup(3);
        c.handle(&mut ctx, PanelEvent::Recall, 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Encoder(5), 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Select, 0).unwrap();
        assert_eq!(c.current_program(), 3);

        c.handle(&mut ctx, PanelEvent::Delete, 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Select, 0).unwrap();
        c.finish_delete(&mut ctx, 0).unwrap();
        assert_eq!(c.current_program(), 2);
        assert_eq!(ctx.patch().program, 2);
    }

    #[test]
    fn delete_below_current_follows_loaded_patch() {
        let (mut c, mut ctx) = setup(4);
        c.handle(&mut ctx, PanelEvent::Recall, 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Encoder(2), 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Select, 0).unwrap();
        assert_eq!(ctx.patch().name.as_str(), "Bass");

        c.handle(&mut ctx, PanelEvent::Delete, 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Encoder(-5), 0).unwrap();
        assert_eq!(ctx.delete().unwrap().candidate.program, 1);
        c.handle(&mut ctx, PanelEvent::Select, 0).unwrap();
        c.finish_delete(&mut ctx, 0).unwrap();

        assert_eq!(c.current_program(), 2);
        assert_eq!(ctx.patch().program, 2);
        assert_eq!(ctx.patch().name.as_str(), "Bass");
    }

    #[test]
    fn delete_above_current_keeps_loaded_patch() {
        let (mut c, mut ctx) = setup(4);
        c.handle(&mut ctx, PanelEvent::Delete, 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Encoder(2), 0).unwrap();
        c.handle(&mut ctx, PanelEvent::Select, 0).unwrap();
        c.finish_delete(&mut ctx, 0).unwrap();
        assert_eq!(c.current_program(), 1);
        assert_eq!(ctx.patch().name.as_str(), "Brass");
    }

    #[test]
    fn pot_move_after_recall_shows_parameter_page() {
        let (mut c, mut ctx) = setup(3);
        c.handle(&mut ctx, PanelEvent::Recall, 10).unwrap();
        c.handle(&mut ctx, PanelEvent::Select, 20).unwrap();
        assert_eq!(ctx.effective_page(21), Page::Patch);

        assert_eq!(c.pot_moved(&mut ctx, 0, "Cutoff", 90, 100), Some(90));
        assert_eq!(ctx.effective_page(101), Page::Parameter);
        assert_eq!(ctx.parameter().name.as_str(), "Cutoff");
        // Idle again: the patch summary comes back.
        assert_eq!(ctx.effective_page(1601), Page::Patch);
    }

    #[test]
    fn pot_move_after_every_patch_flow_is_shown() {
        let (mut c, mut ctx) = setup(3);
        assert!(c.pot_moved(&mut ctx, 0, "Cutoff", 10, 5).is_some());
        assert_eq!(ctx.effective_page(6), Page::Parameter);

        c.handle(&mut ctx, PanelEvent::Save, 10).unwrap();
        c.handle(&mut ctx, PanelEvent::Select, 20).unwrap();
        c.pot_moved(&mut ctx, 1, "Resonance", 11, 30);
        assert_eq!(ctx.effective_page(31), Page::Parameter);

        c.handle(&mut ctx, PanelEvent::Rename, 40).unwrap();
        c.handle(&mut ctx, PanelEvent::Rename, 50).unwrap();
        c.pot_moved(&mut ctx, 1, "Resonance", 12, 60);
        assert_eq!(ctx.effective_page(61), Page::Parameter);

        c.handle(&mut ctx, PanelEvent::Delete, 70).unwrap();
        c.handle(&mut ctx, PanelEvent::Select, 80).unwrap();
        c.finish_delete(&mut ctx, 90).unwrap();
        c.pot_moved(&mut ctx, 1, "Resonance", 13, 100);
        assert_eq!(ctx.effective_page(101), Page::Parameter);
    }

    #[test]
    fn delete_refused_at_floor() {
        let (mut c, mut ctx) = setup(1);
        assert_eq!(
            c.handle(&mut ctx, PanelEvent::Delete, 10),
            Err(CatalogError::DeleteFloor)
        );
        assert_eq!(ctx.effective_page(10), Page::Patch);
    }

    #[test]
    fn rename_edits_last_character() {
        let (mut c, mut ctx) = setup(2);
        c.handle(&mut ctx, PanelEvent::Rename, 10).unwrap();
        assert_eq!(ctx.page(), Page::PatchNaming);
        assert_eq!(ctx.rename_buffer().as_str(), "Brass");

        c.handle(&mut ctx, PanelEvent::Select, 20).unwrap();
        assert_eq!(ctx.rename_buffer().as_str(), "BrassA");
        c.handle(&mut ctx, PanelEvent::Encoder(1), 30).unwrap();
        assert_eq!(ctx.rename_buffer().as_str(), "BrassB");

        let action = c.handle(&mut ctx, PanelEvent::Rename, 40).unwrap();
        assert_eq!(action, PanelAction::RenamePatch(1));
        assert_eq!(c.catalog().first().unwrap().name.as_str(), "BrassB");
    }

    #[test]
    fn settings_pick_up_toggle_reaches_reconciler() {
        let (mut c, mut ctx) = setup(2);
        c.handle(&mut ctx, PanelEvent::Settings, 10).unwrap();
        assert_eq!(ctx.page(), Page::Settings);
        c.handle(&mut ctx, PanelEvent::Encoder(4), 20).unwrap();
        assert_eq!(ctx.settings().option.as_str(), "Pick-up");

        c.handle(&mut ctx, PanelEvent::Select, 30).unwrap();
        assert_eq!(ctx.page(), Page::SettingsValue);
        let action = c.handle(&mut ctx, PanelEvent::Encoder(1), 40).unwrap();
        assert!(matches!(action, PanelAction::SettingChanged(_)));
        assert!(c.reconciler().is_enabled());

        c.patch_loaded(&[64; 4]);
        assert_eq!(c.pot_moved(&mut ctx, 0, "Cutoff", 70, 50), None);
        assert_eq!(c.pot_moved(&mut ctx, 0, "Cutoff", 66, 60), Some(66));
        assert_eq!(ctx.page(), Page::Parameter);
    }

    #[test]
    fn rejected_pot_reading_does_not_touch_display() {
        let (mut c, mut ctx) = setup(2);
        c.settings.set_value(SettingId::PickUp, 1);
        c.reconciler.set_enabled(true);
        c.patch_loaded(&[0; 4]);
        assert_eq!(c.pot_moved(&mut ctx, 1, "Emphasis", 100, 10), None);
        assert_eq!(ctx.parameter().name.as_str(), "");
        assert_eq!(ctx.effective_page(10), Page::Patch);
    }

    #[test]
    fn reinitialise_and_back() {
        let (mut c, mut ctx) = setup(2);
        let action = c.handle(&mut ctx, PanelEvent::Reinitialise, 10).unwrap();
        assert_eq!(action, PanelAction::ReinitialiseFromPanel);
        assert_eq!(ctx.page(), Page::Reinitialise);
        c.handle(&mut ctx, PanelEvent::Back, 20).unwrap();
        assert_eq!(ctx.page(), Page::Parameter);
    }
}
