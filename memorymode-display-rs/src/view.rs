//! Page snapshots.
//!
//! A [`PageView`] holds exactly the fields one page draws, copied out of
//! the shared [`PanelContext`] while its lock is held. Comparing two
//! views is therefore the per-page dirty check: a parameter value change
//! dirties the Parameter view but not a Recall view.

use core::fmt::{self, Write};

use heapless::String;
use memorymode::catalog::{DeleteView, PatchName, PatchRecord, RecallView, SaveView};
use memorymode::context::{ParameterDisplay, PatchSummary, SettingsDisplay};
use memorymode::{Page, PanelContext, SettingsLevel};

/// Columns of the character panel.
pub const CHAR_COLS: usize = 20;

/// Rows of the character panel.
pub const CHAR_ROWS: usize = 2;

/// One line of character-panel text.
pub type TextLine = String<CHAR_COLS>;

/// Everything one page needs to draw a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Parameter(ParameterDisplay),
    Patch(PatchSummary),
    Recall(RecallView),
    Save(SaveView),
    Delete(DeleteView),
    DeleteMessage,
    PatchNaming(PatchName),
    Reinitialise,
    /// Settings and SettingsValue; `level` selects the affordance.
    Settings(SettingsDisplay),
}

impl PageView {
    /// Snapshot the page the context shows at `now_ms`.
    ///
    /// Parameter past its display timeout captures the Patch page. Returns
    /// `None` when the page has no content yet (a catalog page opened
    /// before its view was handed over).
    pub fn capture(ctx: &PanelContext, now_ms: u64) -> Option<Self> {
        let view = match ctx.effective_page(now_ms) {
            Page::Parameter => PageView::Parameter(ctx.parameter().clone()),
            Page::Patch => PageView::Patch(ctx.patch().clone()),
            Page::Recall => PageView::Recall(ctx.recall()?.clone()),
            Page::Save => PageView::Save(ctx.save()?.clone()),
            Page::Delete => PageView::Delete(ctx.delete()?.clone()),
            Page::DeleteMessage => PageView::DeleteMessage,
            Page::PatchNaming => PageView::PatchNaming(ctx.rename_buffer().clone()),
            Page::Reinitialise => PageView::Reinitialise,
            page @ (Page::Settings | Page::SettingsValue) => {
                let mut settings = ctx.settings().clone();
                settings.level = if page == Page::SettingsValue {
                    SettingsLevel::Value
                } else {
                    SettingsLevel::Option
                };
                PageView::Settings(settings)
            }
        };
        Some(view)
    }

    /// The page this view draws.
    pub fn page(&self) -> Page {
        match self {
            PageView::Parameter(_) => Page::Parameter,
            PageView::Patch(_) => Page::Patch,
            PageView::Recall(_) => Page::Recall,
            PageView::Save(_) => Page::Save,
            PageView::Delete(_) => Page::Delete,
            PageView::DeleteMessage => Page::DeleteMessage,
            PageView::PatchNaming(_) => Page::PatchNaming,
            PageView::Reinitialise => Page::Reinitialise,
            PageView::Settings(s) => s.level.page(),
        }
    }

    /// The two lines shown on the character panel.
    ///
    /// ```text
    /// Parameter      Recall          Save / Delete
    /// ┌──────────┐   ┌──────────┐   ┌──────────┐
    /// │Cutoff    │   │003>Brass │   │002 Bass  │  ← previous
    /// │64.00     │   │004 Pad   │   │003>Brass │  ← target / candidate
    /// └──────────┘   └──────────┘   └──────────┘
    /// ```
    pub fn text_lines(&self) -> [TextLine; CHAR_ROWS] {
        match self {
            PageView::Parameter(p) => [line(format_args!("{}", p.name)), line(format_args!("{}", p.value))],
            PageView::Patch(p) => [
                line(format_args!("Patch {:03}", p.program)),
                line(format_args!("{}", p.name.as_str())),
            ],
            PageView::Recall(v) => [record_line(Some(&v.selected), '>'), record_line(v.next.as_ref(), ' ')],
            PageView::Save(v) => [record_line(v.previous.as_ref(), ' '), record_line(Some(&v.target), '>')],
            PageView::Delete(v) => [
                record_line(v.previous.as_ref(), ' '),
                record_line(Some(&v.candidate), '>'),
            ],
            PageView::DeleteMessage => [line(format_args!("Renumbering")), line(format_args!("SD Card"))],
            PageView::PatchNaming(name) => [
                line(format_args!("Rename Patch")),
                line(format_args!("{}", name.as_str())),
            ],
            PageView::Reinitialise => [
                line(format_args!("Initialise to")),
                line(format_args!("panel setting")),
            ],
            PageView::Settings(s) => {
                let (top, bottom) = match s.level {
                    SettingsLevel::Option => ('>', ' '),
                    SettingsLevel::Value => (' ', '>'),
                };
                [
                    line(format_args!("{}{}", top, s.option)),
                    line(format_args!("{}{}", bottom, s.value)),
                ]
            }
        }
    }
}

/// `"003>Brass"`, or a blank line for a missing neighbour.
fn record_line(record: Option<&PatchRecord>, marker: char) -> TextLine {
    match record {
        Some(r) => line(format_args!("{:03}{}{}", r.program, marker, r.name.as_str())),
        None => TextLine::new(),
    }
}

/// Format into a [`TextLine`], dropping whatever does not fit.
pub(crate) fn line(args: fmt::Arguments<'_>) -> TextLine {
    let mut out = TextLine::new();
    let _ = Truncate(&mut out).write_fmt(args);
    out
}

struct Truncate<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncate<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memorymode::context::ParameterKind;
    use memorymode::{PanelConfig, PatchCatalog};

    fn ctx() -> PanelContext {
        PanelContext::new(PanelConfig::default())
    }

    #[test]
    fn parameter_degrades_to_patch_after_timeout() {
        let mut c = ctx();
        c.show_patch_summary(3, &PatchName::new("Brass").unwrap());
        c.show_parameter("Cutoff", 64, ParameterKind::Parameter, 0);

        assert!(matches!(PageView::capture(&c, 1500), Some(PageView::Parameter(_))));
        let late = PageView::capture(&c, 1501).unwrap();
        assert_eq!(late.page(), Page::Patch);
        assert_eq!(c.page(), Page::Parameter);
    }

    #[test]
    fn catalog_page_without_content_has_no_view() {
        let mut c = ctx();
        c.set_page(Page::Recall, 0);
        assert_eq!(PageView::capture(&c, 0), None);

        let catalog = PatchCatalog::from_names(["A", "B", "C"]).unwrap();
        c.show_recall(catalog.recall_view(2).unwrap());
        assert!(matches!(PageView::capture(&c, 0), Some(PageView::Recall(_))));
    }

    #[test]
    fn settings_level_follows_page() {
        let mut c = ctx();
        c.show_settings("Pick-up", "Off", SettingsLevel::Option);
        c.set_page(Page::SettingsValue, 0);
        let view = PageView::capture(&c, 0).unwrap();
        assert_eq!(view.page(), Page::SettingsValue);
        match view {
            PageView::Settings(s) => assert_eq!(s.level, SettingsLevel::Value),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn unrelated_change_keeps_view_equal() {
        let mut c = ctx();
        c.show_patch_summary(1, &PatchName::new("Init").unwrap());
        c.set_page(Page::Patch, 0);
        let before = PageView::capture(&c, 0);
        c.show_rename_buffer(&PatchName::new("Other").unwrap());
        assert_eq!(PageView::capture(&c, 10), before);
    }

    #[test]
    fn recall_lines_mark_selection() {
        let catalog = PatchCatalog::from_names(["Init", "Bass", "Brass", "Pad"]).unwrap();
        let view = PageView::Recall(catalog.recall_view(3).unwrap());
        let [top, bottom] = view.text_lines();
        assert_eq!(top.as_str(), "003>Brass");
        assert_eq!(bottom.as_str(), "004 Pad");

        let last = PageView::Recall(catalog.recall_view(4).unwrap());
        assert_eq!(last.text_lines()[1].as_str(), "");
    }

    #[test]
    fn long_lines_are_truncated() {
        let l = line(format_args!("{}", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"));
        assert_eq!(l.as_str(), "ABCDEFGHIJKLMNOPQRST");
    }

    #[test]
    fn fixed_pages_have_fixed_text() {
        let [a, b] = PageView::DeleteMessage.text_lines();
        assert_eq!((a.as_str(), b.as_str()), ("Renumbering", "SD Card"));
        let [a, b] = PageView::Reinitialise.text_lines();
        assert_eq!((a.as_str(), b.as_str()), ("Initialise to", "panel setting"));
    }
}
