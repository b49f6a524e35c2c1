use crate::error::PanelError;

/// One mutually exclusive UI page shown on the front panels.
///
/// The discriminants are the stable byte encoding accepted by
/// [`Page::try_from`]. Exactly one page is active at any time; it lives in
/// [`PanelContext`](crate::context::PanelContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Page {
    /// Default editing view: last touched parameter name and value.
    #[default]
    Parameter = 0,
    /// Idle summary: current program number and patch name.
    Patch = 1,
    /// Browsing stored patches.
    Recall = 2,
    /// Choosing the slot to save into.
    Save = 3,
    /// Confirming a patch deletion.
    Delete = 4,
    /// Busy page while the catalog renumbers after a deletion.
    DeleteMessage = 5,
    /// Editing a patch name.
    PatchNaming = 6,
    /// Transient "initialise to panel setting" confirmation.
    Reinitialise = 7,
    /// Settings menu, option level.
    Settings = 8,
    /// Settings menu, value level.
    SettingsValue = 9,
}

impl Page {
    /// All pages in encoding order.
    pub const ALL: [Page; 10] = [
        Page::Parameter,
        Page::Patch,
        Page::Recall,
        Page::Save,
        Page::Delete,
        Page::DeleteMessage,
        Page::PatchNaming,
        Page::Reinitialise,
        Page::Settings,
        Page::SettingsValue,
    ];

    /// Returns `true` for the two levels of the settings page group.
    pub fn is_settings(self) -> bool {
        matches!(self, Page::Settings | Page::SettingsValue)
    }
}

impl TryFrom<u8> for Page {
    type Error = PanelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Page::ALL
            .get(value as usize)
            .copied()
            .ok_or(PanelError::UnknownPage(value))
    }
}
