//! Two-level global settings menu.
//!
//! The Settings page lists options; selecting one drops to the value
//! level (SettingsValue page) where the encoder cycles that option's
//! values. Both levels render the same option/value pair; the level only
//! decides which line carries the up/down affordance.

use crate::page::Page;

/// Which level of the settings menu has the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsLevel {
    /// Encoder scrolls through options.
    #[default]
    Option,
    /// Encoder scrolls through the selected option's values.
    Value,
}

impl SettingsLevel {
    /// Page that shows this level.
    pub fn page(self) -> Page {
        match self {
            SettingsLevel::Option => Page::Settings,
            SettingsLevel::Value => Page::SettingsValue,
        }
    }
}

/// Identifies a global setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingId {
    MidiChannelIn,
    MidiChannelOut,
    MidiThru,
    EncoderDirection,
    PickUp,
    UpdateParams,
    SendNotes,
    LedIntensity,
    SliderIntensity,
}

/// A menu entry: display name and value labels.
pub struct SettingOption {
    pub id: SettingId,
    pub name: &'static str,
    pub values: &'static [&'static str],
}

const CHANNELS: [&str; 17] = [
    "All", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
];
const CHANNELS_OUT: [&str; 17] = [
    "Off", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
];
const OFF_ON: [&str; 2] = ["Off", "On"];
const LEVELS: [&str; 11] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];

/// The settings table in menu order.
pub const SETTINGS: [SettingOption; 9] = [
    SettingOption { id: SettingId::MidiChannelIn, name: "MIDI Ch In", values: &CHANNELS },
    SettingOption { id: SettingId::MidiChannelOut, name: "MIDI Ch Out", values: &CHANNELS_OUT },
    SettingOption { id: SettingId::MidiThru, name: "MIDI Thru", values: &["Off", "Full", "Same Ch", "Diff Ch"] },
    SettingOption { id: SettingId::EncoderDirection, name: "Encoder", values: &["Type 1", "Type 2"] },
    SettingOption { id: SettingId::PickUp, name: "Pick-up", values: &OFF_ON },
    SettingOption { id: SettingId::UpdateParams, name: "Update Params", values: &OFF_ON },
    SettingOption { id: SettingId::SendNotes, name: "Send Notes", values: &OFF_ON },
    SettingOption { id: SettingId::LedIntensity, name: "LED Level", values: &LEVELS },
    SettingOption { id: SettingId::SliderIntensity, name: "Slider Level", values: &LEVELS },
];

/// A committed value change, reported so the caller can persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingChange {
    pub id: SettingId,
    /// Index into the option's `values`.
    pub index: usize,
}

/// Menu cursor and the current value of every option.
pub struct SettingsMenu {
    option: usize,
    values: [usize; SETTINGS.len()],
    level: SettingsLevel,
}

impl Default for SettingsMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsMenu {
    /// Menu on the first option with every value at index 0.
    pub fn new() -> Self {
        Self {
            option: 0,
            values: [0; SETTINGS.len()],
            level: SettingsLevel::Option,
        }
    }

    /// Restore a stored value (e.g. read back from EEPROM). Out-of-range
    /// indices are clamped to the last value.
    pub fn set_value(&mut self, id: SettingId, index: usize) {
        let i = Self::index_of(id);
        self.values[i] = index.min(SETTINGS[i].values.len() - 1);
    }

    /// Current value index of `id`.
    pub fn value_index(&self, id: SettingId) -> usize {
        self.values[Self::index_of(id)]
    }

    pub fn pick_up_enabled(&self) -> bool {
        self.value_index(SettingId::PickUp) == 1
    }

    pub fn level(&self) -> SettingsLevel {
        self.level
    }

    pub fn current_id(&self) -> SettingId {
        SETTINGS[self.option].id
    }

    /// Name of the highlighted option.
    pub fn option_name(&self) -> &'static str {
        SETTINGS[self.option].name
    }

    /// Label of the highlighted option's current value.
    pub fn value_name(&self) -> &'static str {
        SETTINGS[self.option].values[self.values[self.option]]
    }

    /// Back to the option level on the first option.
    pub fn reset_cursor(&mut self) {
        self.option = 0;
        self.level = SettingsLevel::Option;
    }

    /// Toggle between option and value level; returns the new level.
    pub fn select(&mut self) -> SettingsLevel {
        self.level = match self.level {
            SettingsLevel::Option => SettingsLevel::Value,
            SettingsLevel::Value => SettingsLevel::Option,
        };
        self.level
    }

    /// Move the encoder by `delta` at the current level, wrapping.
    ///
    /// Returns the committed change when a value moved.
    pub fn scroll(&mut self, delta: i32) -> Option<SettingChange> {
        match self.level {
            SettingsLevel::Option => {
                self.option = wrap(self.option, delta, SETTINGS.len());
                None
            }
            SettingsLevel::Value => {
                let count = SETTINGS[self.option].values.len();
                let before = self.values[self.option];
                self.values[self.option] = wrap(before, delta, count);
                (self.values[self.option] != before).then(|| SettingChange {
                    id: self.current_id(),
                    index: self.values[self.option],
                })
            }
        }
    }

    fn index_of(id: SettingId) -> usize {
        SETTINGS.iter().position(|s| s.id == id).unwrap_or(0)
    }
}

fn wrap(index: usize, delta: i32, len: usize) -> usize {
    (index as i64 + delta as i64).rem_euclid(len as i64) as usize
}
