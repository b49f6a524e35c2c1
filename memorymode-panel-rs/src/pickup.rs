//! Pick-up reconciliation for front-panel pots.
//!
//! After a patch recall the stored values rarely match where the pots
//! physically sit. With pick-up enabled, a pot has no effect until it is
//! moved to within [`TOLERANCE`](crate::TOLERANCE) of the recalled value;
//! from then on it passes straight through until the next recall.
//!
//! ```text
//! target 64, tolerance 2
//!
//! reading  70  66  63  65
//!          ✗   ✓   ✓   ✓
//!              └── disarmed here, pass-through afterwards
//! ```

use crate::{N_PARAMETERS, TOLERANCE};

/// Pick-up configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PickUpConfig {
    /// Global pick-up mode (a settings option, persisted in EEPROM).
    pub enabled: bool,
    /// Window around the target in which a reading is picked up.
    pub tolerance: i32,
    /// Lowest representable reading. Default: 0.
    pub min_value: i32,
    /// Highest representable reading. Default: 127.
    pub max_value: i32,
}

impl PickUpConfig {
    /// Clamp a reading to the representable range.
    pub fn clamp(&self, v: i32) -> i32 {
        v.clamp(self.min_value, self.max_value)
    }
}

impl Default for PickUpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tolerance: TOLERANCE,
            min_value: 0,
            max_value: 127,
        }
    }
}

/// Pick-up state of a single parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PickUp {
    /// `true` while readings are held back waiting for the target.
    pub armed: bool,
    /// Value stored in the last recalled patch.
    pub target: i32,
}

/// Per-parameter pick-up state machine.
///
/// `N` is the number of controllable parameters; parameter ids index
/// `0..N`.
pub struct Reconciler<const N: usize = N_PARAMETERS> {
    config: PickUpConfig,
    states: [PickUp; N],
}

impl<const N: usize> Default for Reconciler<N> {
    fn default() -> Self {
        Self::new(PickUpConfig::default())
    }
}

impl<const N: usize> Reconciler<N> {
    pub fn new(config: PickUpConfig) -> Self {
        Self {
            config,
            states: [PickUp::default(); N],
        }
    }

    pub fn config(&self) -> &PickUpConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Turn pick-up mode on or off.
    ///
    /// Disabling drops every armed state so all readings pass through.
    /// Enabling arms nothing; the next recall does.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled == enabled {
            return;
        }
        self.config.enabled = enabled;
        if !enabled {
            self.states = [PickUp::default(); N];
        }
        #[cfg(feature = "defmt")]
        defmt::info!("pick-up {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Re-arm every parameter with the values of a newly recalled patch.
    ///
    /// `targets[i]` is the stored value of parameter `i`. Parameters past
    /// the end of `targets` are disarmed. Does nothing while pick-up mode
    /// is off.
    pub fn on_patch_recalled(&mut self, targets: &[i32]) {
        let config = self.config;
        if !config.enabled {
            return;
        }
        for (i, state) in self.states.iter_mut().enumerate() {
            *state = match targets.get(i) {
                Some(&target) => PickUp {
                    armed: true,
                    target: config.clamp(target),
                },
                None => PickUp::default(),
            };
        }
        #[cfg(feature = "defmt")]
        defmt::debug!("pick-up armed for {} parameters", targets.len().min(N));
    }

    /// Decide whether a raw reading may update parameter `id`.
    ///
    /// Returns the value to apply, or `None` when the reading must be
    /// discarded (the live value stays put and the UI is not notified).
    /// Readings are clamped to the configured range first. An unknown `id`
    /// is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use memorymode::pickup::{PickUpConfig, Reconciler};
    ///
    /// let mut r: Reconciler<4> = Reconciler::new(PickUpConfig {
    ///     enabled: true,
    ///     ..PickUpConfig::default()
    /// });
    /// r.on_patch_recalled(&[64, 0, 0, 0]);
    /// assert_eq!(r.reconcile(0, 70), None);
    /// assert_eq!(r.reconcile(0, 66), Some(66));
    /// assert_eq!(r.reconcile(0, 10), Some(10));
    /// ```
    pub fn reconcile(&mut self, id: usize, raw: i32) -> Option<i32> {
        let value = self.config.clamp(raw);
        let tolerance = self.config.tolerance;
        let enabled = self.config.enabled;

        let Some(state) = self.states.get_mut(id) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("reconcile: parameter id {} out of range", id);
            return None;
        };

        if !enabled || !state.armed {
            return Some(value);
        }

        if (value - state.target).abs() <= tolerance {
            state.armed = false;
            #[cfg(feature = "defmt")]
            defmt::debug!("parameter {} picked up at {}", id, value);
            Some(value)
        } else {
            None
        }
    }

    /// Returns `true` if parameter `id` is waiting to be picked up.
    pub fn is_armed(&self, id: usize) -> bool {
        self.states.get(id).is_some_and(|s| s.armed)
    }

    /// Number of parameters still waiting to be picked up.
    pub fn armed_count(&self) -> usize {
        self.states.iter().filter(|s| s.armed).count()
    }
}
