//! Explicit application state: inventory, system configuration and the last
//! sizing result.
//!
//! Every method is an in-memory transition; persistence is left to
//! [`crate::session::Session`].

use serde::{Deserialize, Serialize};

use crate::devices::{Classifier, Device, DeviceDraft, DevicePatch};
use crate::error::SolarError;
use crate::inventory::Inventory;
use crate::sizing::{self, ConsumptionSummary, SizingResult};
use crate::system::{SystemConfig, SystemConfigPatch};

/// Complete persisted state of one sizing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarState {
    /// System parameters.
    pub config: SystemConfig,
    /// Device inventory.
    pub devices: Inventory,
    /// Last computed sizing result, if any.
    pub results: Option<SizingResult>,
    /// Set when the inventory or config changed after `results` was computed.
    pub results_stale: bool,
}

impl SolarState {
    /// Fresh state with the given configuration and no devices.
    pub fn with_config(config: SystemConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The last result, only if it still matches the inventory and config.
    pub fn current_results(&self) -> Option<&SizingResult> {
        if self.results_stale {
            None
        } else {
            self.results.as_ref()
        }
    }

    fn invalidate(&mut self) {
        if self.results.is_some() {
            self.results_stale = true;
        }
    }

    /// Validates and appends a device, returning its index.
    ///
    /// # Errors
    ///
    /// [`SolarError::Validation`]; the state is unchanged.
    pub fn add_device(&mut self, draft: DeviceDraft) -> Result<usize, SolarError> {
        let index = self.devices.add(draft)?;
        self.invalidate();
        Ok(index)
    }

    /// Validates and appends a batch of devices as one transition.
    ///
    /// # Errors
    ///
    /// [`SolarError::Validation`] for the first bad draft; the state is
    /// unchanged.
    pub fn import_devices(&mut self, drafts: Vec<DeviceDraft>) -> Result<usize, SolarError> {
        let added = self.devices.add_all(drafts)?;
        if added > 0 {
            self.invalidate();
        }
        Ok(added)
    }

    /// Merges `patch` into the device at `index`.
    ///
    /// # Errors
    ///
    /// [`SolarError::IndexOutOfRange`] or [`SolarError::Validation`]; the state
    /// is unchanged.
    pub fn update_device(&mut self, index: usize, patch: &DevicePatch) -> Result<(), SolarError> {
        self.devices.update(index, patch)?;
        self.invalidate();
        Ok(())
    }

    /// Removes the device at `index`.
    ///
    /// # Errors
    ///
    /// [`SolarError::IndexOutOfRange`]; the state is unchanged.
    pub fn remove_device(&mut self, index: usize) -> Result<Device, SolarError> {
        let removed = self.devices.remove(index)?;
        self.invalidate();
        Ok(removed)
    }

    /// Applies a configuration patch as a whole.
    ///
    /// # Errors
    ///
    /// [`SolarError::InvalidConfig`]; the state is unchanged.
    pub fn update_config(&mut self, patch: &SystemConfigPatch) -> Result<(), SolarError> {
        let config = self.config.apply(patch)?;
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
        Ok(())
    }

    /// Consumption totals for the current inventory.
    pub fn summary(&self, classifier: &Classifier) -> ConsumptionSummary {
        sizing::aggregate(self.devices.devices(), classifier)
    }

    /// Recomputes and stores the sizing result.
    ///
    /// # Errors
    ///
    /// [`SolarError::EmptyInventory`] or [`SolarError::InvalidConfig`]; the
    /// previous result is kept untouched.
    pub fn calculate(&mut self, classifier: &Classifier) -> Result<&SizingResult, SolarError> {
        let result = sizing::calculate(self.devices.devices(), &self.config, classifier)?;
        self.results_stale = false;
        Ok(self.results.insert(result))
    }

    /// Clears the inventory and the result; the configuration is kept.
    pub fn reset(&mut self) {
        self.devices.clear();
        self.results = None;
        self.results_stale = false;
    }
}
