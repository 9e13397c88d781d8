//! Ordered device inventory with validated add/update/remove.

use serde::{Deserialize, Serialize};

use crate::devices::{Device, DeviceDraft, DevicePatch};
use crate::error::SolarError;

/// Ordered list of validated devices.
///
/// Indices shift down after a removal, so callers must not hold on to an
/// index across mutations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    devices: Vec<Device>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn get(&self, index: usize) -> Option<&Device> {
        self.devices.get(index)
    }

    fn check_index(&self, index: usize) -> Result<(), SolarError> {
        if index >= self.devices.len() {
            return Err(SolarError::IndexOutOfRange {
                index,
                len: self.devices.len(),
            });
        }
        Ok(())
    }

    /// Validates `draft` and appends it, returning the new device's index.
    ///
    /// # Errors
    ///
    /// Returns [`SolarError::Validation`] and leaves the inventory unchanged
    /// when the draft is invalid.
    pub fn add(&mut self, draft: DeviceDraft) -> Result<usize, SolarError> {
        let device = Device::try_from(draft)?;
        self.devices.push(device);
        Ok(self.devices.len() - 1)
    }

    /// Validates every draft, then appends them all. Returns how many were
    /// added.
    ///
    /// # Errors
    ///
    /// [`SolarError::Validation`] naming the first bad entry (0-based); no
    /// device is added.
    pub fn add_all(
        &mut self,
        drafts: impl IntoIterator<Item = DeviceDraft>,
    ) -> Result<usize, SolarError> {
        let devices = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| {
                Device::try_from(draft).map_err(|e| match e {
                    SolarError::Validation(msg) => {
                        SolarError::Validation(format!("entry {i}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let added = devices.len();
        self.devices.extend(devices);
        Ok(added)
    }

    /// Merges `patch` onto the device at `index` and replaces it in place.
    ///
    /// The merged record is validated as a whole; on failure nothing changes.
    ///
    /// # Errors
    ///
    /// [`SolarError::IndexOutOfRange`] or [`SolarError::Validation`].
    pub fn update(&mut self, index: usize, patch: &DevicePatch) -> Result<(), SolarError> {
        self.check_index(index)?;
        let merged = DeviceDraft::from(&self.devices[index]).merged(patch);
        let device = Device::try_from(merged)?;
        self.devices[index] = device;
        Ok(())
    }

    /// Removes and returns the device at `index`.
    ///
    /// # Errors
    ///
    /// [`SolarError::IndexOutOfRange`] when `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<Device, SolarError> {
        self.check_index(index)?;
        Ok(self.devices.remove(index))
    }

    pub fn clear(&mut self) {
        self.devices.clear();
    }

    /// Total daily energy of all devices (kWh/day), unrounded.
    pub fn daily_consumption_kwh(&self) -> f64 {
        self.devices.iter().map(Device::daily_consumption_kwh).sum()
    }
}
