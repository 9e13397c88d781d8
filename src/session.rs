//! Orchestration layer: applies state transitions and persists after each
//! successful mutation.

use tracing::{debug, info, warn};

use crate::devices::{Classifier, Device, DeviceDraft, DevicePatch};
use crate::error::{PersistenceError, SolarError};
use crate::sizing::{ConsumptionSummary, SizingResult};
use crate::state::SolarState;
use crate::store::StateStore;
use crate::system::{SystemConfig, SystemConfigPatch};

/// Outcome of the save that follows a successful mutation.
///
/// A failed save never undoes the mutation; the session keeps running on its
/// in-memory state.
#[derive(Debug, Clone)]
pub enum Persisted {
    Saved,
    Failed(PersistenceError),
}

impl Persisted {
    pub fn is_saved(&self) -> bool {
        matches!(self, Persisted::Saved)
    }
}

/// A sizing session bound to a storage backend.
///
/// # Examples
///
/// ```
/// use solar_sizer::devices::{Classifier, DeviceDraft};
/// use solar_sizer::session::Session;
/// use solar_sizer::store::MemoryStore;
/// use solar_sizer::system::SystemConfig;
///
/// let mut session = Session::open(MemoryStore::new(), Classifier::default(), SystemConfig::default());
/// session.add_device(DeviceDraft::new("ثلاجة", 150.0, 24.0, 1.0)).unwrap();
/// let (result, _) = session.calculate().unwrap();
/// assert!(result.panels_count >= 1);
/// ```
#[derive(Debug)]
pub struct Session<S: StateStore> {
    state: SolarState,
    store: S,
    classifier: Classifier,
}

impl<S: StateStore> Session<S> {
    /// Opens a session from the store, or with `default_config` and an empty
    /// inventory when nothing usable is saved.
    ///
    /// Load failures are logged and never fatal.
    pub fn open(store: S, classifier: Classifier, default_config: SystemConfig) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => SolarState::with_config(default_config),
            Err(e) => {
                warn!("Failed to load saved state, starting fresh: {e}");
                SolarState::with_config(default_config)
            }
        };
        Self {
            state,
            store,
            classifier,
        }
    }

    /// Wraps an existing state without loading from the store.
    pub fn from_state(state: SolarState, store: S, classifier: Classifier) -> Self {
        Self {
            state,
            store,
            classifier,
        }
    }

    pub fn state(&self) -> &SolarState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn devices(&self) -> &[Device] {
        self.state.devices.devices()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.state.config
    }

    /// Current (non-stale) sizing result.
    pub fn results(&self) -> Option<&SizingResult> {
        self.state.current_results()
    }

    /// Consumption totals for the current inventory.
    pub fn summary(&self) -> ConsumptionSummary {
        self.state.summary(&self.classifier)
    }

    fn persist(&self) -> Persisted {
        match self.store.save(&self.state) {
            Ok(()) => Persisted::Saved,
            Err(e) => {
                warn!("State change kept in memory but not saved: {e}");
                Persisted::Failed(e)
            }
        }
    }

    /// Validates and appends a device, then persists.
    ///
    /// # Errors
    ///
    /// [`SolarError::Validation`]; nothing is changed or saved.
    pub fn add_device(&mut self, draft: DeviceDraft) -> Result<Persisted, SolarError> {
        let index = self.state.add_device(draft)?;
        info!(
            "Added device #{index} \"{}\"",
            self.devices()[index].name()
        );
        Ok(self.persist())
    }

    /// Appends a batch of drafts (e.g. from a CSV import), then persists.
    ///
    /// # Errors
    ///
    /// [`SolarError::Validation`]; no device of the batch is added.
    pub fn import_devices(
        &mut self,
        drafts: Vec<DeviceDraft>,
    ) -> Result<(usize, Persisted), SolarError> {
        let added = self.state.import_devices(drafts)?;
        info!("Imported {added} devices");
        Ok((added, self.persist()))
    }

    /// Merges `patch` into the device at `index`, then persists.
    ///
    /// # Errors
    ///
    /// [`SolarError::IndexOutOfRange`] or [`SolarError::Validation`].
    pub fn update_device(
        &mut self,
        index: usize,
        patch: &DevicePatch,
    ) -> Result<Persisted, SolarError> {
        self.state.update_device(index, patch)?;
        info!("Updated device #{index}");
        Ok(self.persist())
    }

    /// Removes the device at `index`, then persists.
    ///
    /// # Errors
    ///
    /// [`SolarError::IndexOutOfRange`].
    pub fn remove_device(&mut self, index: usize) -> Result<Persisted, SolarError> {
        let removed = self.state.remove_device(index)?;
        info!("Removed device #{index} \"{}\"", removed.name());
        Ok(self.persist())
    }

    /// Applies a configuration patch, then persists.
    ///
    /// # Errors
    ///
    /// [`SolarError::InvalidConfig`]; no field of the patch is applied.
    pub fn update_config(&mut self, patch: &SystemConfigPatch) -> Result<Persisted, SolarError> {
        self.state.update_config(patch)?;
        info!("Updated system configuration: {:?}", self.state.config);
        Ok(self.persist())
    }

    /// Recomputes the sizing result, stores it and persists.
    ///
    /// # Errors
    ///
    /// [`SolarError::EmptyInventory`] or [`SolarError::InvalidConfig`].
    pub fn calculate(&mut self) -> Result<(SizingResult, Persisted), SolarError> {
        let result = self.state.calculate(&self.classifier)?.clone();
        debug!(
            "Calculated sizing: {:.2} kWh/day, {} panels, {:.2} kW inverter",
            result.total_with_loss_kwh, result.panels_count, result.inverter_size_kw
        );
        Ok((result, self.persist()))
    }

    /// Recomputes only when a result exists but is stale.
    ///
    /// Returns `Ok(None)` when there was nothing to refresh.
    ///
    /// # Errors
    ///
    /// Same as [`Session::calculate`]; an emptied inventory leaves the stale
    /// result in place.
    pub fn refresh_results(&mut self) -> Result<Option<(SizingResult, Persisted)>, SolarError> {
        if self.state.results.is_some() && self.state.results_stale {
            return self.calculate().map(Some);
        }
        Ok(None)
    }

    /// Clears devices and result, keeping the configuration, then persists.
    pub fn reset(&mut self) -> Persisted {
        self.state.reset();
        info!("Session reset");
        self.persist()
    }
}
