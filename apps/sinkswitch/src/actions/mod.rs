// Deck actions: lifecycle shared by the set-output and toggle-output keys
pub mod set_output;
pub mod toggle_output;

use sinkswitch_config::{ConfigError, Settings};
use thiserror::Error;

use crate::devices::DeviceEntry;
use crate::identity::DeviceIdentity;
use crate::session::SessionError;

pub use set_output::SetOutput;
pub use toggle_output::{ToggleOutput, ToggleSelection};

/// Error code shown when a key is pressed before its device is configured
pub const CONFIGURATION_MISSING: u32 = 1;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to store action settings: {0}")]
    Settings(#[from] ConfigError),
}

/// One device picker in the action's configuration UI
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigRow {
    /// Localization key for the row title
    pub title_key: &'static str,
    pub entries: Vec<DeviceEntry>,
    pub selected: Option<usize>,
}

/// Callbacks the host drives. Calls for one instance never overlap.
pub trait DeckAction {
    /// Payload of a configuration change coming from the UI layer
    type Selection;

    fn on_ready(&mut self) -> Result<(), ActionError>;

    fn on_tick(&mut self) -> Result<(), ActionError>;

    fn on_key_down(&mut self) -> Result<(), ActionError>;

    fn config_rows(&self) -> Result<Vec<ConfigRow>, ActionError>;

    fn on_configuration_changed(&mut self, selection: Self::Selection) -> Result<(), ActionError>;
}

/// `None` when the device key was never written; a missing port is "".
pub(crate) fn read_identity(settings: &Settings, device_key: &str, port_key: &str) -> Option<DeviceIdentity> {
    let sink_id = settings.get(device_key)?;
    let port_id = settings.get(port_key).cloned().unwrap_or_default();
    Some(DeviceIdentity::new(sink_id.clone(), port_id))
}

pub(crate) fn write_identity(settings: &mut Settings, device_key: &str, port_key: &str, identity: &DeviceIdentity) {
    settings.insert(device_key.to_string(), identity.sink_id.clone());
    settings.insert(port_key.to_string(), identity.port_id.clone());
}
