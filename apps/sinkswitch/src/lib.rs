// Deck actions for showing and switching the default audio output
pub mod actions;
pub mod devices;
pub mod identity;
pub mod notifications;
pub mod presenter;
pub mod resolver;
pub mod session;
pub mod switcher;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{ActionError, ConfigRow, DeckAction, SetOutput, ToggleOutput, ToggleSelection};
pub use devices::{list_devices, DeviceEntry};
pub use identity::{display_name_of, identifier_of, DeviceIdentity};
pub use resolver::{resolve, resolve_toggle, ToggleState};
pub use session::{AudioSession, PulseConnector, SessionConnector, SessionError, Sink};
pub use switcher::{activate, SwitchOutcome};
