use sinkswitch_config::SettingsStore;
use tracing::{debug, info, warn};

use super::{read_identity, write_identity, ActionError, ConfigRow, DeckAction, CONFIGURATION_MISSING};
use crate::devices::{list_devices, position_of};
use crate::identity::DeviceIdentity;
use crate::presenter::{Icon, Presenter, ICON_SCALE};
use crate::resolver::{resolve_toggle, ToggleState};
use crate::session::SessionConnector;
use crate::switcher::activate;

const DEVICE_A_KEY: &str = "device_a";
const DEVICE_A_PORT_KEY: &str = "device_a_port";
const DEVICE_B_KEY: &str = "device_b";
const DEVICE_B_PORT_KEY: &str = "device_b_port";
const DEVICE_A_ROW_TITLE: &str = "actions.toggle-output.device-a.title";
const DEVICE_B_ROW_TITLE: &str = "actions.toggle-output.device-b.title";

/// Picker state for both rows; nothing is stored until both are chosen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToggleSelection {
    pub device_a: Option<DeviceIdentity>,
    pub device_b: Option<DeviceIdentity>,
}

/// Key that flips the default output between device A and device B
pub struct ToggleOutput<C, S, P> {
    connector: C,
    settings: S,
    presenter: P,
    last_rendered: Option<ToggleState>,
}

impl<C, S, P> ToggleOutput<C, S, P>
where
    C: SessionConnector,
    S: SettingsStore,
    P: Presenter,
{
    pub fn new(connector: C, settings: S, presenter: P) -> Self {
        Self {
            connector,
            settings,
            presenter,
            last_rendered: None,
        }
    }

    pub fn configured_devices(&self) -> ToggleSelection {
        let settings = self.settings.get();
        ToggleSelection {
            device_a: read_identity(&settings, DEVICE_A_KEY, DEVICE_A_PORT_KEY),
            device_b: read_identity(&settings, DEVICE_B_KEY, DEVICE_B_PORT_KEY),
        }
    }

    pub fn current_state(&self) -> Result<ToggleState, ActionError> {
        let devices = self.configured_devices();
        let mut session = self.connector.connect()?;
        Ok(resolve_toggle(
            devices.device_a.as_ref(),
            devices.device_b.as_ref(),
            &mut session,
        )?)
    }

    pub fn render(&mut self) -> Result<(), ActionError> {
        let state = self.current_state()?;
        if self.last_rendered == Some(state) {
            return Ok(());
        }
        self.last_rendered = Some(state);

        debug!("Toggle-output state changed: {:?}", state);
        let icon = match state {
            ToggleState::DeviceA => Icon::DeviceA,
            ToggleState::DeviceB => Icon::DeviceB,
            ToggleState::Neither => Icon::NoDevice,
        };
        self.presenter.set_icon(icon, ICON_SCALE);
        Ok(())
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }
}

impl<C, S, P> DeckAction for ToggleOutput<C, S, P>
where
    C: SessionConnector,
    S: SettingsStore,
    P: Presenter,
{
    type Selection = ToggleSelection;

    fn on_ready(&mut self) -> Result<(), ActionError> {
        self.last_rendered = None;
        self.render()
    }

    fn on_tick(&mut self) -> Result<(), ActionError> {
        self.render()
    }

    /// Only an active device A switches to B; B or neither goes to A.
    fn on_key_down(&mut self) -> Result<(), ActionError> {
        self.last_rendered = None;

        let ToggleSelection {
            device_a: Some(device_a),
            device_b: Some(device_b),
        } = self.configured_devices()
        else {
            warn!("Toggle-output pressed without both devices configured");
            self.presenter.show_error(CONFIGURATION_MISSING);
            return Ok(());
        };

        let target = match self.current_state()? {
            ToggleState::DeviceA => &device_b,
            ToggleState::DeviceB | ToggleState::Neither => &device_a,
        };

        {
            let mut session = self.connector.connect()?;
            let outcome = activate(target, &mut session)?;
            debug!("Toggle-output switch to {}: {:?}", target, outcome);
        }

        self.render()
    }

    fn config_rows(&self) -> Result<Vec<ConfigRow>, ActionError> {
        let entries = {
            let mut session = self.connector.connect()?;
            list_devices(&mut session)?
        };
        let devices = self.configured_devices();
        let selected_a = devices.device_a.and_then(|device| position_of(&entries, &device));
        let selected_b = devices.device_b.and_then(|device| position_of(&entries, &device));

        Ok(vec![
            ConfigRow {
                title_key: DEVICE_A_ROW_TITLE,
                entries: entries.clone(),
                selected: selected_a,
            },
            ConfigRow {
                title_key: DEVICE_B_ROW_TITLE,
                entries,
                selected: selected_b,
            },
        ])
    }

    fn on_configuration_changed(&mut self, selection: ToggleSelection) -> Result<(), ActionError> {
        let (Some(device_a), Some(device_b)) = (&selection.device_a, &selection.device_b) else {
            debug!("Toggle-output selection incomplete, not saving");
            return Ok(());
        };

        let mut settings = self.settings.get();
        write_identity(&mut settings, DEVICE_A_KEY, DEVICE_A_PORT_KEY, device_a);
        write_identity(&mut settings, DEVICE_B_KEY, DEVICE_B_PORT_KEY, device_b);
        self.settings.set(settings)?;
        info!("Toggle-output devices configured: A={}, B={}", device_a, device_b);
        Ok(())
    }
}
