use sinkswitch_config::SettingsStore;
use tracing::{debug, info, warn};

use super::{read_identity, write_identity, ActionError, ConfigRow, DeckAction, CONFIGURATION_MISSING};
use crate::devices::{list_devices, position_of};
use crate::identity::DeviceIdentity;
use crate::presenter::{Icon, Presenter, ICON_SCALE};
use crate::resolver::resolve;
use crate::session::SessionConnector;
use crate::switcher::activate;

const DEVICE_KEY: &str = "device";
const PORT_KEY: &str = "port";
const DEVICE_ROW_TITLE: &str = "actions.set-device.device.title";

/// Key that makes one output the default and lights up while it is
pub struct SetOutput<C, S, P> {
    connector: C,
    settings: S,
    presenter: P,
    last_rendered: Option<bool>,
}

impl<C, S, P> SetOutput<C, S, P>
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

    pub fn configured_device(&self) -> Option<DeviceIdentity> {
        read_identity(&self.settings.get(), DEVICE_KEY, PORT_KEY)
    }

    pub fn is_active(&self) -> Result<bool, ActionError> {
        let device = self.configured_device();
        let mut session = self.connector.connect()?;
        Ok(resolve(device.as_ref(), &mut session)?)
    }

    /// Redraw only when the state differs from what is on the key
    pub fn render(&mut self) -> Result<(), ActionError> {
        let active = self.is_active()?;
        if self.last_rendered == Some(active) {
            return Ok(());
        }
        self.last_rendered = Some(active);

        debug!("Set-output state changed: active={}", active);
        let icon = if active { Icon::Active } else { Icon::Inactive };
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

impl<C, S, P> DeckAction for SetOutput<C, S, P>
where
    C: SessionConnector,
    S: SettingsStore,
    P: Presenter,
{
    type Selection = DeviceIdentity;

    fn on_ready(&mut self) -> Result<(), ActionError> {
        self.last_rendered = None;
        self.render()
    }

    fn on_tick(&mut self) -> Result<(), ActionError> {
        self.render()
    }

    fn on_key_down(&mut self) -> Result<(), ActionError> {
        self.last_rendered = None;

        let Some(device) = self.configured_device() else {
            warn!("Set-output pressed without a configured device");
            self.presenter.show_error(CONFIGURATION_MISSING);
            return Ok(());
        };

        {
            let mut session = self.connector.connect()?;
            let outcome = activate(&device, &mut session)?;
            debug!("Set-output switch to {}: {:?}", device, outcome);
        }

        self.render()
    }

    fn config_rows(&self) -> Result<Vec<ConfigRow>, ActionError> {
        let entries = {
            let mut session = self.connector.connect()?;
            list_devices(&mut session)?
        };
        let selected = self
            .configured_device()
            .and_then(|device| position_of(&entries, &device));

        Ok(vec![ConfigRow {
            title_key: DEVICE_ROW_TITLE,
            entries,
            selected,
        }])
    }

    fn on_configuration_changed(&mut self, selection: DeviceIdentity) -> Result<(), ActionError> {
        let mut settings = self.settings.get();
        write_identity(&mut settings, DEVICE_KEY, PORT_KEY, &selection);
        self.settings.set(settings)?;
        info!("Set-output device configured: {}", selection);
        Ok(())
    }
}
