// Which configured output, if any, is the current default
use crate::identity::{identifier_of, DeviceIdentity};
use crate::session::{AudioSession, SessionError, Sink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    DeviceA,
    DeviceB,
    Neither,
}

/// `sink_id` is the already computed identifier of `sink`.
///
/// A port-specific config only matches while that port is active; a sink
/// without an active port never matches it.
fn is_active(
    config: Option<&DeviceIdentity>,
    sink: &Sink,
    sink_id: Option<&str>,
    default_index: u32,
) -> bool {
    let Some(config) = config else {
        return false;
    };
    if sink_id != Some(config.sink_id.as_str()) || sink.index != default_index {
        return false;
    }
    if !config.has_port() {
        return true;
    }
    sink.active_port
        .as_ref()
        .is_some_and(|port| port.name == config.port_id)
}

pub fn is_default_among(config: Option<&DeviceIdentity>, sinks: &[Sink], default_index: u32) -> bool {
    sinks.iter().any(|sink| {
        let sink_id = identifier_of(sink);
        is_active(config, sink, sink_id.as_deref(), default_index)
    })
}

/// Device A is tested before device B on each sink; the first hit wins.
pub fn toggle_state_among(
    config_a: Option<&DeviceIdentity>,
    config_b: Option<&DeviceIdentity>,
    sinks: &[Sink],
    default_index: u32,
) -> ToggleState {
    for sink in sinks {
        let sink_id = identifier_of(sink);
        if is_active(config_a, sink, sink_id.as_deref(), default_index) {
            return ToggleState::DeviceA;
        }
        if is_active(config_b, sink, sink_id.as_deref(), default_index) {
            return ToggleState::DeviceB;
        }
    }
    ToggleState::Neither
}

pub fn resolve<S: AudioSession + ?Sized>(
    config: Option<&DeviceIdentity>,
    session: &mut S,
) -> Result<bool, SessionError> {
    let default_index = session.default_sink_index()?;
    let sinks = session.list_sinks()?;
    Ok(is_default_among(config, &sinks, default_index))
}

pub fn resolve_toggle<S: AudioSession + ?Sized>(
    config_a: Option<&DeviceIdentity>,
    config_b: Option<&DeviceIdentity>,
    session: &mut S,
) -> Result<ToggleState, SessionError> {
    let default_index = session.default_sink_index()?;
    let sinks = session.list_sinks()?;
    Ok(toggle_state_among(config_a, config_b, &sinks, default_index))
}
