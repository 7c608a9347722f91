// Sound server session - PulseAudio implementation using pulsectl-rs
//
// Every query or switch opens its own SinkController and drops it before
// returning, so nothing here outlives a single host callback.
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, error, info};
use libpulse_binding::proplist::Proplist;
use pulsectl::controllers::{DeviceControl, SinkController};
use pulsectl::controllers::types::DeviceInfo;

/// Errors raised while talking to the sound server
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Sound server unavailable: {0}")]
    Unavailable(String),

    #[error("Sound server query failed: {0}")]
    Query(String),

    #[error("Sound server command failed: {0}")]
    Command(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Port {
    pub name: String,
    pub description: String,
}

/// Snapshot of a live sink. Indices and names are only meaningful for the
/// session that produced them.
#[derive(Debug, Clone, Default)]
pub struct Sink {
    pub index: u32,
    pub name: Option<String>,
    pub properties: HashMap<String, String>,
    pub ports: Vec<Port>,
    pub active_port: Option<Port>,
}

impl Sink {
    /// Property lookup; empty values read as absent
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn raw_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn port_named(&self, port_name: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.name == port_name)
    }
}

/// Operations the actions need from a connected sound server
pub trait AudioSession {
    fn list_sinks(&mut self) -> Result<Vec<Sink>, SessionError>;

    fn default_sink_index(&mut self) -> Result<u32, SessionError>;

    fn set_default_sink(&mut self, sink: &Sink) -> Result<(), SessionError>;

    fn set_active_port(&mut self, sink: &Sink, port_name: &str) -> Result<(), SessionError>;
}

/// Opens a fresh session for one operation
pub trait SessionConnector {
    type Session: AudioSession;

    fn connect(&self) -> Result<Self::Session, SessionError>;
}

fn properties_from_proplist(proplist: &Proplist) -> HashMap<String, String> {
    proplist
        .iter()
        .filter_map(|key| {
            let value = proplist.get_str(&key)?;
            Some((key, value))
        })
        .collect()
}

fn port_from_parts(name: Option<String>, description: Option<String>) -> Port {
    Port {
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
    }
}

fn sink_from_device_info(device: DeviceInfo) -> Sink {
    let ports = device
        .ports
        .into_iter()
        .map(|p| port_from_parts(p.name, p.description))
        .collect::<Vec<_>>();

    debug!(
        "Converting sink info: index={}, name={:?}, ports={}",
        device.index,
        device.name,
        ports.len()
    );

    Sink {
        index: device.index,
        name: device.name,
        properties: properties_from_proplist(&device.proplist),
        ports,
        active_port: device.active_port.map(|p| port_from_parts(p.name, p.description)),
    }
}

/// One PulseAudio connection, closed on drop
pub struct PulseSession {
    controller: SinkController,
}

impl PulseSession {
    pub fn connect() -> Result<Self, SessionError> {
        let controller = SinkController::create().map_err(|e| {
            error!("Failed to create SinkController: {}", e);
            SessionError::Unavailable(e.to_string())
        })?;

        debug!("Connected to PulseAudio daemon");
        Ok(Self { controller })
    }
}

impl AudioSession for PulseSession {
    fn list_sinks(&mut self) -> Result<Vec<Sink>, SessionError> {
        let devices = self
            .controller
            .list_devices()
            .map_err(|e| SessionError::Query(format!("Failed to list sinks: {}", e)))?;

        Ok(devices.into_iter().map(sink_from_device_info).collect())
    }

    fn default_sink_index(&mut self) -> Result<u32, SessionError> {
        let device = self
            .controller
            .get_default_device()
            .map_err(|e| SessionError::Query(format!("Failed to get default sink: {}", e)))?;

        Ok(device.index)
    }

    fn set_default_sink(&mut self, sink: &Sink) -> Result<(), SessionError> {
        let name = sink.raw_name().ok_or_else(|| {
            SessionError::Command(format!("Sink {} has no name to set as default", sink.index))
        })?;

        self.controller
            .set_default_device(name)
            .map_err(|e| SessionError::Command(format!("Failed to set default sink: {}", e)))?;

        info!("Default output set to {}", name);
        Ok(())
    }

    fn set_active_port(&mut self, sink: &Sink, port_name: &str) -> Result<(), SessionError> {
        let op = self
            .controller
            .handler
            .introspect
            .set_sink_port_by_index(sink.index, port_name, None);
        self.controller
            .handler
            .wait_for_operation(op)
            .map_err(|e| {
                error!("Failed to set sink port for index {} to {}: {}", sink.index, port_name, e);
                SessionError::Command(format!("Failed to set sink port: {}", e))
            })?;

        info!("Set output port: index={}, port={}", sink.index, port_name);
        Ok(())
    }
}

/// Connector for the local PulseAudio (or pipewire-pulse) server
#[derive(Debug, Clone, Copy, Default)]
pub struct PulseConnector;

impl SessionConnector for PulseConnector {
    type Session = PulseSession;

    fn connect(&self) -> Result<PulseSession, SessionError> {
        PulseSession::connect()
    }
}
