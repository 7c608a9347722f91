// In-memory doubles for the sound server, settings and presentation
use std::cell::RefCell;
use std::rc::Rc;

use sinkswitch_config::{MemorySettings, Settings};

use crate::presenter::{Icon, Presenter};
use crate::session::{AudioSession, Port, SessionConnector, SessionError, Sink};

pub(crate) struct SinkBuilder(Sink);

impl SinkBuilder {
    pub fn new(index: u32, name: &str) -> Self {
        Self(Sink {
            index,
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    pub fn unnamed(index: u32) -> Self {
        Self(Sink {
            index,
            ..Default::default()
        })
    }

    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.0.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn port(mut self, name: &str, description: &str) -> Self {
        self.0.ports.push(Port {
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }

    pub fn active(mut self, port_name: &str) -> Self {
        let port = self
            .0
            .port_named(port_name)
            .cloned()
            .unwrap_or_else(|| Port {
                name: port_name.to_string(),
                description: String::new(),
            });
        self.0.active_port = Some(port);
        self
    }

    pub fn build(self) -> Sink {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mutation {
    SetDefault(u32),
    SetPort(u32, String),
}

#[derive(Debug, Default)]
pub(crate) struct FakeServer {
    pub sinks: Vec<Sink>,
    pub default_index: u32,
    pub mutations: Vec<Mutation>,
    pub connections: usize,
    pub unavailable: bool,
}

impl FakeServer {
    pub fn new(sinks: Vec<Sink>, default_index: u32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            sinks,
            default_index,
            ..Default::default()
        }))
    }
}

pub(crate) struct FakeSession {
    server: Rc<RefCell<FakeServer>>,
}

impl FakeSession {
    pub fn new(server: &Rc<RefCell<FakeServer>>) -> Self {
        Self {
            server: server.clone(),
        }
    }
}

impl AudioSession for FakeSession {
    fn list_sinks(&mut self) -> Result<Vec<Sink>, SessionError> {
        Ok(self.server.borrow().sinks.clone())
    }

    fn default_sink_index(&mut self) -> Result<u32, SessionError> {
        Ok(self.server.borrow().default_index)
    }

    fn set_default_sink(&mut self, sink: &Sink) -> Result<(), SessionError> {
        let mut server = self.server.borrow_mut();
        server.default_index = sink.index;
        server.mutations.push(Mutation::SetDefault(sink.index));
        Ok(())
    }

    fn set_active_port(&mut self, sink: &Sink, port_name: &str) -> Result<(), SessionError> {
        let mut server = self.server.borrow_mut();
        let live = server
            .sinks
            .iter_mut()
            .find(|s| s.index == sink.index)
            .ok_or_else(|| SessionError::Command(format!("no sink {}", sink.index)))?;
        let port = live
            .port_named(port_name)
            .cloned()
            .ok_or_else(|| SessionError::Command(format!("no port {}", port_name)))?;
        live.active_port = Some(port);
        server.mutations.push(Mutation::SetPort(sink.index, port_name.to_string()));
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct FakeConnector {
    pub server: Rc<RefCell<FakeServer>>,
}

impl SessionConnector for FakeConnector {
    type Session = FakeSession;

    fn connect(&self) -> Result<FakeSession, SessionError> {
        let mut server = self.server.borrow_mut();
        if server.unavailable {
            return Err(SessionError::Unavailable("connection refused".to_string()));
        }
        server.connections += 1;
        Ok(FakeSession::new(&self.server))
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPresenter {
    pub icons: Vec<(Icon, f32)>,
    pub errors: Vec<u32>,
}

impl Presenter for RecordingPresenter {
    fn set_icon(&mut self, icon: Icon, scale: f32) {
        self.icons.push((icon, scale));
    }

    fn show_error(&mut self, code: u32) {
        self.errors.push(code);
    }
}

pub(crate) fn settings(pairs: &[(&str, &str)]) -> MemorySettings {
    let settings: Settings = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    MemorySettings::new(settings)
}
