// Stable device identity derived from a sink's property list
use std::fmt;

use crate::session::Sink;

// PulseAudio / PipeWire property keys
pub const PROP_NODE_NAME: &str = "node.name";
pub const PROP_PRODUCT_NAME: &str = "device.product.name";
pub const PROP_DEVICE_NICK: &str = "device.nick";
pub const PROP_DEVICE_DESCRIPTION: &str = "device.description";
pub const PROP_PROFILE_DESCRIPTION: &str = "device.profile.description";

/// A configured output: a sink plus an optional port.
///
/// Holds no session handles, so it can be persisted and looked up again in
/// any later session. An empty `port_id` means "whatever port is active".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DeviceIdentity {
    pub sink_id: String,
    pub port_id: String,
}

impl DeviceIdentity {
    pub fn new(sink_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self {
            sink_id: sink_id.into(),
            port_id: port_id.into(),
        }
    }

    pub fn sink(sink_id: impl Into<String>) -> Self {
        Self::new(sink_id, "")
    }

    pub fn has_port(&self) -> bool {
        !self.port_id.is_empty()
    }

    pub fn refers_to(&self, sink: &Sink) -> bool {
        identifier_of(sink).as_deref() == Some(self.sink_id.as_str())
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_port() {
            write!(f, "{} [{}]", self.sink_id, self.port_id)
        } else {
            write!(f, "{}", self.sink_id)
        }
    }
}

/// `node.name` survives restarts; the raw sink name is the best-effort
/// fallback when the server does not publish it.
pub fn identifier_of(sink: &Sink) -> Option<String> {
    sink.property(PROP_NODE_NAME)
        .or_else(|| sink.raw_name())
        .map(str::to_string)
}

pub fn display_name_of(sink: &Sink) -> Option<String> {
    let base = sink
        .property(PROP_PRODUCT_NAME)
        .or_else(|| sink.property(PROP_DEVICE_NICK))
        .or_else(|| sink.property(PROP_DEVICE_DESCRIPTION))
        .or_else(|| sink.raw_name())?;

    match sink.property(PROP_PROFILE_DESCRIPTION) {
        Some(profile) => Some(format!("{} ({})", base, profile)),
        None => Some(base.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SinkBuilder;

    #[test]
    fn test_identifier_prefers_node_name() {
        let sink = SinkBuilder::new(4, "alsa_output.pci-0000_00_1f.3.analog-stereo")
            .property(PROP_NODE_NAME, "alsa_output.desk")
            .build();

        assert_eq!(identifier_of(&sink).as_deref(), Some("alsa_output.desk"));
    }

    #[test]
    fn test_identifier_falls_back_to_raw_name() {
        let sink = SinkBuilder::new(4, "alsa_output.pci-0000_00_1f.3.analog-stereo").build();
        assert_eq!(
            identifier_of(&sink).as_deref(),
            Some("alsa_output.pci-0000_00_1f.3.analog-stereo")
        );

        let blank_node = SinkBuilder::new(5, "bluez_output.headset")
            .property(PROP_NODE_NAME, "")
            .build();
        assert_eq!(identifier_of(&blank_node).as_deref(), Some("bluez_output.headset"));
    }

    #[test]
    fn test_identifier_absent_without_any_name() {
        assert_eq!(identifier_of(&SinkBuilder::unnamed(9).build()), None);
        assert_eq!(display_name_of(&SinkBuilder::unnamed(9).build()), None);
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let full = SinkBuilder::new(1, "raw")
            .property(PROP_PRODUCT_NAME, "Scarlett 2i2")
            .property(PROP_DEVICE_NICK, "USB Audio")
            .property(PROP_DEVICE_DESCRIPTION, "Scarlett 2i2 Analog Stereo")
            .build();
        assert_eq!(display_name_of(&full).as_deref(), Some("Scarlett 2i2"));

        let nick = SinkBuilder::new(1, "raw")
            .property(PROP_DEVICE_NICK, "USB Audio")
            .property(PROP_DEVICE_DESCRIPTION, "Scarlett 2i2 Analog Stereo")
            .build();
        assert_eq!(display_name_of(&nick).as_deref(), Some("USB Audio"));

        let description = SinkBuilder::new(1, "raw")
            .property(PROP_DEVICE_DESCRIPTION, "Built-in Audio")
            .build();
        assert_eq!(display_name_of(&description).as_deref(), Some("Built-in Audio"));

        let bare = SinkBuilder::new(1, "raw").build();
        assert_eq!(display_name_of(&bare).as_deref(), Some("raw"));
    }

    #[test]
    fn test_display_name_appends_profile() {
        let sink = SinkBuilder::new(1, "raw")
            .property(PROP_DEVICE_DESCRIPTION, "Built-in Audio")
            .property(PROP_PROFILE_DESCRIPTION, "Analog Stereo")
            .build();
        assert_eq!(
            display_name_of(&sink).as_deref(),
            Some("Built-in Audio (Analog Stereo)")
        );

        let empty_profile = SinkBuilder::new(1, "raw")
            .property(PROP_DEVICE_DESCRIPTION, "Built-in Audio")
            .property(PROP_PROFILE_DESCRIPTION, "")
            .build();
        assert_eq!(display_name_of(&empty_profile).as_deref(), Some("Built-in Audio"));
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(DeviceIdentity::sink("X").to_string(), "X");
        assert_eq!(DeviceIdentity::new("X", "hdmi").to_string(), "X [hdmi]");
    }
}
