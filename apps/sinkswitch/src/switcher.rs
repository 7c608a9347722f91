// Default output switching
use tracing::{debug, info, warn};

use crate::identity::DeviceIdentity;
use crate::session::{AudioSession, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Target sink is not in the current session (unplugged since setup)
    DeviceNotFound,
    DefaultSet,
    DefaultAndPortSet,
    /// Default changed, configured port no longer exists on the sink
    PortNotFound,
}

/// Make `target` the default output, then select its port if one is set.
///
/// A missing sink or port is not an error: devices come and go between
/// configuration and use.
pub fn activate<S: AudioSession + ?Sized>(
    target: &DeviceIdentity,
    session: &mut S,
) -> Result<SwitchOutcome, SessionError> {
    let sinks = session.list_sinks()?;
    let Some(sink) = sinks.iter().find(|sink| target.refers_to(sink)) else {
        warn!("Output {} not present in current session", target);
        return Ok(SwitchOutcome::DeviceNotFound);
    };

    session.set_default_sink(sink)?;

    if !target.has_port() {
        return Ok(SwitchOutcome::DefaultSet);
    }

    if sink.port_named(&target.port_id).is_none() {
        debug!("Port {} missing on sink {}, keeping current port", target.port_id, sink.index);
        return Ok(SwitchOutcome::PortNotFound);
    }

    session.set_active_port(sink, &target.port_id)?;
    info!("Switched output to {}", target);
    Ok(SwitchOutcome::DefaultAndPortSet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::PROP_NODE_NAME;
    use crate::resolver::resolve;
    use crate::testing::{FakeServer, FakeSession, Mutation, SinkBuilder};

    fn server() -> std::rc::Rc<std::cell::RefCell<FakeServer>> {
        FakeServer::new(
            vec![
                SinkBuilder::new(1, "alsa_out.A").build(),
                SinkBuilder::new(2, "alsa_output.raw")
                    .property(PROP_NODE_NAME, "alsa_out.B")
                    .port("lineout", "Line Out")
                    .port("headphones", "Headphones")
                    .active("lineout")
                    .build(),
            ],
            1,
        )
    }

    #[test]
    fn test_sets_default_then_port() {
        let server = server();
        let target = DeviceIdentity::new("alsa_out.B", "headphones");

        let outcome = activate(&target, &mut FakeSession::new(&server)).unwrap();

        assert_eq!(outcome, SwitchOutcome::DefaultAndPortSet);
        assert_eq!(
            server.borrow().mutations,
            vec![Mutation::SetDefault(2), Mutation::SetPort(2, "headphones".to_string())]
        );
        assert!(resolve(Some(&target), &mut FakeSession::new(&server)).unwrap());
    }

    #[test]
    fn test_without_port_only_sets_default() {
        let server = server();
        let outcome = activate(&DeviceIdentity::sink("alsa_out.B"), &mut FakeSession::new(&server)).unwrap();

        assert_eq!(outcome, SwitchOutcome::DefaultSet);
        assert_eq!(server.borrow().mutations, vec![Mutation::SetDefault(2)]);
    }

    #[test]
    fn test_missing_device_is_a_no_op() {
        let server = server();
        let outcome = activate(&DeviceIdentity::sink("usb_out.unplugged"), &mut FakeSession::new(&server)).unwrap();

        assert_eq!(outcome, SwitchOutcome::DeviceNotFound);
        assert!(server.borrow().mutations.is_empty());
        assert_eq!(server.borrow().default_index, 1);
    }

    #[test]
    fn test_missing_port_keeps_default_switch() {
        let server = server();
        let outcome = activate(&DeviceIdentity::new("alsa_out.B", "hdmi"), &mut FakeSession::new(&server)).unwrap();

        assert_eq!(outcome, SwitchOutcome::PortNotFound);
        assert_eq!(server.borrow().mutations, vec![Mutation::SetDefault(2)]);
        assert_eq!(server.borrow().default_index, 2);
    }

    #[test]
    fn test_repeat_activation_is_stable() {
        let server = server();
        let target = DeviceIdentity::new("alsa_out.B", "headphones");

        activate(&target, &mut FakeSession::new(&server)).unwrap();
        activate(&target, &mut FakeSession::new(&server)).unwrap();

        assert!(resolve(Some(&target), &mut FakeSession::new(&server)).unwrap());
        assert_eq!(server.borrow().default_index, 2);
    }
}
