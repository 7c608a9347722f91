// Selectable output catalog: every sink, then each of its usable ports
use tracing::debug;

use crate::identity::{display_name_of, identifier_of, DeviceIdentity};
use crate::session::{AudioSession, SessionError, Sink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub identity: DeviceIdentity,
    pub display_name: String,
}

/// Build catalog rows from an already fetched sink list.
///
/// Sinks without an identifier are skipped. Ports need both a name and a
/// description to be listed.
pub fn catalog_from_sinks(sinks: &[Sink]) -> Vec<DeviceEntry> {
    let mut entries = Vec::new();

    for sink in sinks {
        let Some(sink_id) = identifier_of(sink) else {
            debug!("Skipping sink {} without identifier", sink.index);
            continue;
        };
        let display_name = display_name_of(sink).unwrap_or_else(|| sink_id.clone());

        let port_entries = sink
            .ports
            .iter()
            .filter(|port| !port.name.is_empty() && !port.description.is_empty())
            .map(|port| DeviceEntry {
                identity: DeviceIdentity::new(sink_id.clone(), port.name.clone()),
                display_name: format!("{} - {}", display_name, port.description),
            })
            .collect::<Vec<_>>();

        entries.push(DeviceEntry {
            identity: DeviceIdentity::sink(sink_id),
            display_name,
        });
        entries.extend(port_entries);
    }

    entries
}

/// Query the session and list every selectable output, in session order
pub fn list_devices<S: AudioSession + ?Sized>(session: &mut S) -> Result<Vec<DeviceEntry>, SessionError> {
    let sinks = session.list_sinks()?;
    let entries = catalog_from_sinks(&sinks);
    debug!("Listed {} outputs from {} sinks", entries.len(), sinks.len());
    Ok(entries)
}

/// Row whose identity equals the stored selection
pub fn position_of(entries: &[DeviceEntry], identity: &DeviceIdentity) -> Option<usize> {
    entries.iter().position(|entry| &entry.identity == identity)
}
