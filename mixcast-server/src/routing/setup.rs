use crate::error::RelayError;
use crate::registry::Registry;
use crate::routing::send_message;
use mixcast_core::{Envelope, PeerId, PeerSummary, SetupData, SignalMessage};
use tracing::{info, warn};

/// Applies a `setup-message` and confirms the final identity to its sender.
pub fn handle_setup(registry: &mut Registry, envelope: &Envelope) -> Result<PeerSummary, RelayError> {
    let SignalMessage::SetupMessage {
        sender_id, data, ..
    } = envelope.decode()?
    else {
        return Err(RelayError::UnknownSender(envelope.header.sender_id.clone()));
    };

    let summary = apply_setup(registry, &sender_id, data)?;
    info!(
        "Peer {} registered as {:?} ({:?})",
        sender_id, summary.name, summary.role
    );

    let confirmation = SignalMessage::SetupConfirmation {
        target_id: sender_id,
        data: summary.clone(),
    };
    if let Err(e) = send_message(registry, &confirmation, Some(&sender_id)) {
        warn!("Setup confirmation to {} not delivered: {}", sender_id, e);
    }

    Ok(summary)
}

/// Records name and role. A name another registered peer already shows
/// gets the first segment of the sender's id appended.
pub fn apply_setup(
    registry: &mut Registry,
    sender_id: &PeerId,
    data: SetupData,
) -> Result<PeerSummary, RelayError> {
    if registry.get(sender_id).is_none() {
        return Err(RelayError::UnknownSender(Some(sender_id.to_string())));
    }

    let name = if registry.name_taken(&data.name, sender_id) {
        format!("{}-{}", data.name, sender_id.short())
    } else {
        data.name
    };

    let record = registry
        .get_mut(sender_id)
        .ok_or_else(|| RelayError::UnknownSender(Some(sender_id.to_string())))?;
    record.display_name = name;
    record.role = Some(data.role);

    Ok(record.summary())
}
