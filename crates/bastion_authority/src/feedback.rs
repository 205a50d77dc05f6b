//! # Client Feedback Channel
//!
//! After the host applies damage, the client that controls the damaged actor
//! gets a directed, non-authoritative "you were hit" message so it can play
//! local-only feedback (hit direction, audio). Nobody else receives it.
//!
//! Delivery is at-most-once: no retries here, reliability belongs to the
//! transport.

use bastion_shared::{ActorId, DamageRequest, ProcessId, WireMessage};
use tracing::debug;

use crate::transport::{EntityDirectory, Transport};

/// What happened to the feedback for one damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Sent to the owning client.
    Sent(ProcessId),
    /// The owner is this process; deliver locally instead.
    Local,
    /// No owning client (AI, unowned, or not in the directory). Skipped.
    NoOwner,
}

/// Sends hit feedback to the owner of `request.target`.
pub fn notify_owner(
    directory: &dyn EntityDirectory,
    transport: &dyn Transport,
    local: ProcessId,
    request: &DamageRequest,
) -> FeedbackOutcome {
    let Some(owner) = owner_of(directory, request.target) else {
        return FeedbackOutcome::NoOwner;
    };
    if owner == local {
        return FeedbackOutcome::Local;
    }

    transport.send(
        owner,
        WireMessage::DamageFeedback {
            actor: request.target,
            source: request.source,
            kind: request.kind,
        },
    );
    debug!("feedback: {} hit by {} -> {}", request.target, request.source, owner);
    FeedbackOutcome::Sent(owner)
}

fn owner_of(directory: &dyn EntityDirectory, actor: ActorId) -> Option<ProcessId> {
    directory.lookup(actor).and_then(|handle| handle.owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{RecordingTransport, SharedDirectory};
    use bastion_shared::{DamageKind, EntityClass, EntityHandle};

    fn request(target: u32) -> DamageRequest {
        DamageRequest::new(ActorId(target), 10.0, ActorId(99), DamageKind::ByPlayer)
    }

    #[test]
    fn test_sends_to_owner_only() {
        let directory = SharedDirectory::new();
        directory.register(EntityHandle::owned_by(ActorId(1), EntityClass::Player, ProcessId(4)));
        let transport = RecordingTransport::new();

        let outcome = notify_owner(&directory, &transport, ProcessId(0), &request(1));

        assert_eq!(outcome, FeedbackOutcome::Sent(ProcessId(4)));
        assert_eq!(transport.directed_to(ProcessId(4)).len(), 1);
        assert!(transport.broadcasts().is_empty());
    }

    #[test]
    fn test_ai_actor_is_skipped() {
        let directory = SharedDirectory::new();
        directory.register(EntityHandle::unowned(ActorId(2), EntityClass::Ai));
        let transport = RecordingTransport::new();

        let outcome = notify_owner(&directory, &transport, ProcessId(0), &request(2));

        assert_eq!(outcome, FeedbackOutcome::NoOwner);
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_unregistered_target_is_skipped() {
        let directory = SharedDirectory::new();
        let transport = RecordingTransport::new();

        let outcome = notify_owner(&directory, &transport, ProcessId(0), &request(3));
        assert_eq!(outcome, FeedbackOutcome::NoOwner);
    }

    #[test]
    fn test_local_owner() {
        let directory = SharedDirectory::new();
        directory.register(EntityHandle::owned_by(ActorId(1), EntityClass::Player, ProcessId(0)));
        let transport = RecordingTransport::new();

        let outcome = notify_owner(&directory, &transport, ProcessId(0), &request(1));
        assert_eq!(outcome, FeedbackOutcome::Local);
        assert!(transport.sent().is_empty());
    }
}
