//! # Damage Router
//!
//! Single entry point for damage intent.
//!
//! ```text
//! request_damage(actor, amount, source, kind)
//!        │
//!        ├── authoritative? ──yes──► apply locally (actor state + death latch)
//!        │
//!        └── no ──► WireMessage::Damage ──► host   (fire-and-forget)
//! ```
//!
//! Requests from different sources may reach the host in any order. That is
//! fine: subtraction commutes, and the death latch makes the only
//! non-commutative step idempotent.

use std::sync::Arc;

use bastion_shared::{ActorId, DamageRequest, ProcessId, WireMessage};
use tracing::debug;

use crate::actor::DamageOutcome;
use crate::transport::{AuthorityContext, AuthorityOracle, Transport};

/// Where a request should be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// This process is authoritative: apply here.
    Local,
    /// Forward to the authoritative host.
    Forward(ProcessId),
}

/// What [`AuthorityNode::request_damage`] did with a request.
///
/// [`AuthorityNode::request_damage`]: crate::node::AuthorityNode::request_damage
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RouteOutcome {
    /// Applied on this process.
    Applied(DamageOutcome),
    /// Sent to the host. No result will come back on this path.
    Forwarded(ProcessId),
    /// Authoritative here, but the target is not spawned. Ignored.
    Dropped,
}

impl RouteOutcome {
    /// The applied outcome, if the request was applied locally.
    #[must_use]
    pub const fn applied(&self) -> Option<&DamageOutcome> {
        match self {
            Self::Applied(outcome) => Some(outcome),
            Self::Forwarded(_) | Self::Dropped => None,
        }
    }
}

/// Authority check plus forwarding.
#[derive(Clone)]
pub struct DamageRouter {
    oracle: Arc<dyn AuthorityOracle>,
    transport: Arc<dyn Transport>,
}

impl DamageRouter {
    /// Builds a router from the node's context.
    #[must_use]
    pub fn new(context: &AuthorityContext) -> Self {
        Self {
            oracle: Arc::clone(&context.oracle),
            transport: Arc::clone(&context.transport),
        }
    }

    /// Decides where a request for `actor` is applied.
    #[must_use]
    pub fn decide(&self, actor: ActorId) -> RouteDecision {
        if self.oracle.is_authoritative(actor) {
            RouteDecision::Local
        } else {
            RouteDecision::Forward(self.oracle.host_of(actor))
        }
    }

    /// Sends a request to the host.
    pub fn forward(&self, host: ProcessId, request: DamageRequest) {
        debug!(
            "router: forwarding {} dmg on {} from {} to {}",
            request.amount, request.target, request.source, host
        );
        self.transport.send(host, WireMessage::Damage(request));
    }
}
