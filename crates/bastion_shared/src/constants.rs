//! # Shared Constants
//!
//! Defaults baked into both host and client builds. The host may override
//! most of them through `AuthorityConfig`.

use crate::ids::ProcessId;

/// Tick rate (updates per second).
pub const TICK_RATE: u32 = 60;

/// Max health given to actors spawned without an explicit value.
pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

/// Process id conventionally used by the dedicated host.
pub const HOST_PROCESS: ProcessId = ProcessId(0);
