//! # Consumer presence hook.
//!
//! A connected session keeps producing events while no consumer is attached.
//! Hosts usually want a standing side effect for that state, such as a
//! persistent "still connected, tap to disconnect" notification.
//! [`PresenceHook`] is that collaborator's seam: the broker
//! arms it when a live session loses its consumer and disarms it when a
//! consumer returns or the session ends.
//!
//! ## Call sites
//! - `attach`    → [`PresenceHook::disarm`]
//! - `detach` while connected → [`PresenceHook::arm`]
//! - `disconnect` → [`PresenceHook::disarm`]
//!
//! Both calls may be invoked repeatedly for the same state (`detach` is
//! idempotent), so implementations must tolerate redundant transitions.

/// Lifecycle collaborator notified when a connected session runs unattended.
///
/// Called from the consumer thread (`attach`/`detach`) and from whichever
/// thread triggers `disconnect`. Implementations should return quickly; slow
/// work belongs on the host's own executor.
pub trait PresenceHook: Send + Sync + 'static {
    /// A connected session just lost its consumer.
    fn arm(&self);

    /// A consumer is present again, or the session ended.
    fn disarm(&self);
}

/// No-op presence hook, used when the host has no "unattended" side effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresence;

impl PresenceHook for NullPresence {
    fn arm(&self) {}
    fn disarm(&self) {}
}
