//! System lifecycle trait
//!
//! The scheduler that orders systems is an external collaborator. It only
//! needs this contract: initialize once, update every tick, shut down once.

/// Lifecycle contract for a scheduled system
pub trait System {
    /// Human-readable name used in logs
    fn name(&self) -> &'static str;

    /// Called once before the first update
    fn initialize(&mut self) {}

    /// Advance the system by `delta_time` seconds
    fn update(&mut self, delta_time: f32);

    /// Called once after the last update
    fn shutdown(&mut self) {}
}
