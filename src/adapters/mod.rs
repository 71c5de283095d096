pub mod autopilot;
pub mod chain;
pub mod logging;

pub use autopilot::AutoPilot;
pub use chain::HookChain;
pub use logging::LoggingHooks;
