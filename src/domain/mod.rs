// Domain layer: draw models and ports (interfaces). No runtime dependencies beyond serde/async-trait.

pub mod model;
pub mod ports;
