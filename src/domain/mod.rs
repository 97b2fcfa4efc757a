// Domain layer: export models and the ports the pipelines plug into.

pub mod model;
pub mod ports;
