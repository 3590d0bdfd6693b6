pub mod building;
pub mod estimate;
pub mod hvac;
pub mod telemetry;
pub mod weather;

pub use building::*;
pub use estimate::*;
pub use hvac::*;
pub use telemetry::*;
pub use weather::*;
