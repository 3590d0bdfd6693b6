pub mod blend;
pub mod elevation;
pub mod normals;
pub mod provider;
pub mod rates;
pub mod service;
#[cfg(feature = "open-meteo")]
pub mod weather;

pub use blend::merge_month;
pub use elevation::adjust_for_elevation;
pub use normals::HistoricalNormals;
pub use provider::*;
pub use rates::*;
pub use service::MonthlyWeatherService;
#[cfg(feature = "open-meteo")]
pub use weather::OpenMeteoClient;
