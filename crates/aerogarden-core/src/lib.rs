// aerogarden-core: Garden state cache and control between aerogarden-api and consumers.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod registry;
pub mod sensor;
pub mod store;
pub mod stream;
pub mod throttle;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    ControllerConfig, DEFAULT_POLL_INTERVAL, DEFAULT_THROTTLE, TlsVerification, default_host,
};
pub use controller::Controller;
pub use error::CoreError;
pub use model::{Garden, GardenKey, GardenMap, fields};
pub use registry::{GardenRegistry, validate_credentials};
pub use sensor::{
    BinaryClass, GardenLight, MANUFACTURER, Sensor, SensorClass, SensorKind, SensorState,
    lights_for, sensors_for,
};
pub use store::GardenStore;
pub use stream::GardenStream;
pub use throttle::Throttle;
