//! A module to encapsulate all things related to radio operation.
pub mod prelude;

pub(crate) mod rf24;
pub use rf24::{bit_fields::ObserveTx, Nrf24Error, RF24};

mod config;
pub use config::{ConfigError, RadioConfig};

mod events;
pub use events::EventFlags;
