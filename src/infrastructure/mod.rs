pub mod error;
pub mod logging;

pub use error::ProtocolError;
pub use logging::{setup_logging, LoggingConfig};
