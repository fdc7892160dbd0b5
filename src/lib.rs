pub mod config;
pub mod destination;
pub mod error;
pub mod lock;
pub mod logging;
pub mod relay;
pub mod source;

pub use config::{Config, MetricDefinition};
pub use destination::DestinationClient;
pub use error::UpdateError;
pub use lock::{LockError, LockFile};
pub use relay::Relay;
pub use source::SourceClient;
