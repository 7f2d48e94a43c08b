//! SysMX Common Library
//!
//! Shared types for SysMX management bridges:
//!
//! - [`value`] - attribute values, name/value pairs and timestamped snapshots
//! - [`objectname`] - the `domain:key=value,...` syntax of bridge identities
//! - [`serialization`] - JSON/CBOR encoding of snapshots
//! - [`logging`] - logging configuration and tracing setup

pub mod error;
pub mod logging;
pub mod objectname;
pub mod serialization;
pub mod value;

pub use error::{Error, Result};
pub use logging::{LogFormat, LoggingConfig, init_tracing};
pub use objectname::{DEFAULT_DOMAIN, ObjectName, ObjectNameBuilder, validate_domain};
pub use serialization::{Format, encode};
pub use value::{Attribute, AttributeSnapshot, AttributeValue, current_timestamp_millis};
