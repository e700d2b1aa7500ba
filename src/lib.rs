//! Web of Things HTTP consumer
//!
//! Consume [Thing Descriptions](https://www.w3.org/TR/wot-thing-description/)
//! over HTTP:
//! > A Thing Description describes the metadata and interfaces of Things,
//! > where a Thing is an abstraction of a physical or virtual entity that
//! > provides interactions to and participates in the Web of Things.
//!
//! The crate ingests a device's Thing Description (WoT 1.0 or 1.1), resolves
//! every form into an absolute URL, polls the declared properties on a
//! cadence with backoff and a last-known-value cache, and invokes actions
//! after validating their parameters against the declared input schema.
//! Devices without a Thing Description are still polled, as a single opaque
//! value at their base URL.
//!
//! [`poll::PollingCoordinator`] is the entry point: feed it one
//! [`config::DeviceConfig`] per device and read the snapshots back.

pub mod action;
pub mod config;
pub mod error;
pub mod poll;
pub mod resolver;
pub mod schema;
pub mod thing;
pub mod transport;
pub mod value;

pub use action::ActionOutcome;
pub use config::{DeviceConfig, SessionConfig};
pub use error::Error;
pub use poll::{CoordinatorConfig, PollingCoordinator, PropertySnapshot};
pub use resolver::{resolve, ThingDescription};
pub use thing::Thing;
pub use value::PropertyValue;
