//! Event-driven reconciliation pipeline for Docket.
//!
//! Two long-lived consumers (approve, delete) and a periodic retention
//! sweep drive a record's status transitions from outside the request
//! path. The `Reconciler` is the single authority for transition legality;
//! the repository below it is pure storage.

pub mod amqp;
pub mod consumer;
pub mod error;
pub mod reconciler;
pub mod source;
pub mod sweep;

pub use amqp::AmqpEventSource;
pub use consumer::{run_consumer, spawn_consumers};
pub use error::{EventError, EventResult, PipelineError};
pub use reconciler::{Reconciler, SweepStats};
pub use source::{EventHandler, EventSource};
pub use sweep::spawn_sweeper;
