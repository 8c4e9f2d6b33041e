//! Host-side client for the ESIM sensor module.
//!
//! The [`Client`] issues one request/response transaction per call over any
//! [`Transport`] (a blocking duplex byte stream with bounded reads). The
//! bundled [`SerialTransport`] talks to real hardware; [`ModuleSim`] is an
//! in-process behavioral model of the module used by the integration tests.

pub mod client;
pub mod sim;
pub mod transport;

pub use client::{Client, TransactionError};
pub use sim::ModuleSim;
pub use transport::{SerialTransport, Transport};
