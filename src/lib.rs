//! AquaSense telemetry-link library.
//!
//! Exposes the protocol codec, the two peer endpoint state machines
//! (Controller and Platform), and the classification pipeline for
//! integration testing and external inspection.  The binary wires both
//! endpoints into a loopback simulation; a real deployment links one
//! endpoint per device and injects its own `ByteTransport`.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod config;
pub mod controller;
pub mod link;
pub mod pipeline;
pub mod platform;
pub mod sensors;

pub mod error;
