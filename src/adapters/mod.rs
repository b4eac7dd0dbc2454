//! Adapters implementing domain ports and supporting infrastructure.

pub mod cache;
pub mod thingspeak;
