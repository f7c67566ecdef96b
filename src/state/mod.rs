//! State layer: client for the Cortex agent cognition service

pub mod client;
mod convert;

pub use client::StateClient;
