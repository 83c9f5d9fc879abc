//! Contract Tracker - Progress tracking for service contracts
//!
//! Contracts report progress per bucket of a configurable period (half-month
//! up to annual). This crate models the yearly partition of each period and
//! migrates stored progress safely when a contract's period changes.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
