//! # reconnect-core
//!
//! Core types and configuration for Chassis ReConnect.
//!
//! This crate provides the building blocks shared by all other crates:
//! - Primary key and identifier types
//! - Permission levels for the role-based gate
//! - Application configuration loaded from the environment

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
