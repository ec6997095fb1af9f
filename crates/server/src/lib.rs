//! HTTP front end for the capacity model
//!
//! Stateless: every request carries the full configuration and gets a
//! complete snapshot back.

pub mod api;
pub mod config;
