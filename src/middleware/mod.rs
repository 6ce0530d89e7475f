//! Middleware module
//!
//! Contains Tower middleware applied in front of the relay routes.

pub mod origin;
