//! API layer - native client and REST transport

pub mod native;
pub mod rest;
