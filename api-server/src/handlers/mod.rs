//! HTTP handlers

pub mod health;
pub mod index;
pub mod status;
pub mod submit;
