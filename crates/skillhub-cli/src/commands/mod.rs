//! Command handlers

pub mod auth;
pub mod config;
pub mod doc;
pub mod profile;
pub mod tag;
