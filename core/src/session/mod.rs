//! Netplay session lifecycle
//!
//! Provides the [`SessionManager`], the single source of truth for whether a
//! session is running and in which role.

mod manager;

#[cfg(test)]
mod tests;

pub use manager::{InitError, Session, SessionManager};
