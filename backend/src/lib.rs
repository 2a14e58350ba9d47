//! Nexus Backend Library
//!
//! Topic research workflows: a planner model call splits a topic into
//! role-tagged subtasks, one model call per subtask runs concurrently, and
//! the assembled report is optionally persisted per user.
//! The server binary is in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod state;
pub mod store;
