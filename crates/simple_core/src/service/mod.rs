//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and notifier calls into use-case APIs.
//! - Keep CLI/transport layers decoupled from storage details.

pub mod simple_service;
