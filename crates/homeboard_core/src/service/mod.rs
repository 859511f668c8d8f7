//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into screen-level operations.
//! - Keep FFI/CLI layers decoupled from storage details.

pub mod todo_service;
pub mod tuition_service;
pub mod work_log_service;
