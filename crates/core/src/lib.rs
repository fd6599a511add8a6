//! Domain logic for the tourdesk booking page: submitted form records,
//! validation rules and their localized messages.

pub mod config;
pub mod error;
pub mod types;
pub mod validation;
