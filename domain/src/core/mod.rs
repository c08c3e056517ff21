//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: small string helpers used for labels and display

pub mod error;
pub mod string;
