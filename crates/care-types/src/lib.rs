//! Core types and traits for the healthcare assistant chat service.
//!
//! Request/response DTOs share one JSON envelope (`code`, `message`, `data`).

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;
