//! Core math modules.

pub mod gaussian;
pub mod linalg;
pub mod stable;
