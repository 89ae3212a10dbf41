//! Puckstate math utilities.

pub mod math;

pub use math::gaussian::*;
pub use math::linalg::*;
pub use math::stable::*;
