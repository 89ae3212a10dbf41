//! Gaussian-emission hidden Markov model: parameters, fitting, decoding.

pub mod decode;
pub mod fit;
pub mod model;

pub use decode::viterbi;
pub use fit::{fit, FitResult};
pub use model::GaussianHmm;
