//! Runtime adapters

mod sleeper;

pub use sleeper::TokioSleeper;
