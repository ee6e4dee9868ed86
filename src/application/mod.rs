// Application layer - Use cases over the domain
pub mod engine;
pub mod forecaster;
pub mod reading_source;
