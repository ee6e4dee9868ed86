//! Air quality monitoring core: bounded pollutant history, tier classification
//! and linear trend forecasting, driven one tick at a time.

pub mod application;
pub mod domain;
pub mod infrastructure;
