// Domain layer - Pure types and rules, no I/O
pub mod classification;
pub mod forecast;
pub mod history;
pub mod pollutant;
pub mod reading;
pub mod timestamp;
