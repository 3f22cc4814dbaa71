pub mod app;
pub mod converter;
pub mod error;
pub mod style;
