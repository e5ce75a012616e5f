//! HTTP request handlers

pub mod files;
pub mod service;

pub use files::*;
pub use service::*;
