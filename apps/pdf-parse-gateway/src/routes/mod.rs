//! Route modules for the PDF parse gateway

pub mod health;
pub mod parse;
