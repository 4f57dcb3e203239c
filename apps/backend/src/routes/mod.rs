//! HTTP route handlers

pub mod study;
pub mod users;
pub mod words;
