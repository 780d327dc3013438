//! Shared wire standards reused by several vendors.

pub mod openai;
