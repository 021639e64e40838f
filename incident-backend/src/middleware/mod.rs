// src/middleware/mod.rs
pub mod cors;
