// src/extractors/mod.rs
pub mod client_ip;
pub mod id_path;

pub use client_ip::ClientIp;
pub use id_path::ValidatedId;
