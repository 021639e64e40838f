// src/utils/mod.rs

pub mod datetime;
pub mod email;
pub mod json_column;
pub mod password;
pub mod transaction;
