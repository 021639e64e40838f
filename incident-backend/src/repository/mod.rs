// src/repository/mod.rs
pub mod attachment_repository;
pub mod incident_action_repository;
pub mod incident_repository;
pub mod user_repository;
