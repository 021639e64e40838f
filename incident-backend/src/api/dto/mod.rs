// src/api/dto/mod.rs
pub mod attachment_dto;
pub mod auth_dto;
pub mod incident_action_dto;
pub mod incident_dto;
pub mod user_dto;
