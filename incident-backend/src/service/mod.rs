// src/service/mod.rs
pub mod attachment_service;
pub mod auth_service;
pub mod geo_location_service;
pub mod incident_action_service;
pub mod incident_service;
pub mod user_service;
