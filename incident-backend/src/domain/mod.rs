// src/domain/mod.rs
pub mod composite;
pub mod incident_action_model;
pub mod incident_assign_file_model;
pub mod incident_assign_model;
pub mod incident_file_model;
pub mod incident_report_model;
pub mod role_model;
pub mod user_model;
