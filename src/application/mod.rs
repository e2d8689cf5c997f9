pub mod auth_service;
pub mod budget_service;
