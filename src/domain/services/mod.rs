pub mod action_dispatcher;
pub mod auth_service;
pub mod guards;
pub mod invite_registry;
