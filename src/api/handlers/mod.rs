pub mod auth;
pub mod goal;
pub mod health;
pub mod invite;
pub mod member;
pub mod opportunity;
pub mod tenant;
