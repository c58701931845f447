pub mod action;
pub mod auth;
pub mod comment;
pub mod goal;
pub mod invite_code;
pub mod opportunity;
pub mod principal;
pub mod tenant;
pub mod user;
