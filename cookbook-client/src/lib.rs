pub mod auth;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod draft;
pub mod errors;
pub mod form;
pub mod payload;
pub mod service;
pub mod validation;

pub use form::AuthoringForm;
