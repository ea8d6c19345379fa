pub mod health_handlers;
pub mod manifest_handlers;
pub mod photo_handlers;
