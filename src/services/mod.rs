pub mod manifest_builder;
pub mod object_store;
pub mod portfolio_service;
pub mod usage;
