pub mod models;
pub mod normalize;
pub mod repositories;
pub mod services;
pub mod settings;
pub mod views;
