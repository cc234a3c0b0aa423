pub mod models;
pub mod normalize;
pub mod ports;
pub mod service;
pub mod validation;
