pub mod docker;
pub mod memory;
