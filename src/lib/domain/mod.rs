pub mod containers;
pub mod system;
