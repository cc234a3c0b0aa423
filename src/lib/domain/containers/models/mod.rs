pub mod operation;
pub mod outcome;
pub mod record;
pub mod state;
