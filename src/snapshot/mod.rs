pub mod snapshot_model;
pub mod state_calculator;


pub use snapshot_model::{Position, VaultState};
pub use state_calculator::{apply_event, replay, state_as_of};
