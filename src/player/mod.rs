pub mod ai;
pub mod controller;

pub use ai::{MinimaxAI, RandomAI};
pub use controller::PlayerController;
