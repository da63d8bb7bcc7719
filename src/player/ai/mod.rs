pub mod minimax;
pub mod random;

pub use minimax::{best_guess, best_move, MinimaxAI, SEARCH_DEPTH};
pub use random::RandomAI;
