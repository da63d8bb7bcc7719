use thiserror::Error;

/// Contract violations and codec failures raised by the game core.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("illegal placement at cell {index}")]
    IllegalPlacement { index: usize },

    #[error("no side to place a mark for")]
    NoMover,

    #[error("search invoked on a finished board {board}")]
    SearchOnTerminal { board: String },

    #[error("malformed board render {render:?}: {reason}")]
    BadRender { render: String, reason: String },
}
