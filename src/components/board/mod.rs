mod component;
mod layout;
mod render;
mod state;

pub use component::BoardCanvas;
pub use state::{BOARD_HEIGHT, BoardError, BoardView, PinPolicy};
