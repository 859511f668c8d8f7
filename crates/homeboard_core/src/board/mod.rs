//! View state for dashboard screens.

pub mod todo_board;
