pub mod terminal;
pub mod widgets;
