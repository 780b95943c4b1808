pub mod canvas;
pub mod menu_bar;
pub mod status;
