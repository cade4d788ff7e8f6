pub mod display;
pub mod fault_notice;
pub mod header;
pub mod history_panel;
pub mod keypad;
pub mod prompt_panel;
