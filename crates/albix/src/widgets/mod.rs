pub mod pane_chrome;
pub mod progress_bar;
pub mod prompt_input;
pub mod scrollable_list;
pub mod status_bar;
pub mod toast;
