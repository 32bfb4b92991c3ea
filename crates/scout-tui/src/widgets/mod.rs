pub mod select_list;
pub mod status_bar;
pub mod toast;
