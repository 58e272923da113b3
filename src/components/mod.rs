pub mod control_panel;
pub mod globe_view;
