pub mod color;
pub mod appointment_list;
pub mod banner;
pub mod input;
pub mod status_bar;
pub mod help;
pub mod form;
