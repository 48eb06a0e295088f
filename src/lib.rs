pub mod appointments;
pub mod cli;
pub mod config;
pub mod controller;
pub mod database;
pub mod logging;
pub mod models;
pub mod renderer;
pub mod store;
pub mod tui;
pub mod utils;

pub use appointments::AppointmentList;
pub use config::Config;
pub use controller::FormController;
pub use database::{Database, SCHEMA_VERSION};
pub use models::{Appointment, Field};
pub use renderer::ListRenderer;
pub use store::RecordStore;
pub use utils::Profile;
