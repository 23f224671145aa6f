pub mod commands;
pub mod csv_loader;
pub mod logging;
pub mod requests;
pub mod utils;
