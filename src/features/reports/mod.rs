pub mod models;
pub mod services;

pub use services::ReportService;
