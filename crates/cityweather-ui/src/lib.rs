pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod render;
pub mod route;
pub mod services;
pub mod shell;

pub use app_services::AppServices;
pub use models::{CityDetailModel, CityListModel};
pub use route::Route;
pub use shell::{Command, Shell, ShellAction};
