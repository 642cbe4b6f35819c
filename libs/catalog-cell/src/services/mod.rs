pub mod catalog;
pub mod clinic;
pub mod page;

pub use catalog::CatalogService;
pub use clinic::ClinicService;
pub use page::{load_clinic, visible_services, ServicesPage};
