pub mod page;
pub mod patient;

pub use page::{can_edit_history, sort_by_name, PatientsPage};
pub use patient::PatientService;
