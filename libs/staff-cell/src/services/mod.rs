pub mod page;
pub mod worker;

pub use page::{visible_workers, WorkersPage, WorkersView};
pub use worker::WorkerService;
