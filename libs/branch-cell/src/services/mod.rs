pub mod branch;
pub mod editor;
pub mod holiday;
pub mod overview;
pub mod schedule;
pub mod synchronizer;

pub use branch::BranchService;
pub use editor::{EditorError, EditorView, ScheduleEditor};
pub use holiday::{HolidayError, HolidayManager};
pub use overview::{holiday_summary, load_overview, schedule_summary};
pub use schedule::{HolidayStore, ScheduleService, ScheduleStore};
pub use synchronizer::{
    plan_week, validate_week, FailedOp, FailurePolicy, ScheduleError, ScheduleOp,
    ScheduleSynchronizer, SyncReport, SyncSummary,
};
