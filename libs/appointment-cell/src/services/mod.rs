pub mod appointment;
pub mod booking;
pub mod page;

pub use appointment::AppointmentService;
pub use booking::{booked_message, parse_clinic_id, BookingView, ClinicRef, PublicBooking, BOOKED_TOAST};
pub use page::{
    active_doctors, pending_consultations, AppointmentBoard, AppointmentPage, AppointmentUpdate,
    PageScope, Permissions,
};
