pub mod form;
pub mod observation;
pub mod patient;
pub mod user;

pub use form::FormService;
pub use observation::ObservationService;
pub use patient::PatientService;
pub use user::UserService;
