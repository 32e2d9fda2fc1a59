pub mod dashboard;
pub mod form;
pub mod log_view;
pub mod router;
