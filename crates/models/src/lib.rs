pub mod days;
pub mod request_status;
pub mod week;
