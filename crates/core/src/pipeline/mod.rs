pub mod capture_session;
pub mod detection_cycle;
pub mod detection_session;
pub mod infrastructure;
pub mod ticker;
