//! Service layer: response intake, report delivery, notification dispatch

pub mod delivery;
pub mod intake;
pub mod notify;
