//! Data model: wire records, the normalized employee entity, and the
//! static city gazetteer.

pub mod employee;
pub mod gazetteer;

pub use employee::{Employee, EmployeeStatus, MapMarker, RawRecord};
