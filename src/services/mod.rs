//! Service layer: transport, geocoding enrichment, and the directory query
//! service.

pub mod directory;
pub mod geocoder;
pub mod transport;

pub use directory::{DirectoryService, DEFAULT_TOP_N};
pub use geocoder::{Coordinates, GeocodeBackend, GeocodeError, Geocoder, NominatimBackend};
pub use transport::{EmployeeTransport, HttpEmployeeTransport, RawPayload, TableData};
