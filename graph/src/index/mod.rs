pub mod incidence;
pub mod lookup;

pub use incidence::IncidenceIndex;
pub use lookup::NodeLookup;
