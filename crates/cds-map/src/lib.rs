pub mod backfill;
pub mod engine;
pub mod person_name;

pub use backfill::backfill_required;
pub use engine::{MappingReport, map_fields};
pub use person_name::{PersonName, decompose_person_name};
