pub mod file_relation;
pub mod flatten;
pub mod frame_utils;
pub mod hierarchy;
pub mod reconcile;

pub use file_relation::build_file_relation;
pub use flatten::{FlattenResult, flatten_manifest};
pub use frame_utils::{
    column_has_values, distinct_non_null, drop_bookkeeping, has_column, non_empty_mask,
    rename_linking_columns,
};
pub use hierarchy::{Snapshots, StepOutcome, StepRecord, build_snapshots};
pub use reconcile::{JOIN_SUFFIX, ReconcilePreference, reconcile_collisions};
