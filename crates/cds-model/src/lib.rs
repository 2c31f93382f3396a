pub mod mapping;
pub mod nodes;
pub mod template;

pub use mapping::{AggregateFallback, FieldRule, ManyValuePolicy, NAME_PREFIXES, cds_field_rules};
pub use nodes::{
    ANCESTOR_REFERENCE_COLUMNS, BOOKKEEPING_COLUMNS, CCDI_NODE_ORDER, FILE_NODE_CONCAT_ORDER,
    HierarchyLevel, LINKING_COLUMN_RENAMES, is_file_node,
};
pub use template::{CdsTemplate, REQUIRED_PLACEHOLDER};
