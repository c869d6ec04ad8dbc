pub mod models;

pub mod example01_resolve_columns;
pub mod example02_convert_values;
pub mod example03_bind_rows;
pub mod example04_registry_lookup;
