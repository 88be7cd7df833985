pub mod measurement;
pub mod payload;
pub mod query;
pub mod sensor_kind;
