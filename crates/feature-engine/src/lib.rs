//! Feature Engineering Engine
//!
//! Sensor reading types and the feature derivation step (`power`,
//! `temp_diff`, `log1p` of rotational speed). The same [`derive`] function
//! backs both the typed [`RawReading::derive`] path used by the service and
//! the name-addressed [`FeatureRecord`] path used for partial schemas.

pub mod columns;
mod features;
mod reading;
mod record;

pub use features::{derive, EnrichedReading};
pub use reading::{MachineType, ParseMachineTypeError, RawReading};
pub use record::{ColumnValue, FeatureRecord};
