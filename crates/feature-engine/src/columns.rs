//! Column names of the training dataset.

/// Machine quality grade (categorical)
pub const MACHINE_TYPE: &str = "Type";
/// Air temperature in Kelvin
pub const AIR_TEMPERATURE: &str = "Air temperature [K]";
/// Process temperature in Kelvin
pub const PROCESS_TEMPERATURE: &str = "Process temperature [K]";
/// Rotational speed in rpm (log-transformed after derivation)
pub const ROTATIONAL_SPEED: &str = "Rotational speed [rpm]";
/// Torque in N·m
pub const TORQUE: &str = "Torque [Nm]";
/// Tool wear in minutes
pub const TOOL_WEAR: &str = "Tool wear [min]";

/// Derived: torque × rotational speed
pub const POWER: &str = "power";
/// Derived: process temperature − air temperature
pub const TEMP_DIFF: &str = "temp_diff";

/// Numeric raw columns, in training order
pub const NUMERIC_RAW: [&str; 5] = [
    AIR_TEMPERATURE,
    PROCESS_TEMPERATURE,
    ROTATIONAL_SPEED,
    TORQUE,
    TOOL_WEAR,
];
