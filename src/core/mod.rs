//! Scenario projection engine: compound growth of macro and personal
//! indicators under the natural and shock scenarios.

mod engine;
mod error;
mod types;

pub use engine::{ProjectionEngine, compound_project};
pub use error::ProjectionError;
pub use types::{
    HOUSING_FIELD, Horizon, INCOME_FIELD, InputField, MacroRow, MacroTable, PersonalInputs,
    PersonalRow, PersonalTable, ProjectionConfig, Scenario, ScenarioPair,
};

// ============================================================================
// Built-in scenario constants
// ============================================================================
// Natural rates are the 1997-2024 average (housing 2012-2021). Shock rates
// apply the Hong Kong handover growth ratio to the same series.

/// GDP growth, natural path (about 3.64% / year)
pub const GDP_RATE_NATURAL: f64 = 0.03642405889760747;
/// GDP growth, shock path (about 1.01% / year)
pub const GDP_RATE_SHOCK: f64 = 0.010086986828831218;
/// FDI growth, natural path (about 2.29% / year)
pub const FDI_RATE_NATURAL: f64 = 0.022877126440026485;
/// FDI growth, shock path (about 1.13% / year)
pub const FDI_RATE_SHOCK: f64 = 0.011270998331796981;
/// Housing price growth, natural path (about 4.09% / year)
pub const HOUSING_RATE_NATURAL: f64 = 0.0409105229702702;
/// Housing price growth, shock path (about 0.79% / year)
pub const HOUSING_RATE_SHOCK: f64 = 0.007923277505180824;

/// Macro GDP in the base year, USD
pub const BASE_GDP_2024: f64 = 796_904_000_000.0;
/// Macro FDI in the base year, USD
pub const BASE_FDI_2024: f64 = 7_858_117_000.0;

pub const BASE_YEAR: i32 = 2024;
pub const END_YEAR: i32 = 2029;
/// Longest horizon a scenario file may request, inclusive of both ends.
pub const MAX_HORIZON_YEARS: usize = 1_000;

/// Macro values are displayed in ten-millions of USD.
pub const SCALE_FACTOR: f64 = 10_000_000.0;
