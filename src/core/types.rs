use serde::{Deserialize, Serialize};

use super::{
    BASE_FDI_2024, BASE_GDP_2024, BASE_YEAR, END_YEAR, FDI_RATE_NATURAL, FDI_RATE_SHOCK,
    GDP_RATE_NATURAL, GDP_RATE_SHOCK, HOUSING_RATE_NATURAL, HOUSING_RATE_SHOCK, SCALE_FACTOR,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Scenario {
    Natural,
    Shock,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::Natural, Scenario::Shock];

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Natural => "Natural",
            Scenario::Shock => "China model",
        }
    }
}

/// Annual compound growth rates for one indicator under both scenarios.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioPair {
    pub natural: f64,
    pub shock: f64,
}

impl ScenarioPair {
    pub fn rate(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Natural => self.natural,
            Scenario::Shock => self.shock,
        }
    }
}

/// Inclusive span of projected years; `base_year` is t = 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Horizon {
    pub base_year: i32,
    pub end_year: i32,
}

impl Horizon {
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.base_year..=self.end_year
    }

    pub fn len(&self) -> usize {
        if self.end_year < self.base_year {
            0
        } else {
            (i64::from(self.end_year) - i64::from(self.base_year)) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn elapsed(&self, year: i32) -> u32 {
        year.saturating_sub(self.base_year).max(0) as u32
    }
}

/// Frozen model assumptions. Built once and shared read-only; callers may
/// substitute their own scenario set, which is validated by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectionConfig {
    pub horizon: Horizon,
    pub gdp_rates: ScenarioPair,
    pub fdi_rates: ScenarioPair,
    pub housing_rates: ScenarioPair,
    /// Macro GDP at the base year, USD.
    pub gdp_base: f64,
    /// Macro FDI at the base year, USD.
    pub fdi_base: f64,
    /// Divisor for the rescaled macro columns.
    pub scale_factor: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: Horizon {
                base_year: BASE_YEAR,
                end_year: END_YEAR,
            },
            gdp_rates: ScenarioPair {
                natural: GDP_RATE_NATURAL,
                shock: GDP_RATE_SHOCK,
            },
            fdi_rates: ScenarioPair {
                natural: FDI_RATE_NATURAL,
                shock: FDI_RATE_SHOCK,
            },
            housing_rates: ScenarioPair {
                natural: HOUSING_RATE_NATURAL,
                shock: HOUSING_RATE_SHOCK,
            },
            gdp_base: BASE_GDP_2024,
            fdi_base: BASE_FDI_2024,
            scale_factor: SCALE_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroRow {
    pub year: i32,
    pub gdp_natural: f64,
    pub gdp_shock: f64,
    pub fdi_natural: f64,
    pub fdi_shock: f64,
    pub gdp_natural_scaled: f64,
    pub gdp_shock_scaled: f64,
    pub fdi_natural_scaled: f64,
    pub fdi_shock_scaled: f64,
}

impl MacroRow {
    pub fn gdp(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Natural => self.gdp_natural,
            Scenario::Shock => self.gdp_shock,
        }
    }

    pub fn fdi(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Natural => self.fdi_natural,
            Scenario::Shock => self.fdi_shock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroTable {
    pub rows: Vec<MacroRow>,
}

/// Affordability is `housing / income` from the unrounded values. A zero
/// income yields `inf` (or `NaN` when housing is also zero); both mean
/// "undefined" and are kept as-is for the display layer to flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRow {
    pub year: i32,
    pub income_natural: f64,
    pub income_shock: f64,
    pub housing_natural: f64,
    pub housing_shock: f64,
    pub affordability_natural: f64,
    pub affordability_shock: f64,
}

impl PersonalRow {
    pub fn income(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Natural => self.income_natural,
            Scenario::Shock => self.income_shock,
        }
    }

    pub fn housing(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Natural => self.housing_natural,
            Scenario::Shock => self.housing_shock,
        }
    }

    pub fn affordability(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Natural => self.affordability_natural,
            Scenario::Shock => self.affordability_shock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalTable {
    pub rows: Vec<PersonalRow>,
}

/// Descriptor for one numeric field on the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub key: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub min: f64,
    pub step: f64,
}

pub const INCOME_FIELD: InputField = InputField {
    key: "income",
    label: "Your annual income (TWD)",
    default: 1_000_000.0,
    min: 0.0,
    step: 50_000.0,
};

pub const HOUSING_FIELD: InputField = InputField {
    key: "housing",
    label: "Your current home value (TWD)",
    default: 10_000_000.0,
    min: 0.0,
    step: 100_000.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalInputs {
    pub income: f64,
    pub housing: f64,
}

impl Default for PersonalInputs {
    fn default() -> Self {
        Self {
            income: INCOME_FIELD.default,
            housing: HOUSING_FIELD.default,
        }
    }
}
