use super::error::ProjectionError;
use super::MAX_HORIZON_YEARS;
use super::types::{
    MacroRow, MacroTable, PersonalRow, PersonalTable, ProjectionConfig, Scenario, ScenarioPair,
};

/// `base_value * (1 + rate) ^ years_elapsed`.
pub fn compound_project(
    base_value: f64,
    rate: f64,
    years_elapsed: u32,
) -> Result<f64, ProjectionError> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(ProjectionError::Domain { rate });
    }
    let value = base_value * (1.0 + rate).powf(f64::from(years_elapsed));
    if base_value.is_finite() && !value.is_finite() {
        return Err(ProjectionError::Overflow {
            base: base_value,
            rate,
            years: years_elapsed,
        });
    }
    Ok(value)
}

#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Result<Self, ProjectionError> {
        validate_config(&config)?;
        let engine = Self { config };
        // Macro values are fixed by the config, so overflow there is a config fault.
        engine.build_macro_table()?;
        Ok(engine)
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn build_macro_table(&self) -> Result<MacroTable, ProjectionError> {
        let config = &self.config;
        let mut rows = Vec::with_capacity(config.horizon.len());
        for year in config.horizon.years() {
            let t = config.horizon.elapsed(year);
            let gdp_natural = compound_project(config.gdp_base, config.gdp_rates.natural, t)?;
            let gdp_shock = compound_project(config.gdp_base, config.gdp_rates.shock, t)?;
            let fdi_natural = compound_project(config.fdi_base, config.fdi_rates.natural, t)?;
            let fdi_shock = compound_project(config.fdi_base, config.fdi_rates.shock, t)?;
            rows.push(MacroRow {
                year,
                gdp_natural,
                gdp_shock,
                fdi_natural,
                fdi_shock,
                gdp_natural_scaled: gdp_natural / config.scale_factor,
                gdp_shock_scaled: gdp_shock / config.scale_factor,
                fdi_natural_scaled: fdi_natural / config.scale_factor,
                fdi_shock_scaled: fdi_shock / config.scale_factor,
            });
        }
        tracing::debug!(rows = rows.len(), "built macro table");
        Ok(MacroTable { rows })
    }

    /// Income follows the GDP rates; there is no separate personal income
    /// series in the model.
    pub fn build_personal_table(
        &self,
        income_base: f64,
        housing_base: f64,
    ) -> Result<PersonalTable, ProjectionError> {
        validate_base("income", income_base)?;
        validate_base("housing", housing_base)?;

        let config = &self.config;
        let mut rows = Vec::with_capacity(config.horizon.len());
        for year in config.horizon.years() {
            let t = config.horizon.elapsed(year);
            let income_natural = compound_project(income_base, config.gdp_rates.natural, t)?;
            let income_shock = compound_project(income_base, config.gdp_rates.shock, t)?;
            let housing_natural = compound_project(housing_base, config.housing_rates.natural, t)?;
            let housing_shock = compound_project(housing_base, config.housing_rates.shock, t)?;
            rows.push(PersonalRow {
                year,
                income_natural,
                income_shock,
                housing_natural,
                housing_shock,
                affordability_natural: housing_natural / income_natural,
                affordability_shock: housing_shock / income_shock,
            });
        }
        tracing::debug!(
            rows = rows.len(),
            income_base,
            housing_base,
            "built personal table"
        );
        Ok(PersonalTable { rows })
    }
}

fn validate_base(field: &'static str, value: f64) -> Result<(), ProjectionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ProjectionError::InvalidInput { field, value });
    }
    Ok(())
}

fn validate_pair(pair: &ScenarioPair) -> Result<(), ProjectionError> {
    for scenario in Scenario::ALL {
        let rate = pair.rate(scenario);
        if !rate.is_finite() || rate <= -1.0 {
            return Err(ProjectionError::Domain { rate });
        }
    }
    Ok(())
}

fn validate_config(config: &ProjectionConfig) -> Result<(), ProjectionError> {
    if config.horizon.end_year < config.horizon.base_year {
        return Err(ProjectionError::InvalidConfig(format!(
            "endYear {} must be >= baseYear {}",
            config.horizon.end_year, config.horizon.base_year
        )));
    }
    if config.horizon.len() > MAX_HORIZON_YEARS {
        return Err(ProjectionError::InvalidConfig(format!(
            "horizon spans {} years, at most {MAX_HORIZON_YEARS} are allowed",
            config.horizon.len()
        )));
    }
    if !config.scale_factor.is_finite() || config.scale_factor <= 0.0 {
        return Err(ProjectionError::InvalidConfig(format!(
            "scaleFactor must be > 0, got {}",
            config.scale_factor
        )));
    }
    validate_pair(&config.gdp_rates)?;
    validate_pair(&config.fdi_rates)?;
    validate_pair(&config.housing_rates)?;
    validate_base("gdpBase", config.gdp_base)?;
    validate_base("fdiBase", config.fdi_base)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        FDI_RATE_NATURAL, FDI_RATE_SHOCK, GDP_RATE_NATURAL, GDP_RATE_SHOCK, HOUSING_RATE_NATURAL,
        HOUSING_RATE_SHOCK, Horizon,
    };
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    fn default_engine() -> ProjectionEngine {
        ProjectionEngine::new(ProjectionConfig::default()).expect("built-in config is valid")
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_zero_elapsed_returns_base(
            base in 0u64..1_000_000_000_000_000,
            rate_bp in -9_999i32..50_000
        ) {
            let base = base as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let value = compound_project(base, rate, 0).expect("rate is in domain");
            prop_assert_eq!(value, base);
        }

        #[test]
        fn prop_growth_direction_follows_rate_sign(
            base in 1u64..1_000_000_000_000_000,
            rate_bp in -9_000i32..9_000,
            years in 0u32..100
        ) {
            let base = base as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let now = compound_project(base, rate, years).expect("rate is in domain");
            let next = compound_project(base, rate, years + 1).expect("rate is in domain");
            prop_assert!(now.is_finite() && next.is_finite());
            if rate_bp > 0 {
                prop_assert!(next > now, "{next} should exceed {now}");
            } else if rate_bp == 0 {
                prop_assert_eq!(next, now);
            } else {
                prop_assert!(next < now, "{next} should be below {now}");
            }
        }

        #[test]
        fn prop_personal_affordability_is_housing_over_income(
            income in 1u32..50_000_000,
            housing in 0u32..500_000_000
        ) {
            let table = default_engine()
                .build_personal_table(income as f64, housing as f64)
                .expect("non-negative inputs");
            for row in &table.rows {
                for scenario in Scenario::ALL {
                    let expected = row.housing(scenario) / row.income(scenario);
                    prop_assert!((row.affordability(scenario) - expected).abs() <= 1e-12 * expected.max(1.0));
                }
            }
        }
    }

    #[test]
    fn compound_project_rejects_rates_at_or_below_minus_one() {
        for rate in [-1.0, -1.5, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
            let err = compound_project(100.0, rate, 3).expect_err("rate out of domain");
            assert!(matches!(err, ProjectionError::Domain { .. }));
        }
    }

    #[test]
    fn compound_project_handles_long_horizons_and_large_bases() {
        let value = compound_project(1e15, 0.05, 100).expect("rate in domain");
        assert!(value.is_finite());
        assert_approx(value, 1e15 * 1.05f64.powi(100));
    }

    #[test]
    fn compound_project_zero_base_stays_zero() {
        for years in 0..10 {
            assert_eq!(compound_project(0.0, 0.04, years).expect("rate in domain"), 0.0);
        }
    }

    #[test]
    fn built_in_shock_rates_are_below_natural_rates() {
        assert!(GDP_RATE_SHOCK < GDP_RATE_NATURAL);
        assert!(FDI_RATE_SHOCK < FDI_RATE_NATURAL);
        assert!(HOUSING_RATE_SHOCK < HOUSING_RATE_NATURAL);
    }

    #[test]
    fn macro_table_covers_horizon_in_order() {
        let table = default_engine().build_macro_table().expect("valid config");
        let years: Vec<i32> = table.rows.iter().map(|row| row.year).collect();
        assert_eq!(years, vec![2024, 2025, 2026, 2027, 2028, 2029]);
    }

    #[test]
    fn macro_scaled_columns_divide_by_scale_factor() {
        let table = default_engine().build_macro_table().expect("valid config");
        for row in &table.rows {
            assert_eq!(row.gdp_natural_scaled, row.gdp_natural / 10_000_000.0);
            assert_eq!(row.gdp_shock_scaled, row.gdp_shock / 10_000_000.0);
            assert_eq!(row.fdi_natural_scaled, row.fdi_natural / 10_000_000.0);
            assert_eq!(row.fdi_shock_scaled, row.fdi_shock / 10_000_000.0);
        }
    }

    #[test]
    fn oracle_gdp_natural_2029_matches_hand_calculation() {
        let table = default_engine().build_macro_table().expect("valid config");
        let last = table.rows.last().expect("six rows");
        assert_eq!(last.year, 2029);
        // 796.904e9 * 1.036424^5 ~= 953.0e9
        assert_approx(
            last.gdp_natural,
            796_904_000_000.0 * (1.0 + GDP_RATE_NATURAL).powi(5),
        );
        assert!((last.gdp_natural / 1e9 - 953.0).abs() < 0.5);
        assert_approx(table.rows[0].gdp_natural, 796_904_000_000.0);
        assert_approx(table.rows[0].fdi_shock, 7_858_117_000.0);
    }

    #[test]
    fn shock_path_ends_below_natural_path() {
        let engine = default_engine();
        let macro_table = engine.build_macro_table().expect("valid config");
        let personal = engine
            .build_personal_table(1_000_000.0, 10_000_000.0)
            .expect("valid inputs");
        let macro_last = macro_table.rows.last().expect("rows");
        let personal_last = personal.rows.last().expect("rows");
        assert!(macro_last.gdp_shock < macro_last.gdp_natural);
        assert!(macro_last.fdi_shock < macro_last.fdi_natural);
        assert!(personal_last.income_shock < personal_last.income_natural);
        assert!(personal_last.housing_shock < personal_last.housing_natural);
    }

    #[test]
    fn personal_base_year_affordability_is_ten() {
        let table = default_engine()
            .build_personal_table(1_000_000.0, 10_000_000.0)
            .expect("valid inputs");
        assert_eq!(table.rows.len(), 6);
        let first = &table.rows[0];
        assert_eq!(first.year, 2024);
        assert_approx(first.affordability_natural, 10.0);
        assert_approx(first.affordability_shock, 10.0);
    }

    #[test]
    fn personal_income_tracks_gdp_rates() {
        let table = default_engine()
            .build_personal_table(1_000_000.0, 0.0)
            .expect("valid inputs");
        let row = &table.rows[3];
        assert_approx(row.income_natural, 1_000_000.0 * (1.0 + GDP_RATE_NATURAL).powi(3));
        assert_approx(row.income_shock, 1_000_000.0 * (1.0 + GDP_RATE_SHOCK).powi(3));
        assert_eq!(row.affordability_natural, 0.0);
    }

    #[test]
    fn zero_income_leaves_affordability_undefined() {
        let engine = default_engine();
        let table = engine
            .build_personal_table(0.0, 10_000_000.0)
            .expect("zero is a valid input");
        for row in &table.rows {
            assert_eq!(row.affordability_natural, f64::INFINITY);
            assert_eq!(row.affordability_shock, f64::INFINITY);
        }

        let table = engine
            .build_personal_table(0.0, 0.0)
            .expect("zero is a valid input");
        for row in &table.rows {
            assert!(row.affordability_natural.is_nan());
            assert!(row.affordability_shock.is_nan());
        }
    }

    #[test]
    fn personal_table_rejects_negative_inputs() {
        let engine = default_engine();
        let err = engine
            .build_personal_table(-1.0, 10.0)
            .expect_err("negative income");
        assert_eq!(
            err,
            ProjectionError::InvalidInput {
                field: "income",
                value: -1.0
            }
        );

        let err = engine
            .build_personal_table(10.0, -0.5)
            .expect_err("negative housing");
        assert!(matches!(
            err,
            ProjectionError::InvalidInput {
                field: "housing",
                ..
            }
        ));

        let err = engine
            .build_personal_table(f64::NAN, 10.0)
            .expect_err("NaN income");
        assert!(matches!(err, ProjectionError::InvalidInput { .. }));
    }

    #[test]
    fn engine_rejects_out_of_domain_config() {
        let mut config = ProjectionConfig::default();
        config.housing_rates.shock = -1.0;
        let err = ProjectionEngine::new(config).expect_err("rate <= -1");
        assert!(matches!(err, ProjectionError::Domain { .. }));

        let mut config = ProjectionConfig::default();
        config.horizon = Horizon {
            base_year: 2030,
            end_year: 2024,
        };
        let err = ProjectionEngine::new(config).expect_err("reversed horizon");
        assert!(matches!(err, ProjectionError::InvalidConfig(_)));

        let mut config = ProjectionConfig::default();
        config.scale_factor = 0.0;
        assert!(ProjectionEngine::new(config).is_err());

        let mut config = ProjectionConfig::default();
        config.fdi_base = -5.0;
        let err = ProjectionEngine::new(config).expect_err("negative base");
        assert!(matches!(
            err,
            ProjectionError::InvalidInput {
                field: "fdiBase",
                ..
            }
        ));

        let mut config = ProjectionConfig::default();
        config.horizon = Horizon {
            base_year: i32::MIN,
            end_year: i32::MAX,
        };
        assert_eq!(config.horizon.len(), u32::MAX as usize + 1);
        let err = ProjectionEngine::new(config).expect_err("horizon too long");
        assert!(matches!(err, ProjectionError::InvalidConfig(msg) if msg.contains("horizon")));

        let mut config = ProjectionConfig::default();
        config.horizon = Horizon {
            base_year: 2024,
            end_year: 2024 + MAX_HORIZON_YEARS as i32 - 1,
        };
        config.gdp_base = 1e300;
        let err = ProjectionEngine::new(config).expect_err("macro values overflow");
        assert!(matches!(err, ProjectionError::Overflow { .. }));
    }

    #[test]
    fn compound_project_reports_overflow_instead_of_infinity() {
        let err = compound_project(1.75e308, HOUSING_RATE_NATURAL, 5).expect_err("exceeds f64");
        assert_eq!(
            err,
            ProjectionError::Overflow {
                base: 1.75e308,
                rate: HOUSING_RATE_NATURAL,
                years: 5
            }
        );
        assert!(compound_project(1.75e308, HOUSING_RATE_NATURAL, 0).is_ok());
    }

    #[test]
    fn huge_housing_input_is_rejected_not_shown_as_undefined() {
        let err = default_engine()
            .build_personal_table(1_000_000.0, 1.75e308)
            .expect_err("housing projection overflows");
        assert!(matches!(err, ProjectionError::Overflow { .. }));
    }

    #[test]
    fn substituted_scenarios_drive_the_tables() {
        let config = ProjectionConfig {
            horizon: Horizon {
                base_year: 2000,
                end_year: 2002,
            },
            gdp_rates: ScenarioPair {
                natural: 0.10,
                shock: -0.10,
            },
            fdi_rates: ScenarioPair {
                natural: 0.0,
                shock: 0.0,
            },
            housing_rates: ScenarioPair {
                natural: 0.0,
                shock: 0.0,
            },
            gdp_base: 100.0,
            fdi_base: 50.0,
            scale_factor: 10.0,
        };
        let table = ProjectionEngine::new(config)
            .expect("valid config")
            .build_macro_table()
            .expect("valid config");
        assert_eq!(table.rows.len(), 3);
        assert_approx(table.rows[2].gdp_natural, 121.0);
        assert_approx(table.rows[2].gdp_shock, 81.0);
        assert_approx(table.rows[2].gdp_natural_scaled, 12.1);
        assert_approx(table.rows[2].fdi_natural, 50.0);
    }
}
