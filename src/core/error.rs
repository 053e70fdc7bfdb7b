use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("{field} must be a finite value >= 0, got {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("growth rate must be finite and > -1, got {rate}")]
    Domain { rate: f64 },

    #[error("projecting {base} at rate {rate} for {years} years exceeds the representable range")]
    Overflow { base: f64, rate: f64, years: u32 },

    #[error("invalid projection config: {0}")]
    InvalidConfig(String),
}
