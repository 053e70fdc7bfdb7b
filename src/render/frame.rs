use super::RenderError;
use crate::core::{MacroTable, PersonalTable};

/// Column names shared by the frames, tables and chart series.
pub mod columns {
    pub const YEAR: &str = "Year";

    pub const GDP_NATURAL_USD: &str = "Natural GDP (USD)";
    pub const GDP_SHOCK_USD: &str = "China-model GDP (USD)";
    pub const FDI_NATURAL_USD: &str = "Natural FDI (USD)";
    pub const FDI_SHOCK_USD: &str = "China-model FDI (USD)";

    pub const GDP_NATURAL_SCALED: &str = "Natural GDP (10M USD)";
    pub const GDP_SHOCK_SCALED: &str = "China-model GDP (10M USD)";
    pub const FDI_NATURAL_SCALED: &str = "Natural FDI (10M USD)";
    pub const FDI_SHOCK_SCALED: &str = "China-model FDI (10M USD)";

    pub const INCOME_NATURAL: &str = "Natural income (TWD)";
    pub const INCOME_SHOCK: &str = "China-model income (TWD)";
    pub const HOUSING_NATURAL: &str = "Natural home value (TWD)";
    pub const HOUSING_SHOCK: &str = "China-model home value (TWD)";
    pub const AFFORDABILITY_NATURAL: &str = "Natural price-to-income";
    pub const AFFORDABILITY_SHOCK: &str = "China-model price-to-income";
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ValueKind {
    Currency,
    Ratio,
}

impl ValueKind {
    pub fn decimals(self) -> usize {
        match self {
            ValueKind::Currency => 0,
            ValueKind::Ratio => 2,
        }
    }

    /// Ties go to even, matching the rounding of the numeric stack the
    /// published figures were produced with. Non-finite values pass through.
    pub fn round(self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        match self {
            ValueKind::Currency => value.round_ties_even(),
            ValueKind::Ratio => (value * 100.0).round_ties_even() / 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    pub name: String,
    pub kind: ValueKind,
    pub values: Vec<f64>,
}

/// A wide table: one time column plus named value columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    time_column: String,
    times: Vec<i32>,
    columns: Vec<FrameColumn>,
}

impl Frame {
    pub fn new(time_column: impl Into<String>, times: Vec<i32>) -> Self {
        Self {
            time_column: time_column.into(),
            times,
            columns: Vec::new(),
        }
    }

    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        kind: ValueKind,
        values: Vec<f64>,
    ) -> Result<(), RenderError> {
        let name = name.into();
        if values.len() != self.times.len() {
            return Err(RenderError::ColumnLength {
                name,
                expected: self.times.len(),
                actual: values.len(),
            });
        }
        self.columns.push(FrameColumn { name, kind, values });
        Ok(())
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn times(&self) -> &[i32] {
        &self.times
    }

    pub fn columns(&self) -> &[FrameColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&FrameColumn, RenderError> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| RenderError::UnknownColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Display copy with every column rounded per its kind. `self` is left
    /// untouched so derived values keep coming from unrounded data.
    pub fn rounded(&self) -> Frame {
        Frame {
            time_column: self.time_column.clone(),
            times: self.times.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| FrameColumn {
                    name: column.name.clone(),
                    kind: column.kind,
                    values: column.values.iter().map(|v| column.kind.round(*v)).collect(),
                })
                .collect(),
        }
    }

    pub fn select(&self, names: &[&str]) -> Result<Frame, RenderError> {
        let mut selected = Frame::new(self.time_column.clone(), self.times.clone());
        for name in names {
            let column = self.column(name)?;
            selected.push_column(column.name.clone(), column.kind, column.values.clone())?;
        }
        Ok(selected)
    }
}

pub fn macro_frame(table: &MacroTable) -> Result<Frame, RenderError> {
    let times = table.rows.iter().map(|row| row.year).collect();
    let mut frame = Frame::new(columns::YEAR, times);
    let extractors: [(&str, fn(&crate::core::MacroRow) -> f64); 8] = [
        (columns::GDP_NATURAL_USD, |row| row.gdp_natural),
        (columns::GDP_SHOCK_USD, |row| row.gdp_shock),
        (columns::FDI_NATURAL_USD, |row| row.fdi_natural),
        (columns::FDI_SHOCK_USD, |row| row.fdi_shock),
        (columns::GDP_NATURAL_SCALED, |row| row.gdp_natural_scaled),
        (columns::GDP_SHOCK_SCALED, |row| row.gdp_shock_scaled),
        (columns::FDI_NATURAL_SCALED, |row| row.fdi_natural_scaled),
        (columns::FDI_SHOCK_SCALED, |row| row.fdi_shock_scaled),
    ];
    for (name, extract) in extractors {
        frame.push_column(
            name,
            ValueKind::Currency,
            table.rows.iter().map(extract).collect(),
        )?;
    }
    Ok(frame)
}

pub fn personal_frame(table: &PersonalTable) -> Result<Frame, RenderError> {
    let times = table.rows.iter().map(|row| row.year).collect();
    let mut frame = Frame::new(columns::YEAR, times);
    let extractors: [(&str, ValueKind, fn(&crate::core::PersonalRow) -> f64); 6] = [
        (columns::INCOME_NATURAL, ValueKind::Currency, |row| {
            row.income_natural
        }),
        (columns::INCOME_SHOCK, ValueKind::Currency, |row| row.income_shock),
        (columns::HOUSING_NATURAL, ValueKind::Currency, |row| {
            row.housing_natural
        }),
        (columns::HOUSING_SHOCK, ValueKind::Currency, |row| {
            row.housing_shock
        }),
        (columns::AFFORDABILITY_NATURAL, ValueKind::Ratio, |row| {
            row.affordability_natural
        }),
        (columns::AFFORDABILITY_SHOCK, ValueKind::Ratio, |row| {
            row.affordability_shock
        }),
    ];
    for (name, kind, extract) in extractors {
        frame.push_column(name, kind, table.rows.iter().map(extract).collect())?;
    }
    Ok(frame)
}
