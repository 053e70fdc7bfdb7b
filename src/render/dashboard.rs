use serde::Serialize;

use super::frame::columns;
use super::{
    Frame, LongRecord, RenderError, SvgSurface, format_cell, format_percent, macro_frame,
    personal_frame, render_series_chart, to_long_form,
};
use crate::core::{
    HOUSING_FIELD, INCOME_FIELD, InputField, PersonalInputs, ProjectionConfig, ProjectionEngine,
};

pub const PAGE_TITLE: &str = "Taiwan 2024-2029 Interactive Economic Forecast";
pub const PAGE_CAPTION: &str =
    "Scenario comparison: natural development vs. China model (Hong Kong handover shock)";
pub const AFFORDABILITY_NOTE: &str = "Price-to-income ratio = home value / annual income. \
    For example, a 10,000,000 home on a 1,000,000 income is 10x. Higher means buying is harder.";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Source {
    Macro,
    Personal,
}

struct SectionSpec {
    key: &'static str,
    heading: &'static str,
    title: &'static str,
    unit: &'static str,
    source: Source,
    columns: [&'static str; 2],
}

const SECTIONS: [SectionSpec; 5] = [
    SectionSpec {
        key: "gdp",
        heading: "National level: Taiwan GDP forecast",
        title: "Taiwan GDP forecast (10M USD)",
        unit: "10M USD",
        source: Source::Macro,
        columns: [columns::GDP_NATURAL_SCALED, columns::GDP_SHOCK_SCALED],
    },
    SectionSpec {
        key: "fdi",
        heading: "National level: Taiwan foreign direct investment forecast",
        title: "Taiwan FDI forecast (10M USD)",
        unit: "10M USD",
        source: Source::Macro,
        columns: [columns::FDI_NATURAL_SCALED, columns::FDI_SHOCK_SCALED],
    },
    SectionSpec {
        key: "income",
        heading: "Your income under both scenarios",
        title: "Your income forecast (TWD)",
        unit: "TWD",
        source: Source::Personal,
        columns: [columns::INCOME_NATURAL, columns::INCOME_SHOCK],
    },
    SectionSpec {
        key: "housing",
        heading: "Your home value under both scenarios",
        title: "Your home value forecast (TWD)",
        unit: "TWD",
        source: Source::Personal,
        columns: [columns::HOUSING_NATURAL, columns::HOUSING_SHOCK],
    },
    SectionSpec {
        key: "affordability",
        heading: "Housing affordability: price-to-income ratio",
        title: "Price-to-income ratio (x)",
        unit: "x",
        source: Source::Personal,
        columns: [columns::AFFORDABILITY_NATURAL, columns::AFFORDABILITY_SHOCK],
    },
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumption {
    pub label: &'static str,
    pub rate: f64,
    pub display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub key: &'static str,
    pub heading: &'static str,
    pub title: &'static str,
    pub unit: &'static str,
    /// Year column followed by the two scenario columns.
    pub columns: Vec<String>,
    /// Display-rounded cells; undefined values read `N/A`.
    pub rows: Vec<Vec<String>>,
    pub records: Vec<LongRecord>,
    pub chart_svg: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: &'static str,
    pub caption: &'static str,
    pub base_year: i32,
    pub end_year: i32,
    pub income: f64,
    pub housing: f64,
    pub inputs: [InputField; 2],
    pub assumptions: Vec<Assumption>,
    pub sections: Vec<Section>,
    pub note: &'static str,
}

/// Recomputes every table from the engine's configuration and the given
/// personal inputs, then renders the five sections in display order.
pub fn build_dashboard(
    engine: &ProjectionEngine,
    inputs: PersonalInputs,
) -> Result<Dashboard, RenderError> {
    let macro_table = engine.build_macro_table()?;
    let personal_table = engine.build_personal_table(inputs.income, inputs.housing)?;

    let macro_display = macro_frame(&macro_table)?.rounded();
    let personal_display = personal_frame(&personal_table)?.rounded();

    let sections = SECTIONS
        .iter()
        .map(|spec| {
            let frame = match spec.source {
                Source::Macro => &macro_display,
                Source::Personal => &personal_display,
            };
            build_section(spec, frame)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let config = engine.config();
    Ok(Dashboard {
        title: PAGE_TITLE,
        caption: PAGE_CAPTION,
        base_year: config.horizon.base_year,
        end_year: config.horizon.end_year,
        income: inputs.income,
        housing: inputs.housing,
        inputs: [INCOME_FIELD, HOUSING_FIELD],
        assumptions: assumptions(config),
        sections,
        note: AFFORDABILITY_NOTE,
    })
}

fn build_section(spec: &SectionSpec, display: &Frame) -> Result<Section, RenderError> {
    let table = display.select(&spec.columns)?;
    let records = to_long_form(display, &spec.columns)?;

    let mut surface = SvgSurface::new();
    render_series_chart(&mut surface, &records, spec.title, Some(spec.unit));
    let chart_svg = surface.into_documents().pop().unwrap_or_default();

    let mut header = vec![table.time_column().to_string()];
    header.extend(table.columns().iter().map(|column| column.name.clone()));

    let rows = table
        .times()
        .iter()
        .enumerate()
        .map(|(index, year)| {
            let mut row = vec![year.to_string()];
            row.extend(
                table
                    .columns()
                    .iter()
                    .map(|column| format_cell(column.values[index], column.kind)),
            );
            row
        })
        .collect();

    Ok(Section {
        key: spec.key,
        heading: spec.heading,
        title: spec.title,
        unit: spec.unit,
        columns: header,
        rows,
        records,
        chart_svg,
    })
}

fn assumptions(config: &ProjectionConfig) -> Vec<Assumption> {
    [
        ("Natural GDP growth", config.gdp_rates.natural),
        ("China-model GDP growth", config.gdp_rates.shock),
        ("Natural home price growth", config.housing_rates.natural),
        ("China-model home price growth", config.housing_rates.shock),
        ("Natural FDI growth", config.fdi_rates.natural),
        ("China-model FDI growth", config.fdi_rates.shock),
    ]
    .into_iter()
    .map(|(label, rate)| Assumption {
        label,
        rate,
        display: format!("{} / year", format_percent(rate)),
    })
    .collect()
}
