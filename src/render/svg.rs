use super::chart::{CHART_HEIGHT, CHART_WIDTH, ChartSurface, SeriesChart};
use super::format::{UNDEFINED_LABEL, format_grouped};

const MARGIN_LEFT: f64 = 96.0;
const MARGIN_RIGHT: f64 = 210.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 52.0;
const POINT_RADIUS: f64 = 5.0;
const STROKE_WIDTH: f64 = 4.0;
const TARGET_TICKS: f64 = 5.0;
const MAX_TICKS: usize = 20;

/// Collects each drawn chart as a standalone SVG document.
#[derive(Debug, Default)]
pub struct SvgSurface {
    documents: Vec<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<String> {
        self.documents
    }
}

impl ChartSurface for SvgSurface {
    fn draw_series_chart(&mut self, chart: &SeriesChart) {
        self.documents.push(chart_to_svg(chart));
    }
}

struct YScale {
    min: f64,
    max: f64,
    step: f64,
}

impl YScale {
    fn from_chart(chart: &SeriesChart) -> Self {
        let finite = chart
            .series
            .iter()
            .flat_map(|series| series.points.iter().map(|point| point.value))
            .filter(|value| value.is_finite());
        // Zero is always in the domain.
        let (lo, hi) = finite.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self::rounded_out(lo, hi).unwrap_or_else(|| Self::exact(lo, hi))
    }

    /// Bounds widened to whole nice steps. `None` when widening leaves the
    /// f64 range.
    fn rounded_out(lo: f64, hi: f64) -> Option<Self> {
        let span = hi - lo;
        let step = if span > 0.0 {
            nice_step(span / TARGET_TICKS)
        } else {
            1.0
        };
        let min = (lo / step).floor() * step;
        let mut max = (hi / step).ceil() * step;
        if max <= min {
            max = min + step;
        }
        let scale = Self { min, max, step };
        scale.is_bounded().then_some(scale)
    }

    fn exact(lo: f64, hi: f64) -> Self {
        Self {
            min: lo,
            max: hi,
            step: hi / TARGET_TICKS - lo / TARGET_TICKS,
        }
    }

    fn is_bounded(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && (self.max - self.min).is_finite()
    }

    fn ticks(&self) -> Vec<f64> {
        let count = (self.max / self.step - self.min / self.step).round() as usize;
        (0..=count.min(MAX_TICKS))
            .map(|i| self.min + i as f64 * self.step)
            .filter(|tick| tick.is_finite())
            .collect()
    }

    fn decimals(&self) -> usize {
        if self.step >= 1.0 { 0 } else { 2 }
    }

    fn project(&self, value: f64, top: f64, height: f64) -> f64 {
        // Halved operands keep the span finite near f64::MAX.
        let offset = value / 2.0 - self.min / 2.0;
        let span = self.max / 2.0 - self.min / 2.0;
        top + height - offset / span * height
    }
}

fn nice_step(raw: f64) -> f64 {
    let exponent = 10f64.powf(raw.log10().floor());
    let fraction = raw / exponent;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * exponent
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn chart_to_svg(chart: &SeriesChart) -> String {
    let plot_left = MARGIN_LEFT;
    let plot_top = MARGIN_TOP;
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let plot_bottom = plot_top + plot_height;

    let band = if chart.times.is_empty() {
        plot_width
    } else {
        plot_width / chart.times.len() as f64
    };
    let x_of = |time: i32| -> Option<f64> {
        chart
            .times
            .iter()
            .position(|t| *t == time)
            .map(|index| plot_left + (index as f64 + 0.5) * band)
    };
    let scale = YScale::from_chart(chart);
    let y_of = |value: f64| scale.project(value, plot_top, plot_height);

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{CHART_HEIGHT}" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" font-family="sans-serif" font-size="12">"#
    ));
    svg.push_str(&format!(
        r##"<rect width="{CHART_WIDTH}" height="{CHART_HEIGHT}" fill="#FFFFFF"/>"##
    ));
    svg.push_str(&format!(
        r#"<text x="{plot_left}" y="24" font-size="16" font-weight="bold" fill="black">{}</text>"#,
        escape_xml(&chart.title)
    ));

    // y axis: grid, tick labels, title
    for tick in scale.ticks() {
        let y = y_of(tick);
        svg.push_str(&format!(
            r##"<line x1="{plot_left}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#E0E0E0"/>"##,
            plot_left + plot_width
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" fill="black">{}</text>"#,
            plot_left - 6.0,
            y + 4.0,
            format_grouped(tick, scale.decimals())
        ));
    }
    svg.push_str(&format!(
        r#"<text transform="translate(16 {:.1}) rotate(-90)" text-anchor="middle" fill="black">{}</text>"#,
        plot_top + plot_height / 2.0,
        escape_xml(&chart.y_title)
    ));

    // x axis: one tick per year
    svg.push_str(&format!(
        r#"<line x1="{plot_left}" y1="{plot_bottom:.1}" x2="{:.1}" y2="{plot_bottom:.1}" stroke="black"/>"#,
        plot_left + plot_width
    ));
    for time in &chart.times {
        if let Some(x) = x_of(*time) {
            svg.push_str(&format!(
                r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle" fill="black">{time}</text>"#,
                plot_bottom + 18.0
            ));
        }
    }
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="black">{}</text>"#,
        plot_left + plot_width / 2.0,
        CHART_HEIGHT - 10.0,
        escape_xml(&chart.x_title)
    ));

    for series in &chart.series {
        let name = escape_xml(&series.name);

        // Undefined values break the line rather than dropping to zero.
        let mut path = String::new();
        let mut pen_down = false;
        for point in &series.points {
            let Some(x) = x_of(point.time) else { continue };
            if !point.value.is_finite() {
                pen_down = false;
                continue;
            }
            let command = if pen_down { 'L' } else { 'M' };
            path.push_str(&format!("{command}{x:.1},{:.1} ", y_of(point.value)));
            pen_down = true;
        }
        if !path.is_empty() {
            svg.push_str(&format!(
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{STROKE_WIDTH}"/>"#,
                path.trim_end(),
                series.color
            ));
        }

        for point in &series.points {
            let Some(x) = x_of(point.time) else { continue };
            let value_text = format_grouped(point.value, chart.value_decimals);
            let tooltip = format!(
                "{}: {}\nSeries: {name}\nValue: {value_text}",
                escape_xml(&chart.x_title),
                point.time
            );
            if point.value.is_finite() {
                svg.push_str(&format!(
                    r#"<circle cx="{x:.1}" cy="{:.1}" r="{POINT_RADIUS}" fill="{}"><title>{tooltip}</title></circle>"#,
                    y_of(point.value),
                    series.color
                ));
            } else {
                svg.push_str(&format!(
                    r#"<text class="undefined" x="{x:.1}" y="{:.1}" text-anchor="middle" font-weight="bold" fill="{}">{UNDEFINED_LABEL}<title>{tooltip}</title></text>"#,
                    plot_top + 14.0,
                    series.color
                ));
            }
        }
    }

    // legend
    let legend_x = plot_left + plot_width + 20.0;
    svg.push_str(&format!(
        r#"<text x="{legend_x:.1}" y="{:.1}" font-weight="bold" fill="black">Scenario / indicator</text>"#,
        plot_top + 4.0
    ));
    for (index, series) in chart.series.iter().enumerate() {
        let y = plot_top + 24.0 + index as f64 * 20.0;
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{POINT_RADIUS}" fill="{}"/>"#,
            legend_x + 5.0,
            y - 4.0,
            series.color
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{y:.1}" fill="black">{}</text>"#,
            legend_x + 16.0,
            escape_xml(&series.name)
        ));
    }

    svg.push_str("</svg>");
    svg
}
