//! Chart views: resource bars, monthly trend lines and the daily series.
//!
//! Each `render_*` function draws one complete view into the given area.
//! The `*_points` / `*_groups` helpers hold the data shaping so it can be
//! checked without a terminal.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use report_core::formatting::{format_compact, format_number, truncate_label};
use report_core::models::{DailyCount, UserMonthlySeries, UserResourceUsage};
use report_core::time_utils::month_label;

use crate::themes::Theme;

/// Bars are drawn as a percentage of the largest value in their series so
/// that CPU counts and memory megabytes share one axis.
const BAR_SCALE: u64 = 100;

// ── Resource bar chart ────────────────────────────────────────────────────────

/// The CPU and memory bars of one user.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub label: String,
    pub cpu: ScaledBar,
    pub mem: ScaledBar,
}

/// A bar height relative to the series maximum plus its printed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledBar {
    pub value: f64,
    pub height: u64,
    pub text: String,
}

/// Scale CPU and memory totals independently to `0..=BAR_SCALE`.
pub fn resource_groups(usage: &[UserResourceUsage], label_width: usize) -> Vec<ResourceGroup> {
    let max_cpu = usage.iter().map(|u| u.cpus_req).fold(0.0, f64::max);
    let max_mem = usage.iter().map(|u| u.mem_req).fold(0.0, f64::max);

    let scaled = |value: f64, max: f64| ScaledBar {
        value,
        height: if max > 0.0 {
            ((value.max(0.0) / max) * BAR_SCALE as f64).round() as u64
        } else {
            0
        },
        text: format_compact(value),
    };

    usage
        .iter()
        .map(|u| ResourceGroup {
            label: truncate_label(&u.user_name, label_width),
            cpu: scaled(u.cpus_req, max_cpu),
            mem: scaled(u.mem_req, max_mem),
        })
        .collect()
}

/// Grouped bar chart of requested CPU and RAM for the top users.
pub fn render_resource_chart(
    frame: &mut Frame,
    area: Rect,
    usage: &[UserResourceUsage],
    top_n: usize,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let users = usage.len().max(1) as u16;
    // Two bars and a gap per group, inside the borders.
    let bar_width = ((chunks[0].width.saturating_sub(2) / users).saturating_sub(2) / 2).clamp(1, 12);
    let label_width = usize::from(bar_width * 2 + 1);

    let groups = resource_groups(usage, label_width);
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Top {} users by resource usage ", top_n)),
        )
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(2)
        .max(BAR_SCALE)
        .value_style(theme.text)
        .label_style(theme.axis);

    for group in &groups {
        let bars = [
            Bar::default()
                .value(group.cpu.height)
                .text_value(group.cpu.text.clone())
                .style(theme.bar_cpu),
            Bar::default()
                .value(group.mem.height)
                .text_value(group.mem.text.clone())
                .style(theme.bar_mem),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(group.label.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, chunks[0]);

    let legend = Line::from(vec![
        Span::styled("■ ", theme.bar_cpu),
        Span::styled("Total CPUs requested   ", theme.text),
        Span::styled("■ ", theme.bar_mem),
        Span::styled("Total RAM requested (MB)", theme.text),
    ]);
    frame.render_widget(ratatui::widgets::Paragraph::new(legend), chunks[1]);
}

// ── Monthly trend ─────────────────────────────────────────────────────────────

/// Shared month axis and one point list per user, x = month index.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPlot {
    pub months: Vec<String>,
    pub series: Vec<(String, Vec<(f64, f64)>)>,
    pub max_count: u64,
}

pub fn monthly_points(series: &[UserMonthlySeries]) -> MonthlyPlot {
    let mut months: Vec<String> = series
        .iter()
        .flat_map(|s| s.months.iter().map(|m| m.month.clone()))
        .collect();
    months.sort();
    months.dedup();

    let index_of = |key: &str| months.binary_search_by(|m| m.as_str().cmp(key)).ok();

    let mut max_count = 0;
    let plotted = series
        .iter()
        .map(|s| {
            let points = s
                .months
                .iter()
                .filter_map(|m| {
                    max_count = max_count.max(m.job_count);
                    index_of(&m.month).map(|i| (i as f64, m.job_count as f64))
                })
                .collect();
            (s.user_name.clone(), points)
        })
        .collect();

    MonthlyPlot {
        months,
        series: plotted,
        max_count,
    }
}

/// Line chart with one line per top user over calendar months.
pub fn render_monthly_chart(
    frame: &mut Frame,
    area: Rect,
    series: &[UserMonthlySeries],
    theme: &Theme,
) {
    let plot = monthly_points(series);
    let x_max = plot.months.len().saturating_sub(1).max(1) as f64;
    let y_max = nice_upper_bound(plot.max_count);

    let datasets: Vec<Dataset> = plot
        .series
        .iter()
        .enumerate()
        .map(|(i, (name, points))| {
            Dataset::default()
                .name(name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.series_style(i))
                .data(points)
        })
        .collect();

    let x_labels = edge_labels(&plot.months, |m| month_label(m));

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Monthly jobs, top 5 users "),
        )
        .x_axis(axis("Month", [0.0, x_max], x_labels, theme.axis))
        .y_axis(axis("Jobs", [0.0, y_max], count_labels(y_max), theme.axis));

    frame.render_widget(chart, area);
}

// ── Daily series ──────────────────────────────────────────────────────────────

/// Points of the daily series, x = day offset from the first day.
pub fn daily_points(daily: &[DailyCount]) -> Vec<(f64, f64)> {
    daily
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.job_count as f64))
        .collect()
}

/// Time-series line chart of jobs submitted per day.
pub fn render_daily_chart(frame: &mut Frame, area: Rect, daily: &[DailyCount], theme: &Theme) {
    let points = daily_points(daily);
    let max_count = daily.iter().map(|d| d.job_count).max().unwrap_or(0);
    let x_max = daily.len().saturating_sub(1).max(1) as f64;
    let y_max = nice_upper_bound(max_count);

    let dates: Vec<NaiveDate> = daily.iter().map(|d| d.date).collect();
    let x_labels = edge_labels(&dates, |d| d.format("%Y-%m-%d").to_string());

    let datasets = vec![Dataset::default()
        .name("jobs")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.series_style(0))
        .data(&points)];

    let total: u64 = daily.iter().map(|d| d.job_count).sum();
    let title = format!(
        " Jobs submitted per day ({} jobs over {} days) ",
        format_number(total as f64, 0),
        format_number(daily.len() as f64, 0)
    );

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(axis("Date", [0.0, x_max], x_labels, theme.axis))
        .y_axis(axis("Jobs", [0.0, y_max], count_labels(y_max), theme.axis))
        .legend_position(None);

    frame.render_widget(chart, area);
}

// ── Axis helpers ──────────────────────────────────────────────────────────────

fn axis<'a>(title: &'a str, bounds: [f64; 2], labels: Vec<Span<'a>>, style: Style) -> Axis<'a> {
    Axis::default()
        .title(title)
        .style(style)
        .bounds(bounds)
        .labels(labels)
}

/// First, middle and last labels of an ordered axis.
fn edge_labels<T>(items: &[T], fmt: impl Fn(&T) -> String) -> Vec<Span<'static>> {
    match items {
        [] => Vec::new(),
        [only] => vec![Span::raw(fmt(only))],
        [first, last] => vec![Span::raw(fmt(first)), Span::raw(fmt(last))],
        _ => vec![
            Span::raw(fmt(&items[0])),
            Span::raw(fmt(&items[items.len() / 2])),
            Span::raw(fmt(&items[items.len() - 1])),
        ],
    }
}

fn count_labels(y_max: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw("0"),
        Span::raw(format_compact(y_max / 2.0)),
        Span::raw(format_compact(y_max)),
    ]
}

/// Smallest "round" axis bound at or above `max` (1, 2, 5 × 10^k), never 0.
pub fn nice_upper_bound(max: u64) -> f64 {
    if max == 0 {
        return 1.0;
    }
    let max = max as f64;
    let magnitude = 10f64.powf(max.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|step| step * magnitude)
        .find(|bound| *bound >= max)
        .unwrap_or(10.0 * magnitude)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
