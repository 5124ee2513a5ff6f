//! Ranking table for the top users by job count.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per user and
//! each user's share of the listed jobs.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use report_core::formatting;
use report_core::models::UserJobCount;

use crate::themes::Theme;

/// Widest user-name column, in terminal cells.
const MAX_NAME_WIDTH: u16 = 32;

/// Render the top-users table into `area`.
pub fn render_top_users(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[UserJobCount],
    theme: &Theme,
) {
    let header_cells = ["#", "User", "Jobs", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let total: u64 = rows.iter().map(|r| r.job_count).sum();

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let share = if total == 0 {
                0.0
            } else {
                row.job_count as f64 / total as f64 * 100.0
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(formatting::truncate_label(
                    &row.user_name,
                    usize::from(MAX_NAME_WIDTH),
                )),
                Cell::from(formatting::format_number(row.job_count as f64, 0)),
                Cell::from(format!("{}%", formatting::format_number(share, 1))),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(name_column_width(rows)),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder when a view has nothing to show or could not be
/// computed.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, reason: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data to display", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(reason.to_string(), theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

/// Width of the user column: the widest name (in cells), clamped.
fn name_column_width(rows: &[UserJobCount]) -> u16 {
    let widest = rows
        .iter()
        .map(|r| r.user_name.width())
        .max()
        .unwrap_or(0);
    u16::try_from(widest)
        .unwrap_or(MAX_NAME_WIDTH)
        .clamp(4, MAX_NAME_WIDTH)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
