use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::themes::Theme;

/// Application title shown in the header border.
pub const TITLE: &str = "SLURM JOB REPORT";

/// Header with the report title, the source files and one tab per view.
pub struct Header<'a> {
    /// Tab titles, in display order.
    pub tabs: &'a [&'a str],
    /// Index of the highlighted tab.
    pub selected: usize,
    /// Short description of the inputs, e.g. `"jobs.csv + users.csv"`.
    pub source: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize, source: &'a str, theme: &'a Theme) -> Self {
        Self {
            tabs,
            selected,
            source,
            theme,
        }
    }

    /// Title line placed on the header border.
    pub fn title_line(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!(" {} ", TITLE), self.theme.header),
            Span::styled(format!("[ {} ] ", self.source), self.theme.dim),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .tabs
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("{} {}", i + 1, t)))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.selected)
            .style(self.theme.tab)
            .highlight_style(self.theme.tab_selected)
            .divider(Span::styled(" | ", self.theme.dim))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title_line()),
            );

        frame.render_widget(tabs, area);
    }
}

/// Key hints shown below the active view.
pub fn footer_line(theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("Tab/→ ", theme.text),
        Span::styled("next  ", theme.dim),
        Span::styled("Shift+Tab/← ", theme.text),
        Span::styled("previous  ", theme.dim),
        Span::styled("1-4 ", theme.text),
        Span::styled("jump  ", theme.dim),
        Span::styled("q ", theme.text),
        Span::styled("quit", theme.dim),
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_title_line_contains_title_and_source() {
        let theme = Theme::dark();
        let header = Header::new(&["Top users"], 0, "jobs.csv + users.csv", &theme);
        let text = line_text(&header.title_line());
        assert!(text.contains(TITLE));
        assert!(text.contains("jobs.csv + users.csv"));
    }

    #[test]
    fn test_footer_mentions_quit() {
        let text = line_text(&footer_line(&Theme::dark()));
        assert!(text.contains("quit"));
    }

    #[test]
    fn test_render_header_does_not_panic() {
        let backend = TestBackend::new(100, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let tabs = ["Top users", "Resources", "Monthly", "Daily"];

        terminal
            .draw(|frame| {
                let area = frame.area();
                Header::new(&tabs, 2, "a.csv + b.csv", &theme).render(frame, area);
            })
            .unwrap();
    }
}
