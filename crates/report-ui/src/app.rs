//! Main application state and TUI event loop for the Slurm report.
//!
//! [`App`] owns the theme, the precomputed views and the selected tab. It
//! draws one view at a time and cycles through them on key presses.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame, Terminal,
};

use report_core::error::{ReportError, Result as ReportResult};
use report_core::models::{DailyCount, UserJobCount, UserMonthlySeries, UserResourceUsage};

use crate::charts;
use crate::components::header::{footer_line, Header};
use crate::table_view;
use crate::themes::Theme;

// ── ViewKind ──────────────────────────────────────────────────────────────────

/// The views the TUI can show, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Ranking table of users by job count.
    TopUsers,
    /// CPU / RAM bar chart.
    Resources,
    /// Monthly trend of the top five users.
    Monthly,
    /// Jobs submitted per day.
    Daily,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::TopUsers,
        ViewKind::Resources,
        ViewKind::Monthly,
        ViewKind::Daily,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::TopUsers => "Top users",
            ViewKind::Resources => "CPU / RAM",
            ViewKind::Monthly => "Monthly trend",
            ViewKind::Daily => "Jobs per day",
        }
    }
}

// ── Panel ─────────────────────────────────────────────────────────────────────

/// Content of one view: the computed data, or why it is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> From<ReportResult<T>> for Panel<T> {
    fn from(result: ReportResult<T>) -> Self {
        match result {
            Ok(data) => Panel::Ready(data),
            Err(e) => Panel::Unavailable(e.to_string()),
        }
    }
}

/// Everything the TUI displays, computed before the event loop starts.
#[derive(Debug, Clone)]
pub struct ReportViews {
    /// Label of the inputs shown in the header.
    pub source: String,
    /// Row limit used for the ranking views.
    pub top_n: usize,
    pub top_users: Panel<Vec<UserJobCount>>,
    pub resources: Panel<Vec<UserResourceUsage>>,
    pub monthly: Panel<Vec<UserMonthlySeries>>,
    pub daily: Panel<Vec<DailyCount>>,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the report TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    pub views: ReportViews,
    /// Index into [`ViewKind::ALL`].
    pub selected: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme: Theme, views: ReportViews) -> Self {
        Self {
            theme,
            views,
            selected: 0,
            should_quit: false,
        }
    }

    pub fn current_view(&self) -> ViewKind {
        ViewKind::ALL[self.selected]
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the TUI until `q`, `Esc` or `Ctrl+C`.
    ///
    /// The terminal is restored even when drawing or reading events fails.
    pub fn run(mut self) -> ReportResult<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal =
            Terminal::new(backend).map_err(|e| ReportError::Terminal(e.to_string()))?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal
            .show_cursor()
            .map_err(|e| ReportError::Terminal(e.to_string()))?;

        result
    }

    /// Apply one key press to the navigation state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let count = ViewKind::ALL.len();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.selected = (self.selected + count - 1) % count;
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if index < count {
                    self.selected = index;
                }
            }
            _ => {}
        }
    }

    /// Render the header, the selected view and the key hints into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let titles: Vec<&str> = ViewKind::ALL.iter().map(|v| v.title()).collect();
        Header::new(&titles, self.selected, &self.views.source, &self.theme)
            .render(frame, chunks[0]);

        self.render_view(frame, chunks[1]);

        frame.render_widget(Paragraph::new(footer_line(&self.theme)), chunks[2]);
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> ReportResult<()> {
        let tick_rate = Duration::from_millis(250);
        while !self.should_quit {
            terminal
                .draw(|frame| self.render(frame))
                .map_err(|e| ReportError::Terminal(e.to_string()))?;
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn render_view(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let view = self.current_view();
        let theme = &self.theme;
        let title = view.title();

        match view {
            ViewKind::TopUsers => match &self.views.top_users {
                Panel::Ready(rows) if !rows.is_empty() => {
                    let title = format!("Top {} users by job count", self.views.top_n);
                    table_view::render_top_users(frame, area, &title, rows, theme);
                }
                panel => render_placeholder(frame, area, title, panel, theme),
            },
            ViewKind::Resources => match &self.views.resources {
                Panel::Ready(usage) if !usage.is_empty() => {
                    charts::render_resource_chart(frame, area, usage, self.views.top_n, theme);
                }
                panel => render_placeholder(frame, area, title, panel, theme),
            },
            ViewKind::Monthly => match &self.views.monthly {
                Panel::Ready(series) if series.iter().any(|s| !s.months.is_empty()) => {
                    charts::render_monthly_chart(frame, area, series, theme);
                }
                panel => render_placeholder(frame, area, title, panel, theme),
            },
            ViewKind::Daily => match &self.views.daily {
                Panel::Ready(daily) if !daily.is_empty() => {
                    charts::render_daily_chart(frame, area, daily, theme);
                }
                panel => render_placeholder(frame, area, title, panel, theme),
            },
        }
    }
}

fn render_placeholder<T>(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    title: &str,
    panel: &Panel<T>,
    theme: &Theme,
) {
    let reason = match panel {
        Panel::Unavailable(reason) => reason.as_str(),
        Panel::Ready(_) => "No jobs matched this view.",
    };
    table_view::render_no_data(frame, area, title, reason, theme);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use report_core::models::MonthlyCount;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_views() -> ReportViews {
        ReportViews {
            source: "jobs.csv + users.csv".to_string(),
            top_n: 5,
            top_users: Panel::Ready(vec![UserJobCount {
                user_name: "alice".to_string(),
                job_count: 3,
            }]),
            resources: Panel::Ready(vec![UserResourceUsage {
                user_name: "alice".to_string(),
                cpus_req: 12.0,
                mem_req: 3_000.0,
            }]),
            monthly: Panel::Ready(vec![UserMonthlySeries {
                user_name: "alice".to_string(),
                months: vec![MonthlyCount {
                    month: "2024-01".to_string(),
                    job_count: 3,
                }],
            }]),
            daily: Panel::Unavailable(
                ReportError::MissingColumn {
                    table: "jobs",
                    column: "time_submit",
                }
                .to_string(),
            ),
        }
    }

    fn make_app() -> App {
        App::new(Theme::dark(), make_views())
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Panel ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_panel_from_result() {
        let ok: Panel<u32> = Ok(7).into();
        assert_eq!(ok, Panel::Ready(7));

        let err: Panel<u32> = Err(ReportError::NotLoaded).into();
        match err {
            Panel::Unavailable(msg) => assert!(msg.contains("not loaded")),
            Panel::Ready(_) => panic!("expected unavailable panel"),
        }
    }

    // ── Navigation ────────────────────────────────────────────────────────────

    #[test]
    fn test_app_starts_on_top_users() {
        let app = make_app();
        assert_eq!(app.current_view(), ViewKind::TopUsers);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_tab_cycles_forward_and_wraps() {
        let mut app = make_app();
        for expected in [
            ViewKind::Resources,
            ViewKind::Monthly,
            ViewKind::Daily,
            ViewKind::TopUsers,
        ] {
            app.handle_key(key(KeyCode::Tab));
            assert_eq!(app.current_view(), expected);
        }
    }

    #[test]
    fn test_back_tab_wraps_backwards() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.current_view(), ViewKind::Daily);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.current_view(), ViewKind::Monthly);
    }

    #[test]
    fn test_number_keys_jump() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.current_view(), ViewKind::Monthly);
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.current_view(), ViewKind::Monthly);
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = make_app();
            app.handle_key(key(code));
            assert!(app.should_quit);
        }
        let mut app = make_app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = make_app();
        let mut release = key(KeyCode::Tab);
        release.kind = KeyEventKind::Release;
        app.handle_key(release);
        assert_eq!(app.current_view(), ViewKind::TopUsers);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_view_does_not_panic() {
        let mut app = make_app();
        for _ in ViewKind::ALL {
            screen(&app);
            app.handle_key(key(KeyCode::Tab));
        }
    }

    #[test]
    fn test_render_unavailable_view_shows_reason() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('4')));
        let text = screen(&app);
        assert!(text.contains("time_submit"));
    }

    #[test]
    fn test_render_empty_ready_view_shows_placeholder() {
        let mut views = make_views();
        views.daily = Panel::Ready(vec![]);
        let mut app = App::new(Theme::light(), views);
        app.handle_key(key(KeyCode::Char('4')));
        assert!(screen(&app).contains("No data to display"));
    }

    #[test]
    fn test_render_daily_view_with_data() {
        let mut views = make_views();
        views.daily = Panel::Ready(vec![DailyCount {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            job_count: 4,
        }]);
        let mut app = App::new(Theme::dark(), views);
        app.handle_key(key(KeyCode::Char('4')));
        assert!(screen(&app).contains("Jobs submitted per day"));
    }
}
