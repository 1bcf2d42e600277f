use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::db::Database;
use crate::models::{parse_string_list, parse_string_map, Job, StoredJson};

struct AppState {
    jobs: Vec<Job>,
    selected: usize,
    scroll_offset: u16,
}

impl AppState {
    fn new(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            selected: 0,
            scroll_offset: 0,
        }
    }

    fn current_job(&self) -> Option<&Job> {
        self.jobs.get(self.selected)
    }

    fn next(&mut self) {
        if !self.jobs.is_empty() && self.selected < self.jobs.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn set_status(&mut self, db: &Database, status: &str) {
        let Some(job) = self.current_job() else { return };
        let job_id = job.id;
        let today = chrono::Local::now().date_naive();
        // Only reflect the change once the write actually landed.
        if db.update_job_status(job_id, status, today).is_ok() {
            if let Some(j) = self.jobs.get_mut(self.selected) {
                j.status = Some(status.to_string());
            }
        }
    }
}

pub fn run_browse(db: &Database, status: Option<&str>) -> Result<()> {
    let jobs = db.list_jobs(status)?;
    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    let mut state = AppState::new(jobs);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, db);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    db: &Database,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let prev_selected = state.selected;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('n') => state.set_status(db, "New"),
                KeyCode::Char('i') => state.set_status(db, "Interested"),
                // Moving to Applied also files an application row.
                KeyCode::Char('a') => state.set_status(db, "Applied"),
                KeyCode::Char('x') => state.set_status(db, "Archived"),
                _ => {}
            }
            if state.selected != prev_selected {
                list_state.select(Some(state.selected));
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(frame.area());

    // Left panel: job list
    let items: Vec<ListItem> = state
        .jobs
        .iter()
        .map(|job| {
            let status_icon = match job.status.as_deref().unwrap_or("New") {
                "New" => " ",
                "Interested" => "*",
                "Applied" => "+",
                "Archived" => "-",
                _ => "?",
            };
            let score = job
                .match_score
                .map(|s| format!("{:>3}", s))
                .unwrap_or_else(|| "  -".to_string());
            let title = if job.title.chars().count() > 30 {
                let head: String = job.title.chars().take(27).collect();
                format!("{}...", head)
            } else {
                job.title.clone()
            };
            ListItem::new(format!(
                "{} #{:<4} [{}] {} | {}",
                status_icon, job.id, score, title, job.company
            ))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Jobs ({}) ", state.jobs.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = build_detail(state);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer help
    let help_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let help = Paragraph::new(
        " j/k:navigate  J/K:scroll  n:new i:interested a:applied x:archive  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area[1]);
}

fn push_skills(lines: &mut Vec<Line>, label: &str, stored: Option<&str>) {
    match parse_string_list(stored) {
        StoredJson::Parsed(skills) if !skills.is_empty() => {
            lines.push(Line::from(Span::styled(
                label.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for line in textwrap::fill(&skills.join(", "), 70).lines() {
                lines.push(Line::from(format!("  {}", line)));
            }
            lines.push(Line::from(""));
        }
        StoredJson::Raw(raw) => {
            lines.push(Line::from(Span::styled(
                label.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("  {}", raw)));
            lines.push(Line::from(""));
        }
        _ => {}
    }
}

fn build_detail(state: &AppState) -> Text<'_> {
    let Some(job) = state.current_job() else {
        return Text::raw("No job selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(
        job.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company)));
    if let Some(location) = &job.location {
        lines.push(Line::from(location.clone()));
    }

    let status = job.status.as_deref().unwrap_or("New");
    let status_style = match status {
        "New" => Style::default().fg(Color::Green),
        "Interested" => Style::default().fg(Color::Yellow),
        "Applied" => Style::default().fg(Color::Cyan),
        "Archived" => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    };
    lines.push(Line::from(Span::styled(
        format!("Status: {}", status),
        status_style,
    )));
    lines.push(Line::from(format!("URL: {}", job.url)));

    if let Some(salary) = &job.salary_range {
        lines.push(Line::from(format!("Salary: {}", salary)));
    }

    lines.push(Line::from(""));

    // Fit analysis
    if let Some(score) = job.match_score {
        lines.push(Line::from(Span::styled(
            format!("Match score: {}", score),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if let Some(summary) = &job.match_summary {
            for line in textwrap::fill(summary, 70).lines() {
                lines.push(Line::from(format!("  {}", line)));
            }
        }
        lines.push(Line::from(""));

        push_skills(&mut lines, "Matching skills", job.matching_skills.as_deref());
        push_skills(&mut lines, "Missing skills", job.missing_skills.as_deref());

        if let StoredJson::Parsed(info) = parse_string_map(job.company_info.as_deref()) {
            if !info.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Company",
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for (key, value) in &info {
                    lines.push(Line::from(format!("  {}: {}", key, value)));
                }
                lines.push(Line::from(""));
            }
        }
    } else {
        lines.push(Line::from(Span::styled(
            "(Not scored — run: jobtrack analyze)",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    if let Some(suggestions) = &job.tailored_suggestions {
        lines.push(Line::from(Span::styled(
            "Resume suggestions",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(suggestions, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
        lines.push(Line::from(""));
    }

    if let Some(text) = &job.raw_description {
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in text.lines() {
            lines.push(Line::from(line.to_string()));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "(No description fetched)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db_with_job() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        let id = db
            .insert_job("Engineer", "Acme", None, "https://acme.example/jobs/1", None)
            .unwrap();
        (db, id)
    }

    #[test]
    fn test_set_status_updates_list_on_success() {
        let (db, _) = test_db_with_job();
        let mut state = AppState::new(db.list_jobs(None).unwrap());

        state.set_status(&db, "Interested");

        assert_eq!(state.jobs[0].status.as_deref(), Some("Interested"));
        let stored = db.get_job(state.jobs[0].id).unwrap().unwrap();
        assert_eq!(stored.status.as_deref(), Some("Interested"));
    }

    #[test]
    fn test_set_status_keeps_list_unchanged_on_failed_write() {
        let (db, id) = test_db_with_job();
        let mut state = AppState::new(db.list_jobs(None).unwrap());
        // Make the write fail: the row the view still shows is gone.
        db.delete_job(id).unwrap();

        state.set_status(&db, "Applied");

        assert_eq!(state.jobs[0].status.as_deref(), Some("New"));
        assert!(db.list_applications().unwrap().is_empty());
    }
}
