use crate::tui::app::{App, AppState, Notice};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    match &app.state {
        AppState::Setup => draw_setup(f, app),
        AppState::Processing { video_id } => draw_processing(f, video_id),
        AppState::Chat => draw_chat(f, app),
    }
}

fn title_widget(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn help_widget(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn notice_widget(notice: &Notice) -> Paragraph<'_> {
    let (text, color) = match notice {
        Notice::Info(text) => (text.as_str(), Color::Green),
        Notice::Error(text) => (text.as_str(), Color::Red),
    };
    Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
}

fn draw_setup(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // URL input
            Constraint::Length(1), // Notice
            Constraint::Min(1),    // Filler
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    f.render_widget(title_widget("tubechat — chat with a YouTube video"), chunks[0]);

    app.url_input.render(f, chunks[1]);

    if let Some(notice) = &app.notice {
        f.render_widget(notice_widget(notice), chunks[2]);
    }

    f.render_widget(
        help_widget("[Enter] Process video  [Esc] Quit"),
        chunks[4],
    );
}

fn draw_processing(f: &mut Frame, video_id: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Status
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    f.render_widget(title_widget("Processing..."), chunks[0]);

    let status = Paragraph::new(format!("Fetching transcript for {video_id}..."))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    f.render_widget(help_widget("[Ctrl+C] Quit"), chunks[2]);
}

fn draw_chat(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Exchange log
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Question input
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let header = match &app.session {
        Some(session) => format!("Video {}  ·  {}", session.video_id, app.model()),
        None => "No video".to_string(),
    };
    f.render_widget(title_widget(&header), chunks[0]);

    let pending = app.pending_question.clone();
    if let Some(session) = &app.session {
        app.chat_view
            .render(f, chunks[1], &session.exchanges, pending.as_deref());
    }

    if let Some(notice) = &app.notice {
        f.render_widget(notice_widget(notice), chunks[2]);
    }

    app.question_input.render(f, chunks[3]);

    f.render_widget(
        help_widget("[Enter] Send  [↑↓ PgUp PgDn] Scroll  [End] Follow  [Esc] New video  [Ctrl+C] Quit"),
        chunks[4],
    );
}
