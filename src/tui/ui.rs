use super::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const FOOTER_HINTS: &str = "  Tab: focus | ?: help | q/Esc: quit";

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    if app.show_help() {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        draw_help(f, app, body[0]);
        draw_log(f, app, body[1]);
    } else {
        draw_log(f, app, chunks[1]);
    }

    draw_status_bar(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" focus: "),
        Span::styled(
            app.focus_name(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" keybinds "));
    f.render_widget(header, area);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .help_lines()
        .into_iter()
        .map(|line| {
            let style = if line.ends_with("(disabled)") {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::styled(line, style))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Bindings "));
    f.render_widget(list, area);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    // Newest entries at the bottom, clipped to what fits
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<&String> = app.log().collect();
    let start = lines.len().saturating_sub(visible);
    let items: Vec<ListItem> = lines[start..]
        .iter()
        .map(|line| {
            let style = if line.starts_with("error:") {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            ListItem::new(Line::styled(format!(" {line}"), style))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Log "));
    f.render_widget(list, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = format!(
        "{}  |  {} bindings",
        FOOTER_HINTS,
        app.registry().len()
    );
    let bar = Paragraph::new(status).style(Style::default().fg(Color::Black).bg(Color::Gray));
    f.render_widget(bar, area);
}
