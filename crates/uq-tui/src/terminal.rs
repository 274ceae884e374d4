//! Terminal setup, teardown, and main event loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::info;

use crate::app::{PlayApp, StoryBlock};

const FRAME: Duration = Duration::from_millis(30);

/// Launch the interactive front-end.
pub fn run(mut app: PlayApp) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    info!("interactive session started");
    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Draw, wait up to one frame for input, then feed elapsed time to the app.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut PlayApp,
) -> Result<(), String> {
    let mut last = Instant::now();
    loop {
        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(FRAME).map_err(|e| format!("event error: {e}"))?
            && let Event::Key(key) = event::read().map_err(|e| format!("event error: {e}"))?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        let now = Instant::now();
        app.tick(now - last);
        last = now;
    }
}

fn draw(frame: &mut Frame, app: &PlayApp) {
    let answer_height = if app.puzzle.is_some() { 5 } else { 0 };
    let choice_height = if app.is_revealing() {
        0
    } else {
        app.choices.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Min(3),                // Story
            Constraint::Length(choice_height), // Choices
            Constraint::Length(answer_height), // Answer
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    let header = Paragraph::new(app.header.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow).bold());
    frame.render_widget(header, chunks[0]);

    draw_story(frame, app, chunks[1]);

    if choice_height > 0 && !app.choices.is_empty() {
        draw_choices(frame, app, chunks[2]);
    }
    if answer_height > 0 {
        draw_answer(frame, app, chunks[3]);
    }

    let status = Paragraph::new(format!(" {}  |  {}", app.status_line(), app.key_hint()))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, chunks[4]);
}

/// Lines of a block, cut off after `budget` characters.
fn reveal(block: &StoryBlock, mut budget: usize) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    for line in &block.lines {
        let n = line.chars().count();
        if budget >= n {
            out.push(Line::from(line.clone()));
            budget -= n;
        } else {
            out.push(Line::from(line.chars().take(budget).collect::<String>()));
            break;
        }
    }
    out
}

fn draw_story(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let credits = app.blocks.last().is_some_and(|b| b.credits);
    let mut lines: Vec<Line> = Vec::new();
    let count = app.blocks.len();
    for (i, story) in app.blocks.iter().enumerate() {
        if i + 1 == count {
            lines.extend(reveal(story, app.visible_chars()));
        } else {
            lines.extend(story.lines.iter().map(|l| Line::from(l.clone())));
            lines.push(Line::from(""));
        }
    }

    let mut paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    if credits {
        paragraph = paragraph
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Cyan));
    }
    frame.render_widget(paragraph, area);
}

fn draw_choices(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let lines: Vec<Line> = app
        .choices
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let text = format!("{}) {label}", i + 1);
            if i == app.selected && app.puzzle.is_none() {
                Line::from(Span::styled(
                    format!("> {text}"),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {text}"))
            }
        })
        .collect();

    let list = Paragraph::new(lines).block(
        Block::default()
            .title(" Choices ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(list, area);
}

fn draw_answer(frame: &mut Frame, app: &PlayApp, area: Rect) {
    let Some(puzzle) = app.puzzle else {
        return;
    };
    let lines = vec![
        Line::from(puzzle.question),
        Line::from(Span::styled(
            format!("> {}", app.input),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            puzzle.hint,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];
    let input = Paragraph::new(lines).block(
        Block::default()
            .title(" Answer ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(input, area);

    let cursor_x = area.x + 3 + app.input.chars().count() as u16;
    if cursor_x < area.x + area.width.saturating_sub(1) {
        frame.set_cursor_position(Position::new(cursor_x, area.y + 2));
    }
}
