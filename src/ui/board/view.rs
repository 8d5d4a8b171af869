use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::Task;

use super::app::{AppState, DeleteConfirmState, Mode, StatusKind};
use super::editor::LineEditor;

const HELP_KEY_WIDTH: usize = 14;
const CHECK_OPEN: &str = "○";
const CHECK_DONE: &str = "✓";
const DELETE_GLYPH: &str = "✗";
const EMPTY_GLYPH: &str = "▤";
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_BG_SELECTED: Color = Color::Rgb(39, 42, 46);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_SKY: Color = Color::Rgb(14, 165, 233);
const COLOR_PURPLE: Color = Color::Rgb(147, 51, 234);

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_header(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_counters(frame, app, chunks[2]);
    render_list(frame, app, chunks[3]);
    render_footer(frame, app, chunks[4]);

    if app.show_help {
        render_help_modal(frame, area);
    }
    if let Mode::ConfirmDelete(state) = &app.mode {
        render_delete_confirm_modal(frame, area, state);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let title: Vec<char> = app.config.title.chars().collect();
    let split = title.len().div_ceil(2);
    let first: String = title[..split].iter().collect();
    let second: String = title[split..].iter().collect();
    let bold = Modifier::BOLD;
    let line = Line::from(vec![
        Span::styled(first, Style::default().fg(COLOR_SKY).add_modifier(bold)),
        Span::styled(second, Style::default().fg(COLOR_PURPLE).add_modifier(bold)),
    ]);
    let widget = Paragraph::new(vec![Line::from(""), line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(COLOR_BG_MUTED)),
        );
    frame.render_widget(widget, area);
}

fn render_input(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)].as_ref())
        .split(area);
    let focused = matches!(app.mode, Mode::Input);
    let border = if focused { COLOR_ACCENT } else { COLOR_BG_MUTED };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(chunks[0]);
    let width = inner.width as usize;

    let line = if app.input.is_empty() {
        Line::from(Span::styled(
            truncate_text(&app.config.placeholder, width),
            Style::default().fg(COLOR_MUTED_DARK),
        ))
    } else {
        let (visible, _) = visible_window(&app.input, width);
        Line::from(Span::styled(visible, Style::default().fg(COLOR_TEXT)))
    };
    frame.render_widget(Paragraph::new(line).block(block), chunks[0]);

    if focused && inner.width > 0 {
        let (_, cursor_x) = visible_window(&app.input, width);
        frame.set_cursor(inner.x + cursor_x, inner.y);
    }

    let button_style = if focused {
        Style::default()
            .fg(COLOR_TEXT)
            .bg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(Span::styled(" Create + ", button_style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    frame.render_widget(button, chunks[1]);
}

fn render_counters(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);
    let created = counter_line(&app.config.created_label, app.store.len(), COLOR_SKY);
    let completed = counter_line(
        &app.config.completed_label,
        app.store.completed_count(),
        COLOR_PURPLE,
    );
    frame.render_widget(Paragraph::new(created), chunks[0]);
    frame.render_widget(
        Paragraph::new(completed).alignment(Alignment::Right),
        chunks[1],
    );
}

fn counter_line(label: &str, count: usize, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {count} "),
            Style::default().fg(COLOR_TEXT).bg(COLOR_BG_MUTED),
        ),
    ])
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(COLOR_BG_MUTED));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.store.is_empty() {
        render_empty_state(frame, app, inner);
        return;
    }

    let width = inner.width as usize;
    let height = inner.height as usize;
    let order = app.display_order();
    let highlighted = app.highlighted_row();
    let (start, end) = list_window(order.len(), highlighted, height);
    let editing = match &app.mode {
        Mode::Edit(state) => Some(state),
        _ => None,
    };
    let dragging = matches!(app.mode, Mode::Move(_));

    let mut lines = Vec::with_capacity(end - start);
    for (row, task_idx) in order.iter().enumerate().take(end).skip(start) {
        let Some(task) = app.store.tasks().get(*task_idx) else {
            continue;
        };
        let selected = highlighted == Some(row);
        let edit_line = editing
            .filter(|state| state.task_id == task.id)
            .map(|state| &state.line);
        if let Some(line) = edit_line {
            let (_, cursor_x) = visible_window(line, content_width(width));
            let y = inner.y + (row - start) as u16;
            frame.set_cursor(inner.x + 4 + cursor_x, y);
        }
        lines.push(render_task_row(task, selected, dragging && selected, edit_line, width));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_empty_state(frame: &mut Frame, app: &AppState, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(EMPTY_GLYPH, Style::default().fg(COLOR_MUTED))),
        Line::from(""),
        Line::from(Span::styled(
            app.config.empty_title.clone(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.config.empty_hint.clone(),
            Style::default().fg(COLOR_MUTED),
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn content_width(width: usize) -> usize {
    // marker, space, check, space ... space, delete glyph
    width.saturating_sub(6)
}

fn render_task_row(
    task: &Task,
    selected: bool,
    grabbed: bool,
    edit_line: Option<&LineEditor>,
    width: usize,
) -> Line<'static> {
    let row_style = if grabbed {
        Style::default().bg(COLOR_BG_MUTED)
    } else if selected {
        Style::default().bg(COLOR_BG_SELECTED)
    } else {
        Style::default()
    };
    let marker = match (grabbed, selected) {
        (true, _) => "↕",
        (false, true) => "›",
        (false, false) => " ",
    };
    let check = if task.is_complete {
        Span::styled(CHECK_DONE, row_style.fg(COLOR_SUCCESS))
    } else {
        Span::styled(CHECK_OPEN, row_style.fg(COLOR_MUTED))
    };

    let text_width = content_width(width);
    let content = match edit_line {
        Some(line) => {
            let (visible, _) = visible_window(line, text_width);
            Span::styled(
                pad_text(&visible, text_width),
                row_style
                    .fg(COLOR_TEXT)
                    .add_modifier(Modifier::UNDERLINED),
            )
        }
        None if task.content.is_empty() => Span::styled(
            pad_text("(empty)", text_width),
            row_style
                .fg(COLOR_MUTED_DARK)
                .add_modifier(Modifier::ITALIC),
        ),
        None if task.is_complete => Span::styled(
            pad_text(&task.content, text_width),
            row_style
                .fg(COLOR_MUTED)
                .add_modifier(Modifier::CROSSED_OUT),
        ),
        None => Span::styled(pad_text(&task.content, text_width), row_style.fg(COLOR_TEXT)),
    };

    Line::from(vec![
        Span::styled(marker, row_style.fg(COLOR_ACCENT)),
        Span::styled(" ", row_style),
        check,
        Span::styled(" ", row_style),
        content,
        Span::styled(" ", row_style),
        Span::styled(DELETE_GLYPH, row_style.fg(COLOR_ERROR)),
    ])
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = Line::from(Span::styled(
        app.footer_hint(),
        Style::default().fg(COLOR_INFO),
    ));
    let mut lines = vec![hint];
    if let Some((status, kind)) = app.status_line() {
        let style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        lines.push(Line::from(Span::styled(status, style)));
    }
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_help_modal(frame: &mut Frame, area: Rect) {
    let content_width = 44u16.min(area.width.saturating_sub(4));
    let lines = build_help_lines(content_width.saturating_sub(2) as usize);
    let modal = centered_rect(content_width, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, modal);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_ACCENT))
            .title("Help"),
    );
    frame.render_widget(widget, modal);
}

fn build_help_lines(width: usize) -> Vec<Line<'static>> {
    vec![
        help_header("Keys"),
        help_line("j/k or up/down", "move selection", width),
        help_line("space/x", "toggle complete", width),
        help_line("enter/e", "edit inline", width),
        help_line("E", "edit in $EDITOR", width),
        help_line("d/delete", "delete task", width),
        help_line("m", "pick up task to move", width),
        help_line("J/K", "move task down/up", width),
        help_line("a/i/tab", "new task", width),
        help_line("ctrl+d/u", "page down/up", width),
        help_line("q/esc", "quit", width),
        help_line("?", "hide help", width),
    ]
}

fn help_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(COLOR_INFO).add_modifier(Modifier::BOLD),
    ))
}

fn help_line(keys: &str, desc: &str, width: usize) -> Line<'static> {
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    let desc_text = truncate_text(desc, desc_width);
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(desc_text, Style::default().fg(COLOR_MUTED)),
    ])
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, state: &DeleteConfirmState) {
    let content_width = area.width.saturating_sub(8).min(56);
    let modal = centered_rect(content_width, 7, area);
    frame.render_widget(Clear, modal);

    let text_width = (content_width as usize).saturating_sub(4);
    let content = if state.content.trim().is_empty() {
        "(empty)".to_string()
    } else {
        truncate_text(&state.content, text_width)
    };
    let lines = vec![
        Line::from(Span::styled(
            "Delete task?",
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(content, Style::default().fg(COLOR_TEXT))),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  esc/n cancel",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"))
        .alignment(Alignment::Center);
    frame.render_widget(widget, modal);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// Slice of a line buffer that keeps the cursor on screen, plus the
/// cursor's column within that slice.
fn visible_window(line: &LineEditor, width: usize) -> (String, u16) {
    if width == 0 {
        return (String::new(), 0);
    }
    let cursor = line.cursor();
    let skip = (cursor + 1).saturating_sub(width);
    let visible: String = line.value().chars().skip(skip).take(width).collect();
    (visible, (cursor - skip) as u16)
}

fn pad_text(value: &str, width: usize) -> String {
    let text = truncate_text(value, width);
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}
