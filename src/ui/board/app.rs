use std::fs;
use std::io;
use std::io::Write;
use std::process::Command;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tempfile::NamedTempFile;

use crate::config::UiConfig;
use crate::drag::DragSession;
use crate::error::Result;
use crate::store::{Change, TaskStore};
use crate::task::{Task, TaskId};

use super::editor::{LineAction, LineEditor};
use super::view;

const EVENT_POLL_MS: u64 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

pub(crate) struct EditState {
    pub(crate) task_id: TaskId,
    pub(crate) line: LineEditor,
}

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: TaskId,
    pub(crate) content: String,
}

/// What the keyboard is currently driving.
pub(crate) enum Mode {
    Input,
    List,
    Edit(EditState),
    Move(DragSession),
    ConfirmDelete(DeleteConfirmState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyOutcome {
    Continue,
    Quit,
    /// Open the task's content in an external editor, then resume.
    ExternalEdit(TaskId),
}

#[derive(Default, Clone, Copy)]
struct Viewport {
    width: u16,
    height: u16,
}

pub struct AppState {
    pub(crate) store: TaskStore,
    pub(crate) config: UiConfig,
    pub(crate) mode: Mode,
    pub(crate) selected: Option<usize>,
    pub(crate) input: LineEditor,
    pub(crate) show_help: bool,
    status_message: Option<String>,
    info_message: Option<String>,
    viewport: Viewport,
}

impl AppState {
    pub(crate) fn new(store: TaskStore, config: UiConfig) -> Self {
        let selected = if store.is_empty() { None } else { Some(0) };
        let input = LineEditor::with_value(store.input());
        Self {
            store,
            config,
            mode: Mode::Input,
            selected,
            input,
            show_help: false,
            status_message: None,
            info_message: None,
            viewport: Viewport::default(),
        }
    }

    pub(crate) fn update_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Viewport { width, height };
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|idx| self.store.tasks().get(idx))
    }

    /// Row order to draw. While a drag is in progress the grabbed task is
    /// shown at its hover target.
    pub(crate) fn display_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.store.len()).collect();
        if let Mode::Move(session) = &self.mode {
            if session.source() < order.len() {
                let grabbed = order.remove(session.source());
                order.insert(session.target().min(order.len()), grabbed);
            }
        }
        order
    }

    /// Display row that carries the highlight.
    pub(crate) fn highlighted_row(&self) -> Option<usize> {
        match &self.mode {
            Mode::Move(session) => Some(session.target()),
            _ => self.selected,
        }
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        self.info_message
            .as_ref()
            .map(|info| (info.clone(), StatusKind::Info))
    }

    pub(crate) fn footer_hint(&self) -> String {
        match &self.mode {
            Mode::Input => "type a task  enter create  tab list  esc list".to_string(),
            Mode::Edit(_) => "enter save  esc cancel  ctrl+u clear".to_string(),
            Mode::Move(_) => "j/k move  enter drop  esc cancel".to_string(),
            Mode::ConfirmDelete(_) => "y confirm delete  esc cancel".to_string(),
            Mode::List => {
                "j/k move  space toggle  e edit  d delete  m move  a add  ? help  q quit"
                    .to_string()
            }
        }
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    /// Keep the selection on the affected task and report the change.
    fn apply_change(&mut self, change: Option<Change>) {
        let Some(change) = change else {
            return;
        };
        let len = self.store.len();
        let (selected, message) = match change {
            Change::Added { index, .. } => (Some(index), "task added".to_string()),
            Change::Toggled { id, is_complete } => {
                let message = if is_complete {
                    "marked complete"
                } else {
                    "marked open"
                };
                (self.store.position(&id), message.to_string())
            }
            Change::Edited { id } => (self.store.position(&id), "task updated".to_string()),
            Change::Deleted { index, .. } => {
                let selected = if len == 0 {
                    None
                } else {
                    Some(index.min(len - 1))
                };
                (selected, "task deleted".to_string())
            }
            Change::Moved { to, .. } => (Some(to), format!("moved to position {}", to + 1)),
        };
        self.selected = selected;
        self.set_info(message);
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.store.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.selected = Some(next as usize);
    }

    fn select_edge(&mut self, last: bool) {
        let len = self.store.len();
        self.selected = match (len, last) {
            (0, _) => None,
            (_, false) => Some(0),
            (_, true) => Some(len - 1),
        };
    }

    fn list_jump(&self) -> isize {
        let height = self.viewport.height.saturating_sub(12);
        (height / 2).max(1) as isize
    }

    fn delete_selected(&mut self) {
        let Some((task_id, content)) = self
            .selected_task()
            .map(|task| (task.id, task.content.clone()))
        else {
            return;
        };
        if self.config.confirm_delete {
            self.mode = Mode::ConfirmDelete(DeleteConfirmState { task_id, content });
            return;
        }
        let change = self.store.delete(&task_id);
        self.apply_change(change);
    }

    fn shift_selected(&mut self, delta: isize) {
        let Some(from) = self.selected else {
            return;
        };
        let to = from as isize + delta;
        if to < 0 {
            return;
        }
        let change = self.store.reorder(from, to as usize);
        self.apply_change(change);
    }

    /// Store the result of an external edit. Editors append a final newline,
    /// which is dropped; the rest is stored verbatim.
    pub(crate) fn finish_external_edit(
        &mut self,
        id: TaskId,
        result: std::result::Result<String, String>,
    ) {
        match result {
            Ok(text) => {
                let content = text.trim_end_matches(['\n', '\r']);
                let change = self.store.update_content(&id, content);
                if change.is_none() {
                    self.set_info("no changes".to_string());
                }
                self.apply_change(change);
            }
            Err(err) => self.set_error(err),
        }
    }
}

pub fn run(store: TaskStore, config: UiConfig) -> Result<()> {
    let mut app = AppState::new(store, config);
    run_terminal(&mut app)
}

fn run_terminal(app: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update_viewport(size.width, size.height);

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| {
                app.update_viewport(frame.size().width, frame.size().height);
                view::render(frame, app);
            })?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                match handle_key(app, key) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Quit => break,
                    KeyOutcome::ExternalEdit(id) => {
                        let Some(content) = app.store.get(&id).map(|task| task.content.clone())
                        else {
                            continue;
                        };
                        let result = edit_content_external(terminal, &content);
                        app.finish_external_edit(id, result);
                    }
                }
                dirty = true;
            }
            Event::Resize(width, height) => {
                app.update_viewport(width, height);
                dirty = true;
            }
            _ => {}
        }
    }
    Ok(())
}

fn edit_content_external(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    content: &str,
) -> std::result::Result<String, String> {
    let mut temp = NamedTempFile::new()
        .map_err(|err| format!("failed to create temp file for editor: {err}"))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| format!("failed to write task to temp file: {err}"))?;
    temp.flush()
        .map_err(|err| format!("failed to flush temp file: {err}"))?;
    let path = temp.path().to_path_buf();

    suspend_terminal(terminal).map_err(|err| format!("failed to suspend terminal: {err}"))?;
    let editor_result = launch_editor(&path);
    if let Err(err) = resume_terminal(terminal) {
        return Err(format!("failed to restore terminal: {err}"));
    }

    let status = editor_result?;
    if !status.success() {
        let detail = status
            .code()
            .map(|code| format!("exit code {code}"))
            .unwrap_or_else(|| "signal".to_string());
        return Err(format!("editor exited with {detail}"));
    }

    fs::read_to_string(&path).map_err(|err| format!("failed to read editor buffer: {err}"))
}

fn suspend_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}

fn resume_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.clear()?;
    Ok(())
}

fn launch_editor(path: &std::path::Path) -> std::result::Result<std::process::ExitStatus, String> {
    let mut attempted: Vec<String> = Vec::new();
    for candidate in editor_candidates() {
        let parts: Vec<&str> = candidate.split_whitespace().collect();
        let Some((program, args)) = parts.split_first() else {
            continue;
        };
        attempted.push(program.to_string());
        match Command::new(program).args(args).arg(path).status() {
            Ok(status) => return Ok(status),
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(format!("failed to launch editor '{program}': {err}")),
        }
    }
    let tried = if attempted.is_empty() {
        "no editor candidates".to_string()
    } else {
        attempted.join(", ")
    };
    Err(format!(
        "no editor found (tried {tried}); set $VISUAL or $EDITOR"
    ))
}

fn editor_candidates() -> Vec<String> {
    let mut out: Vec<String> = ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .filter(|value| !value.trim().is_empty())
        .collect();
    out.push("vi".to_string());
    out
}

pub(crate) fn handle_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    match std::mem::replace(&mut app.mode, Mode::List) {
        Mode::Input => handle_input_key(app, key),
        Mode::List => return handle_list_key(app, key),
        Mode::Edit(state) => handle_edit_key(app, state, key),
        Mode::Move(session) => handle_move_key(app, session, key),
        Mode::ConfirmDelete(state) => handle_confirm_key(app, state, key),
    }
    KeyOutcome::Continue
}

fn handle_input_key(app: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Tab {
        return;
    }
    match app.input.handle_key(key) {
        LineAction::None => {
            app.store.set_input(app.input.value());
            app.mode = Mode::Input;
        }
        LineAction::Cancel => {}
        LineAction::Submit => {
            app.store.set_input(app.input.value());
            let change = app.store.submit_input();
            if change.is_some() {
                app.input.clear();
            }
            app.apply_change(change);
            app.mode = Mode::Input;
        }
    }
}

fn handle_list_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('d') if ctrl => app.move_selection(app.list_jump()),
        KeyCode::Char('u') if ctrl => app.move_selection(-app.list_jump()),
        _ if ctrl => {}
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Home | KeyCode::Char('g') => app.select_edge(false),
        KeyCode::End | KeyCode::Char('G') => app.select_edge(true),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.selected_task().map(|task| task.id) {
                let change = app.store.toggle_complete(&id);
                app.apply_change(change);
            }
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            if let Some((task_id, content)) = app
                .selected_task()
                .map(|task| (task.id, task.content.clone()))
            {
                app.mode = Mode::Edit(EditState {
                    task_id,
                    line: LineEditor::with_value(content),
                });
            }
        }
        KeyCode::Char('E') => {
            if let Some(task) = app.selected_task() {
                return KeyOutcome::ExternalEdit(task.id);
            }
        }
        KeyCode::Delete | KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('m') => {
            if let Some(session) = app
                .selected
                .and_then(|idx| DragSession::grab(idx, app.store.len()))
            {
                app.mode = Mode::Move(session);
            }
        }
        KeyCode::Char('J') => app.shift_selected(1),
        KeyCode::Char('K') => app.shift_selected(-1),
        KeyCode::Tab | KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('n') => {
            app.mode = Mode::Input;
        }
        KeyCode::Char('?') => app.show_help = !app.show_help,
        KeyCode::Esc | KeyCode::Char('q') => {
            if !app.show_help {
                return KeyOutcome::Quit;
            }
            app.show_help = false;
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_edit_key(app: &mut AppState, mut state: EditState, key: KeyEvent) {
    match state.line.handle_key(key) {
        LineAction::None => app.mode = Mode::Edit(state),
        LineAction::Cancel => app.set_info("edit cancelled".to_string()),
        LineAction::Submit => {
            let change = app.store.update_content(&state.task_id, state.line.value());
            app.apply_change(change);
        }
    }
}

fn handle_move_key(app: &mut AppState, mut session: DragSession, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            session.move_by(1);
            app.mode = Mode::Move(session);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            session.move_by(-1);
            app.mode = Mode::Move(session);
        }
        KeyCode::Home | KeyCode::Char('g') => {
            session.move_to(0);
            app.mode = Mode::Move(session);
        }
        KeyCode::End | KeyCode::Char('G') => {
            session.move_to(usize::MAX);
            app.mode = Mode::Move(session);
        }
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => {
            let change = app.store.apply_drop(&session.drop_here());
            app.apply_change(change);
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            app.store.apply_drop(&session.cancel());
            app.set_info("move cancelled".to_string());
        }
        _ => app.mode = Mode::Move(session),
    }
}

fn handle_confirm_key(app: &mut AppState, state: DeleteConfirmState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            let change = app.store.delete(&state.task_id);
            app.apply_change(change);
        }
        KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {
            app.set_info("cancelled".to_string());
        }
        _ => app.mode = Mode::ConfirmDelete(state),
    }
}
