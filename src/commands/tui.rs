use std::io;
use std::path::Path;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};

use crate::command::{Command, Outcome};
use crate::error::Result;
use crate::model::{Filter, Task, Theme};
use crate::output::Format;
use crate::store::files::FileSlots;
use crate::store::repo::TaskRepository;
use crate::store::slots::Slots;
use crate::store::tasks::ThemeStore;
use crate::task_id::TaskId;

const EDIT_CURSOR: char = '▏';

/// Per-row interaction state. Only one row can be in an input state at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    Adding { buffer: String },
    Editing { id: TaskId, buffer: String },
    AddingSubtask { id: TaskId, buffer: String },
    ConfirmClear,
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    ToggleTheme,
    Dispatch(Command),
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
    error: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::DarkGray,
                error: Color::Red,
            },
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::Gray,
                error: Color::LightRed,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

struct TareasTuiApp<S> {
    repo: TaskRepository<S>,
    themes: ThemeStore<S>,
    theme: Theme,
    mode: Mode,
    selected: usize,
    subtask_cursor: usize,
    help_visible: bool,
    last_error: Option<String>,
}

impl<S: Slots + Clone> TareasTuiApp<S> {
    fn open(slots: S) -> Result<Self> {
        let themes = ThemeStore::new(slots.clone());
        let theme = themes.load()?;
        Ok(Self {
            repo: TaskRepository::open(slots)?,
            themes,
            theme,
            mode: Mode::Browse,
            selected: 0,
            subtask_cursor: 0,
            help_visible: false,
            last_error: None,
        })
    }

    fn selected_task(&self) -> Option<&Task> {
        self.repo.visible().get(self.selected).copied()
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id.clone())
    }

    /// Apply one key press. Returns true when the app should exit.
    fn step(&mut self, key: KeyEvent) -> bool {
        match self.handle_key(key) {
            Action::None => false,
            Action::Quit => true,
            Action::ToggleTheme => {
                self.toggle_theme();
                false
            }
            Action::Dispatch(command) => {
                self.dispatch(command);
                false
            }
        }
    }

    fn dispatch(&mut self, command: Command) {
        match self.repo.apply(command) {
            Ok(Outcome::Added(task)) => {
                if let Some(position) = self.repo.visible().iter().position(|t| t.id == task.id) {
                    self.selected = position;
                }
                self.last_error = None;
            }
            Ok(_) => self.last_error = None,
            Err(err) => {
                tracing::warn!(error = %err, "command failed");
                self.last_error = Some(err.to_string());
            }
        }
        self.normalize_selection();
    }

    fn toggle_theme(&mut self) {
        match self.themes.toggle() {
            Ok(theme) => self.theme = theme,
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.handle_browse_key(key),
            Mode::ConfirmClear => match key.code {
                KeyCode::Char('y' | 'Y' | 's' | 'S') => Action::Dispatch(Command::Clear),
                _ => Action::None,
            },
            Mode::Adding { mut buffer } => match key.code {
                KeyCode::Enter => Action::Dispatch(Command::Add(buffer)),
                KeyCode::Esc => Action::None,
                _ => {
                    edit_buffer(&mut buffer, key);
                    self.mode = Mode::Adding { buffer };
                    Action::None
                }
            },
            Mode::AddingSubtask { id, mut buffer } => match key.code {
                KeyCode::Enter => Action::Dispatch(Command::AddSubtask(id, buffer)),
                KeyCode::Esc => Action::None,
                _ => {
                    edit_buffer(&mut buffer, key);
                    self.mode = Mode::AddingSubtask { id, buffer };
                    Action::None
                }
            },
            // Enter confirms; Tab/Up/Down move focus away, which also commits.
            Mode::Editing { id, mut buffer } => match key.code {
                KeyCode::Enter | KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                    Action::Dispatch(Command::Rename(id, buffer))
                }
                KeyCode::Esc => Action::None,
                _ => {
                    edit_buffer(&mut buffer, key);
                    self.mode = Mode::Editing { id, buffer };
                    Action::None
                }
            },
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Action {
        if self.help_visible {
            self.help_visible = false;
            return Action::None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('?') => {
                self.help_visible = true;
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                Action::None
            }
            KeyCode::Char('K') => {
                self.subtask_cursor = self.subtask_cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('J') => {
                let len = self.selected_task().map_or(0, |t| t.subtasks.len());
                self.subtask_cursor = (self.subtask_cursor + 1).min(len.saturating_sub(1));
                Action::None
            }
            KeyCode::Char(' ' | 'x') => self
                .selected_id()
                .map_or(Action::None, |id| Action::Dispatch(Command::Toggle(id))),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::Editing {
                        id: task.id.clone(),
                        buffer: task.text.clone(),
                    };
                }
                Action::None
            }
            KeyCode::Delete | KeyCode::Char('d') => self
                .selected_id()
                .map_or(Action::None, |id| Action::Dispatch(Command::Remove(id))),
            KeyCode::Char('a') => {
                self.mode = Mode::Adding {
                    buffer: String::new(),
                };
                Action::None
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_id() {
                    self.mode = Mode::AddingSubtask {
                        id,
                        buffer: String::new(),
                    };
                }
                Action::None
            }
            KeyCode::Char('X') => self.selected_subtask_command(Command::ToggleSubtask),
            KeyCode::Char('D') => self.selected_subtask_command(Command::RemoveSubtask),
            KeyCode::Char('f') => Action::Dispatch(Command::SetFilter(self.repo.filter().next())),
            KeyCode::Char('1') => Action::Dispatch(Command::SetFilter(Filter::All)),
            KeyCode::Char('2') => Action::Dispatch(Command::SetFilter(Filter::Pending)),
            KeyCode::Char('3') => Action::Dispatch(Command::SetFilter(Filter::Completed)),
            KeyCode::Char('C') => {
                self.mode = Mode::ConfirmClear;
                Action::None
            }
            KeyCode::Char('t') => Action::ToggleTheme,
            _ => Action::None,
        }
    }

    fn selected_subtask_command<F>(&self, build: F) -> Action
    where
        F: FnOnce(TaskId, crate::task_id::SubtaskId) -> Command,
    {
        let Some(task) = self.selected_task() else {
            return Action::None;
        };
        match task.subtasks.get(self.subtask_cursor) {
            Some(subtask) => Action::Dispatch(build(task.id.clone(), subtask.id.clone())),
            None => Action::None,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.repo.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = self
                .selected
                .saturating_add(delta as usize)
                .min(len.saturating_sub(1));
        }
        self.subtask_cursor = 0;
    }

    fn normalize_selection(&mut self) {
        let len = self.repo.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        let subtasks = self.selected_task().map_or(0, |t| t.subtasks.len());
        if self.subtask_cursor >= subtasks {
            self.subtask_cursor = subtasks.saturating_sub(1);
        }
    }

    fn task_row(&self, task: &Task, is_selected: bool) -> String {
        let text = match &self.mode {
            Mode::Editing { id, buffer } if is_selected && id == &task.id => {
                format!("✎ {buffer}{EDIT_CURSOR}")
            }
            _ => truncate_display(&task.text, 80),
        };
        let progress = if task.subtasks.is_empty() {
            String::new()
        } else {
            let done = task.subtasks.iter().filter(|s| s.done).count();
            format!("  ({done}/{})", task.subtasks.len())
        };
        format!("{} {}{}", if task.done { "[x]" } else { "[ ]" }, text, progress)
    }

    fn task_detail(&self, task: &Task) -> Vec<Line<'static>> {
        let palette = Palette::for_theme(self.theme);
        let mut lines = vec![
            Line::from(format!("id: {}", task.id)),
            Line::from(format!(
                "created: {}",
                task.created_at.format("%Y-%m-%d %H:%M")
            )),
            Line::from(format!(
                "status: {}",
                if task.done { "completed" } else { "pending" }
            )),
            Line::from(""),
            Line::from(format!("subtasks ({}):", task.subtasks.len())),
        ];

        if task.subtasks.is_empty() {
            lines.push(Line::styled("  <none>", Style::default().fg(palette.muted)));
        }
        for (idx, subtask) in task.subtasks.iter().enumerate() {
            let marker = if idx == self.subtask_cursor { "❯" } else { " " };
            let row = format!(
                "{marker} {} {}",
                if subtask.done { "[x]" } else { "[ ]" },
                subtask.text
            );
            if subtask.done {
                lines.push(Line::styled(row, Style::default().fg(palette.muted)));
            } else {
                lines.push(Line::from(row));
            }
        }
        lines
    }

    fn input_line(&self) -> (String, String) {
        match &self.mode {
            Mode::Adding { buffer } => ("New task".into(), format!("{buffer}{EDIT_CURSOR}")),
            Mode::AddingSubtask { buffer, .. } => {
                ("New subtask".into(), format!("{buffer}{EDIT_CURSOR}"))
            }
            Mode::Editing { .. } => (
                "Editing".into(),
                "Enter/Tab save | Esc cancel".into(),
            ),
            Mode::ConfirmClear => ("Confirm".into(), "y delete everything | any key cancel".into()),
            Mode::Browse => (
                "Controls".into(),
                "a add | space toggle | e edit | d delete | f filter | s subtask | C clear | t theme | ? help | q quit"
                    .into(),
            ),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let palette = Palette::for_theme(self.theme);
        frame.render_widget(Block::default().style(palette.base()), frame.area());

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let filter_titles = Filter::ALL
            .iter()
            .map(|filter| Line::from(filter.to_string()))
            .collect::<Vec<_>>();
        let active = Filter::ALL
            .iter()
            .position(|f| *f == self.repo.filter())
            .unwrap_or(0);

        frame.render_widget(
            Tabs::new(filter_titles)
                .select(active)
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL).title("tareas"))
                .highlight_style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
            outer[0],
        );

        let center = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(outer[1]);

        self.render_list(frame, center[0], palette);

        let (detail_title, detail) = match self.selected_task() {
            Some(task) => ("Task".to_string(), self.task_detail(task)),
            None => ("Task".to_string(), vec![Line::from("No task selected.")]),
        };
        frame.render_widget(
            Paragraph::new(detail)
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL).title(detail_title))
                .wrap(Wrap { trim: false }),
            center[1],
        );

        let (input_title, input) = self.input_line();
        frame.render_widget(
            Paragraph::new(input)
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL).title(input_title))
                .wrap(Wrap { trim: true }),
            outer[2],
        );

        let mut status = vec![Span::raw(format!(
            "{}  filter={}  theme={}",
            self.repo.status(),
            self.repo.filter(),
            self.theme
        ))];
        if let Some(error) = &self.last_error {
            status.push(Span::styled(
                format!("  error: {error}"),
                Style::default().fg(palette.error),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(status))
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL).title("Status")),
            outer[3],
        );

        if self.mode == Mode::ConfirmClear {
            let popup = centered_rect(50, 20, frame.area());
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new("¿Borrar todas las tareas?\n\ny = yes, any other key = no")
                    .style(palette.base())
                    .block(Block::default().borders(Borders::ALL).title("Clear all")),
                popup,
            );
        }

        if self.help_visible {
            let popup = centered_rect(70, 70, frame.area());
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(
                    "tareas controls\n\n\
                     Tasks:\n\
                     - a: add a task (Enter saves, Esc cancels)\n\
                     - space / x: toggle completed\n\
                     - Enter / e: edit text (Enter, Tab or arrows save, Esc cancels)\n\
                     - d / Delete: delete task\n\
                     - C: delete all tasks (asks first)\n\n\
                     Subtasks:\n\
                     - s: add subtask to selected task\n\
                     - J / K: move subtask cursor\n\
                     - X: toggle subtask, D: delete subtask\n\n\
                     View:\n\
                     - Up/Down, j/k: move selection\n\
                     - f: cycle filter, 1/2/3: all/pending/completed\n\
                     - t: toggle light/dark theme\n\
                     - q: quit, ?: toggle this help",
                )
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .wrap(Wrap { trim: true }),
                popup,
            );
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, palette: Palette) {
        let visible = self.repo.visible();
        let title = format!("Tasks ({}/{})", visible.len(), self.repo.tasks().len());

        if visible.is_empty() {
            frame.render_widget(
                Paragraph::new("(no tasks)")
                    .style(palette.base().fg(palette.muted))
                    .block(Block::default().borders(Borders::ALL).title(title)),
                area,
            );
            return;
        }

        let mut state = ListState::default();
        state.select(Some(self.selected));

        let items = visible
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                let row = self.task_row(task, idx == self.selected);
                let style = if task.done {
                    Style::default()
                        .fg(palette.muted)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(row).style(style)
            })
            .collect::<Vec<_>>();

        frame.render_stateful_widget(
            List::new(items)
                .style(palette.base())
                .block(Block::default().borders(Borders::ALL).title(title))
                .highlight_style(
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("❯ "),
            area,
            &mut state,
        );
    }
}

pub fn run(data_dir: &Path, _format: Format) -> Result<()> {
    let app = TareasTuiApp::open(FileSlots::open(data_dir))?;
    run_tui(app)
}

fn run_tui<S: Slots + Clone>(mut app: TareasTuiApp<S>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

fn run_loop<B: Backend, S: Slots + Clone>(
    terminal: &mut Terminal<B>,
    app: &mut TareasTuiApp<S>,
) -> Result<()> {
    loop {
        app.normalize_selection();
        terminal
            .draw(|frame| app.render(frame))
            .map_err(|err| std::io::Error::other(err.to_string()))?;

        if let Event::Key(key) = event::read()?
            && app.step(key)
        {
            break;
        }
    }
    Ok(())
}

fn edit_buffer(buffer: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(ch)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            buffer.push(ch);
        }
        _ => {}
    }
}

fn truncate_display(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let mut output = String::new();

    for _ in 0..max_chars {
        if let Some(ch) = chars.next() {
            output.push(ch);
        } else {
            return output;
        }
    }

    if chars.next().is_some() {
        output.push('…');
    }

    output
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
