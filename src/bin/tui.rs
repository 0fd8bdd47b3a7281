use anyhow::Result;
use chrono::Local;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use taskboard::{
    application::task_service::{TaskService, TaskServiceImpl},
    client::filter::ViewFilter,
    domain::{
        filter::TaskFilter,
        repository::TaskRepository,
        sanitize::unescape_html,
        task::{CreateTask, PatchTask, Task, TaskId},
    },
    infrastructure::sqlite_repo::SqliteTaskRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tasks.db".to_string());
    prepare_sqlite_file(&database_url)?;
    let repo = SqliteTaskRepository::connect(&database_url).await?;
    repo.init().await?;
    let service = TaskServiceImpl::new(repo);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, service).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create, Edit, Search }

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActiveField { Description, DueDate, Notes }

struct App<R: TaskRepository> {
    service: TaskServiceImpl<R>,
    items: Vec<Task>,
    selected: usize,
    mode: Mode,
    list_state: ListState,
    filter: ViewFilter,
    filtered_indices: Vec<usize>,
    field: ActiveField,
    draft_description: String,
    draft_due: String,
    draft_notes: String,
    // inline edit state: target plus the values the drafts started from,
    // so the patch carries only what actually changed
    editing: Option<TaskId>,
    orig_due: String,
    orig_notes: String,
    error: Option<String>,
}

impl<R: TaskRepository> App<R> {
    fn new(service: TaskServiceImpl<R>) -> Self {
        Self {
            service,
            items: vec![],
            selected: 0,
            mode: Mode::View,
            list_state: ListState::default(),
            filter: ViewFilter::default(),
            filtered_indices: Vec::new(),
            field: ActiveField::Description,
            draft_description: String::new(),
            draft_due: String::new(),
            draft_notes: String::new(),
            editing: None,
            orig_due: String::new(),
            orig_notes: String::new(),
            error: None,
        }
    }

    /// One full fetch at startup; afterwards the list is maintained
    /// locally from mutation responses.
    async fn load(&mut self) -> Result<()> {
        self.items = self.service.list(TaskFilter::default()).await?;
        self.recompute_filtered();
        Ok(())
    }

    fn recompute_filtered(&mut self) {
        let today = Local::now().date_naive();
        self.filtered_indices.clear();
        for (i, task) in self.items.iter().enumerate() {
            if self.filter.matches(task, today) { self.filtered_indices.push(i); }
        }
        // Clamp selection within filtered bounds
        let len = self.filtered_indices.len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }

    fn selected_task(&self) -> Option<&Task> {
        self.filtered_indices.get(self.selected).and_then(|&idx| self.items.get(idx))
    }

    fn replace_local(&mut self, updated: Task) {
        if let Some(task) = self.items.iter_mut().find(|t| t.id == updated.id) { *task = updated; }
        self.recompute_filtered();
    }

    fn clear_drafts(&mut self) {
        self.draft_description.clear();
        self.draft_due.clear();
        self.draft_notes.clear();
        self.editing = None;
    }

    async fn submit_create(&mut self) {
        let description = self.draft_description.trim();
        if description.is_empty() { return; }
        let due = self.draft_due.trim();
        let notes = self.draft_notes.trim();
        let input = CreateTask {
            description: Some(description.to_string()),
            due_date: (!due.is_empty()).then(|| due.to_string()),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        };
        match self.service.create(input).await {
            // newest first: prepend the server's record
            Ok(created) => { self.items.insert(0, created); self.error = None; }
            Err(e) => self.error = Some(format!("create failed: {e}")),
        }
        self.recompute_filtered();
    }

    async fn submit_edit(&mut self) {
        let Some(id) = self.editing.clone() else { return };
        let mut patch = PatchTask::default();
        let due = self.draft_due.trim();
        if due != self.orig_due {
            // empty due date clears it
            patch.due_date = Some((!due.is_empty()).then(|| due.to_string()));
        }
        let notes = self.draft_notes.trim();
        if notes != self.orig_notes {
            patch.notes = Some((!notes.is_empty()).then(|| notes.to_string()));
        }
        if patch.due_date.is_none() && patch.notes.is_none() { return; }
        match self.service.patch(id, patch).await {
            Ok(updated) => { self.replace_local(updated); self.error = None; }
            Err(e) => self.error = Some(format!("edit failed: {e}")),
        }
    }

    async fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else { return };
        let (id, completed) = (task.id.clone(), task.completed);
        let patch = PatchTask { completed: Some(!completed), ..Default::default() };
        match self.service.patch(id, patch).await {
            Ok(updated) => { self.replace_local(updated); self.error = None; }
            Err(e) => self.error = Some(format!("update failed: {e}")),
        }
    }

    async fn delete_selected(&mut self) {
        let Some(task) = self.selected_task() else { return };
        let id = task.id.clone();
        match self.service.delete(id.clone()).await {
            // drop locally only once the server confirmed
            Ok(()) => {
                self.items.retain(|t| t.id != id);
                if self.selected > 0 { self.selected -= 1; }
                self.error = None;
            }
            Err(e) => self.error = Some(format!("delete failed: {e}")),
        }
        self.recompute_filtered();
    }
}

async fn run_app<R: TaskRepository>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, service: TaskServiceImpl<R>) -> Result<()> {
    let mut app = App::new(service);
    app.load().await?;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let header = Paragraph::new("Tasks (Enter: toggle, n: new, e: edit, d: delete, /: search, f: status filter, u: due filter, q: quit)")
                .block(Block::default().borders(Borders::ALL).title("taskboard"));
            f.render_widget(header, chunks[0]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            let list_items: Vec<ListItem> = app.filtered_indices.iter().filter_map(|&idx| app.items.get(idx)).map(|t| {
                let mark = if t.completed { "[x]" } else { "[ ]" };
                // stored text is HTML-escaped; decode for display
                ListItem::new(format!("{} {}", mark, unescape_html(&t.description)))
            }).collect();
            if app.filtered_indices.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(format!(
                    "tasks [{} | {}]{}",
                    app.filter.completion.label(),
                    app.filter.due.label(),
                    if app.filter.search.is_empty() { String::new() } else { format!(" search: {}", app.filter.search) },
                )))
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, middle[0], &mut app.list_state);

            let detail = match app.selected_task() {
                Some(t) => format!(
                    "Description:\n{}\n\nDue: {}\nCompleted: {}\n\nNotes:\n{}\n\nCreated: {}\nUpdated: {}",
                    unescape_html(&t.description),
                    t.due_date.as_deref().unwrap_or("(none)"),
                    if t.completed { "yes" } else { "no" },
                    t.notes.as_deref().map(unescape_html).unwrap_or_else(|| "(no notes)".to_string()),
                    t.created_at.to_rfc3339(),
                    t.updated_at.to_rfc3339(),
                ),
                None => String::new(),
            };
            let details = Paragraph::new(detail)
                .block(Block::default().borders(Borders::ALL).title("details"));
            f.render_widget(details, middle[1]);

            let field_name = match app.field { ActiveField::Description => "Description", ActiveField::DueDate => "Due", ActiveField::Notes => "Notes" };
            let field_value = match app.field { ActiveField::Description => &app.draft_description, ActiveField::DueDate => &app.draft_due, ActiveField::Notes => &app.draft_notes };
            let footer_text = match app.mode {
                Mode::View => match &app.error {
                    Some(e) => format!("error: {e}"),
                    None => format!("{} of {} tasks shown", app.filtered_indices.len(), app.items.len()),
                },
                Mode::Create | Mode::Edit => format!("{}: {}_  |  (Tab to switch, Enter to save, Esc to cancel)", field_name, field_value),
                Mode::Search => format!("search: {}_  |  (Enter to apply, Esc to clear)", app.filter.search),
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title(match app.mode { Mode::View => "info", Mode::Create => "create", Mode::Edit => "edit", Mode::Search => "search" }));
            f.render_widget(footer, chunks[2]);
        })?;

        if let Event::Key(key) = event::read()? {
            // Only act on key presses; ignore repeats and releases to prevent duplicate input
            if key.kind != KeyEventKind::Press { continue; }
            match app.mode {
                Mode::View => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                    KeyCode::Down => { let len = app.filtered_indices.len(); if app.selected + 1 < len { app.selected += 1; } }
                    KeyCode::Enter => { app.toggle_selected().await; }
                    KeyCode::Char('n') => {
                        app.mode = Mode::Create;
                        app.field = ActiveField::Description;
                        app.clear_drafts();
                    }
                    KeyCode::Char('e') => {
                        let target = app.selected_task().map(|t| {
                            (
                                t.id.clone(),
                                t.due_date.clone().unwrap_or_default(),
                                t.notes.as_deref().map(unescape_html).unwrap_or_default(),
                            )
                        });
                        if let Some((id, due, notes)) = target {
                            app.editing = Some(id);
                            app.orig_due = due;
                            app.orig_notes = notes;
                            app.draft_due = app.orig_due.clone();
                            app.draft_notes = app.orig_notes.clone();
                            app.field = ActiveField::DueDate;
                            app.mode = Mode::Edit;
                        }
                    }
                    KeyCode::Char('d') => { app.delete_selected().await; }
                    KeyCode::Char('/') => { app.mode = Mode::Search; }
                    KeyCode::Char('f') => { app.filter.completion = app.filter.completion.cycle(); app.recompute_filtered(); }
                    KeyCode::Char('u') => { app.filter.due = app.filter.due.cycle(); app.recompute_filtered(); }
                    _ => {}
                },
                Mode::Create => match key.code {
                    KeyCode::Esc => { app.mode = Mode::View; app.clear_drafts(); }
                    KeyCode::Enter => {
                        app.submit_create().await;
                        app.mode = Mode::View;
                        app.clear_drafts();
                    }
                    KeyCode::Backspace => { match app.field { ActiveField::Description => { app.draft_description.pop(); }, ActiveField::DueDate => { app.draft_due.pop(); }, ActiveField::Notes => { app.draft_notes.pop(); } } }
                    KeyCode::Char(c) => { match app.field { ActiveField::Description => app.draft_description.push(c), ActiveField::DueDate => app.draft_due.push(c), ActiveField::Notes => app.draft_notes.push(c) } }
                    KeyCode::Tab => { app.field = match app.field { ActiveField::Description => ActiveField::DueDate, ActiveField::DueDate => ActiveField::Notes, ActiveField::Notes => ActiveField::Description }; }
                    KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => { /* ignore nav in input */ }
                    _ => {}
                },
                Mode::Edit => match key.code {
                    KeyCode::Esc => { app.mode = Mode::View; app.clear_drafts(); }
                    KeyCode::Enter => {
                        app.submit_edit().await;
                        app.mode = Mode::View;
                        app.clear_drafts();
                    }
                    KeyCode::Backspace => { match app.field { ActiveField::DueDate => { app.draft_due.pop(); }, _ => { app.draft_notes.pop(); } } }
                    KeyCode::Char(c) => { match app.field { ActiveField::DueDate => app.draft_due.push(c), _ => app.draft_notes.push(c) } }
                    // edit form only covers due date and notes
                    KeyCode::Tab => { app.field = match app.field { ActiveField::DueDate => ActiveField::Notes, _ => ActiveField::DueDate }; }
                    KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => { /* ignore nav in input */ }
                    _ => {}
                },
                Mode::Search => match key.code {
                    KeyCode::Esc => { app.filter.search.clear(); app.recompute_filtered(); app.mode = Mode::View; }
                    KeyCode::Enter => { app.mode = Mode::View; }
                    KeyCode::Backspace => { app.filter.search.pop(); app.recompute_filtered(); }
                    KeyCode::Char(c) => { app.filter.search.push(c); app.recompute_filtered(); }
                    _ => {}
                },
            }
        }
    }
    Ok(())
}

fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    if database_url.starts_with("sqlite::memory:") { return Ok(()); }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' { &path[1..] } else { path };
        use std::{fs, fs::OpenOptions, path::Path};
        let p = Path::new(path);
        if let Some(parent) = p.parent() { if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; } }
        if !p.exists() { let _ = OpenOptions::new().create(true).append(true).open(p)?; }
    }
    Ok(())
}
