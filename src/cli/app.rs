use super::ui;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListState},
};
use std::{error::Error, io};
use todokit::{BlobStorage, Controller, RenderCommand, Route, Store, Todo, TodoId, View, ViewEvent};
use tui_textarea::{CursorMove, TextArea};

const MAX_MESSAGES: usize = 50;

/// Terminal rendition of the task list, updated only through render commands.
pub struct TuiView {
    pub entries: Vec<Todo>,
    pub filter: String,
    pub content_visible: bool,
    pub all_checked: bool,
    pub active_count: usize,
    pub completed_count: usize,
    pub editing: Option<TodoId>,
    pub textarea: TextArea<'static>,
    pub list_state: ListState,
}

impl TuiView {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            filter: String::new(),
            content_visible: false,
            all_checked: false,
            active_count: 0,
            completed_count: 0,
            editing: None,
            textarea: new_textarea(None),
            list_state: ListState::default(),
        }
    }

    pub fn selected(&self) -> Option<&Todo> {
        self.list_state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn input(&self) -> String {
        self.textarea.lines().join(" ")
    }

    fn move_selection(&mut self, forward: bool) {
        if self.entries.is_empty() {
            self.list_state.select(None);
            return;
        }
        let last = self.entries.len() - 1;
        let next = match (self.list_state.selected(), forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(last),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.list_state.select(Some(next));
    }

    fn clamp_selection(&mut self) {
        match (self.entries.len(), self.list_state.selected()) {
            (0, _) => self.list_state.select(None),
            (len, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
            (_, None) => self.list_state.select(Some(0)),
            _ => {}
        }
    }
}

impl Default for TuiView {
    fn default() -> Self {
        Self::new()
    }
}

fn new_textarea(editing: Option<(TodoId, &str)>) -> TextArea<'static> {
    let (mut textarea, title) = match editing {
        Some((id, text)) => (TextArea::new(vec![text.to_string()]), format!(" Editing {id} (Enter to save, Esc to cancel) ")),
        None => (TextArea::default(), " What needs to be done? ".to_string()),
    };
    textarea.set_placeholder_text("Type a todo and press Enter ('Esc' to quit)");
    textarea.set_block(Block::default().borders(Borders::ALL).title(title));
    textarea.move_cursor(CursorMove::End);
    textarea
}

impl View for TuiView {
    fn render(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::ShowEntries(todos) => {
                self.entries = todos;
                self.clamp_selection();
            }
            RenderCommand::SetFilter(name) => self.filter = name,
            RenderCommand::ContentBlockVisibility { visible } => self.content_visible = visible,
            RenderCommand::ToggleAll { checked } => self.all_checked = checked,
            RenderCommand::ClearCompletedButton { completed, .. } => self.completed_count = completed,
            RenderCommand::ClearNewTodo => self.textarea = new_textarea(None),
            RenderCommand::RemoveItem(id) => {
                self.entries.retain(|todo| todo.id != id);
                self.clamp_selection();
            }
            RenderCommand::UpdateElementCount(active) => self.active_count = active,
            RenderCommand::ElementComplete { id, completed } => {
                if let Some(todo) = self.entries.iter_mut().find(|todo| todo.id == id) {
                    todo.completed = completed;
                }
            }
            RenderCommand::EditItem { id, title } => {
                self.editing = Some(id);
                self.textarea = new_textarea(Some((id, &title)));
            }
            RenderCommand::EditItemDone { id, title } => {
                if let Some(todo) = self.entries.iter_mut().find(|todo| todo.id == id) {
                    todo.title = title;
                }
                self.editing = None;
                self.textarea = new_textarea(None);
            }
        }
    }
}

pub struct App<S: BlobStorage> {
    controller: Controller<Store<S>, TuiView>,
    pub messages: Vec<Line<'static>>,
    pub exit: bool,
}

impl<S: BlobStorage> App<S> {
    pub fn new(store: Store<S>) -> Self {
        Self {
            controller: Controller::new(store, TuiView::new()),
            messages: vec![Line::from(Span::styled(
                "Up/Down select | Ctrl+T toggle | Ctrl+E edit | Ctrl+X delete | Ctrl+A toggle all | Ctrl+K clear completed | Tab filter",
                Style::default().fg(Color::DarkGray),
            ))],
            exit: false,
        }
    }

    pub fn view(&self) -> &TuiView {
        self.controller.view()
    }

    pub fn view_mut(&mut self) -> &mut TuiView {
        self.controller.view_mut()
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.navigate(Route::All);

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        if let Err(err) = res {
            println!("{:?}", err);
        }

        Ok(())
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| ui::draw(f, self))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                let editing = self.view().editing;
                match key.code {
                    KeyCode::Esc => match editing {
                        Some(id) => self.dispatch(ViewEvent::ItemEditCancel { id }),
                        None => self.exit = true,
                    },
                    KeyCode::Enter => {
                        let title = self.view().input();
                        match editing {
                            Some(id) => self.dispatch(ViewEvent::ItemEditDone { id, title }),
                            None => self.dispatch(ViewEvent::NewTodo(title)),
                        }
                    }
                    KeyCode::Up => self.view_mut().move_selection(false),
                    KeyCode::Down => self.view_mut().move_selection(true),
                    KeyCode::Tab => {
                        let next = match Route::parse(&format!("#/{}", self.view().filter)) {
                            Route::All => Route::Active,
                            Route::Active => Route::Completed,
                            Route::Completed => Route::All,
                        };
                        self.navigate(next);
                    }
                    KeyCode::Delete => self.on_selected(|todo| ViewEvent::ItemRemove { id: todo.id }),
                    KeyCode::Char('x') if ctrl => self.on_selected(|todo| ViewEvent::ItemRemove { id: todo.id }),
                    KeyCode::Char('t') if ctrl => self.on_selected(|todo| ViewEvent::ItemToggle {
                        id: todo.id,
                        completed: !todo.completed,
                    }),
                    KeyCode::Char('e') if ctrl => self.on_selected(|todo| ViewEvent::ItemEdit { id: todo.id }),
                    KeyCode::Char('a') if ctrl => {
                        let completed = !self.view().all_checked;
                        self.dispatch(ViewEvent::ToggleAll { completed });
                    }
                    KeyCode::Char('k') if ctrl => self.dispatch(ViewEvent::RemoveCompleted),
                    _ => {
                        self.view_mut().textarea.input(key);
                    }
                }
            }
            if self.exit {
                return Ok(());
            }
        }
    }

    fn on_selected(&mut self, event: impl FnOnce(&Todo) -> ViewEvent) {
        if let Some(event) = self.view().selected().map(event) {
            self.dispatch(event);
        }
    }

    fn navigate(&mut self, route: Route) {
        if let Err(err) = self.controller.set_view(route.fragment()) {
            self.report(err);
        }
    }

    fn dispatch(&mut self, event: ViewEvent) {
        if let Err(err) = self.controller.handle(event) {
            self.report(err);
        }
    }

    fn report(&mut self, err: todokit::TodoError) {
        self.messages.push(Line::from(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red),
        )));
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todokit::{MemoryStorage, ScriptedIdSource};

    fn app() -> App<MemoryStorage> {
        let store = Store::open("todos", MemoryStorage::new())
            .unwrap()
            .with_id_source(ScriptedIdSource::new([1, 2, 3]));
        App::new(store)
    }

    #[test]
    fn test_view_follows_controller() {
        let mut app = app();
        app.navigate(Route::All);
        app.dispatch(ViewEvent::NewTodo("one".into()));
        app.dispatch(ViewEvent::NewTodo("two".into()));
        assert_eq!(app.view().entries.len(), 2);
        assert_eq!(app.view().active_count, 2);

        app.dispatch(ViewEvent::ItemToggle { id: 1, completed: true });
        assert!(app.view().entries[0].completed);
        assert_eq!(app.view().completed_count, 1);

        app.dispatch(ViewEvent::RemoveCompleted);
        assert_eq!(app.view().entries, vec![Todo::new(2, "two")]);
    }

    #[test]
    fn test_edit_cycle() {
        let mut app = app();
        app.navigate(Route::All);
        app.dispatch(ViewEvent::NewTodo("draft".into()));

        app.dispatch(ViewEvent::ItemEdit { id: 1 });
        assert_eq!(app.view().editing, Some(1));
        assert_eq!(app.view().input(), "draft");

        app.dispatch(ViewEvent::ItemEditDone { id: 1, title: " final ".into() });
        assert_eq!(app.view().editing, None);
        assert_eq!(app.view().entries[0].title, "final");
    }

    #[test]
    fn test_filter_tab_shows_subset() {
        let mut app = app();
        app.navigate(Route::All);
        app.dispatch(ViewEvent::NewTodo("a".into()));
        app.dispatch(ViewEvent::NewTodo("b".into()));
        app.dispatch(ViewEvent::ItemToggle { id: 2, completed: true });

        app.navigate(Route::Completed);
        assert_eq!(app.view().filter, "completed");
        assert_eq!(app.view().entries, vec![Todo::new(2, "b").completed(true)]);
    }
}
