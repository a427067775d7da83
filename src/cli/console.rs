use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, BufRead, Write};
use todokit::{BlobStorage, Controller, RenderCommand, Store, Todo, View, ViewEvent};
use tracing::warn;

/// Prints render commands to stdout, either readable or as JSON lines.
///
/// The first write failure is kept and later commands are dropped, so a
/// closed pipe surfaces through [`ConsoleView::take_error`] or
/// [`ConsoleView::into_inner`].
pub struct ConsoleView<W: Write> {
    out: W,
    json: bool,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn write_human(&mut self, command: &RenderCommand) -> io::Result<()> {
        match command {
            RenderCommand::ShowEntries(todos) => {
                if todos.is_empty() {
                    writeln!(self.out, "(no todos)")?;
                }
                for todo in todos {
                    writeln!(self.out, "{}", format_todo(todo))?;
                }
                Ok(())
            }
            RenderCommand::SetFilter(name) => {
                let shown = if name.is_empty() { "all" } else { name.as_str() };
                writeln!(self.out, "filter: {shown}")
            }
            RenderCommand::UpdateElementCount(active) => {
                let noun = if *active == 1 { "item" } else { "items" };
                writeln!(self.out, "{active} {noun} left")
            }
            RenderCommand::ClearCompletedButton { completed, visible: true } => {
                writeln!(self.out, "{completed} completed (clear-completed to remove)")
            }
            RenderCommand::RemoveItem(id) => writeln!(self.out, "removed {id}"),
            RenderCommand::ElementComplete { id, completed } => {
                let state = if *completed { "completed" } else { "active" };
                writeln!(self.out, "{id} marked {state}")
            }
            RenderCommand::EditItem { id, title } => writeln!(self.out, "editing {id}: {title}"),
            RenderCommand::EditItemDone { id, title } => writeln!(self.out, "{id}: {title}"),
            // Widget state with no console counterpart
            RenderCommand::ContentBlockVisibility { .. }
            | RenderCommand::ToggleAll { .. }
            | RenderCommand::ClearCompletedButton { .. }
            | RenderCommand::ClearNewTodo => Ok(()),
        }
    }
}

pub fn format_todo(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };
    format!("[{mark}] {:>6}  {}", todo.id, todo.title)
}

impl<W: Write> View for ConsoleView<W> {
    fn render(&mut self, command: RenderCommand) {
        if self.error.is_some() {
            return;
        }
        let written = if self.json {
            serde_json::to_string(&command)
                .map_err(io::Error::from)
                .and_then(|line| writeln!(self.out, "{line}"))
        } else {
            self.write_human(&command)
        };
        if let Err(err) = written {
            warn!(error = %err, command = command.name(), "failed to write render command");
            self.error = Some(err);
        }
    }
}

/// One line of input in `events` mode: a route change or a view event.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Inbound {
    Route { route: String },
    Event(ViewEvent),
}

/// Feed JSON lines from `input` to the controller until EOF or until the
/// view can no longer write.
pub fn pump_events<S, W, R>(controller: &mut Controller<Store<S>, ConsoleView<W>>, input: R) -> Result<()>
where
    S: BlobStorage,
    W: Write,
    R: BufRead,
{
    for (number, line) in input.lines().enumerate() {
        let line = line.context("failed to read event line")?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Inbound>(&line) {
            Ok(Inbound::Route { route }) => controller.set_view(&route)?,
            Ok(Inbound::Event(event)) => controller.handle(event)?,
            Err(err) => warn!(line = number + 1, error = %err, "ignoring malformed event"),
        }
        if let Some(err) = controller.view_mut().take_error() {
            return Err(err).context("failed to write render output");
        }
    }
    Ok(())
}
