use crate::core::{Todo, TodoId};
use serde::{Deserialize, Serialize};

/// One UI effect for the view to apply.
///
/// Serializes as `{"command": "<name>", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "payload", rename_all = "camelCase")]
pub enum RenderCommand {
    ShowEntries(Vec<Todo>),
    SetFilter(String),
    ContentBlockVisibility { visible: bool },
    ToggleAll { checked: bool },
    ClearCompletedButton { completed: usize, visible: bool },
    ClearNewTodo,
    RemoveItem(TodoId),
    UpdateElementCount(usize),
    ElementComplete { id: TodoId, completed: bool },
    EditItem { id: TodoId, title: String },
    EditItemDone { id: TodoId, title: String },
}

impl RenderCommand {
    pub fn name(&self) -> &'static str {
        match self {
            RenderCommand::ShowEntries(_) => "showEntries",
            RenderCommand::SetFilter(_) => "setFilter",
            RenderCommand::ContentBlockVisibility { .. } => "contentBlockVisibility",
            RenderCommand::ToggleAll { .. } => "toggleAll",
            RenderCommand::ClearCompletedButton { .. } => "clearCompletedButton",
            RenderCommand::ClearNewTodo => "clearNewTodo",
            RenderCommand::RemoveItem(_) => "removeItem",
            RenderCommand::UpdateElementCount(_) => "updateElementCount",
            RenderCommand::ElementComplete { .. } => "elementComplete",
            RenderCommand::EditItem { .. } => "editItem",
            RenderCommand::EditItemDone { .. } => "editItemDone",
        }
    }
}

/// User interaction reported by the view.
///
/// Deserializes from `{"event": "<name>", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ViewEvent {
    NewTodo(String),
    ItemRemove { id: TodoId },
    ItemToggle { id: TodoId, completed: bool },
    ItemEdit { id: TodoId },
    ItemEditDone { id: TodoId, title: String },
    ItemEditCancel { id: TodoId },
    ToggleAll { completed: bool },
    RemoveCompleted,
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::NewTodo(_) => "newTodo",
            ViewEvent::ItemRemove { .. } => "itemRemove",
            ViewEvent::ItemToggle { .. } => "itemToggle",
            ViewEvent::ItemEdit { .. } => "itemEdit",
            ViewEvent::ItemEditDone { .. } => "itemEditDone",
            ViewEvent::ItemEditCancel { .. } => "itemEditCancel",
            ViewEvent::ToggleAll { .. } => "toggleAll",
            ViewEvent::RemoveCompleted => "removeCompleted",
        }
    }
}

/// Render target driven by the controller.
pub trait View {
    fn render(&mut self, command: RenderCommand);
}

impl<V: View + ?Sized> View for &mut V {
    fn render(&mut self, command: RenderCommand) {
        (**self).render(command)
    }
}

/// Keeps every command it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    commands: Vec<RenderCommand>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn contains(&self, command: &RenderCommand) -> bool {
        self.commands.contains(command)
    }

    /// Commands with the given instruction name
    pub fn named(&self, name: &str) -> Vec<&RenderCommand> {
        self.commands.iter().filter(|c| c.name() == name).collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl View for RecordingView {
    fn render(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}
