//! Mediator between the view and the model.
//!
//! The controller keeps no task data of its own: every handler queries the
//! model, then issues render commands. The only thing it remembers is the
//! route last passed to [`Controller::set_view`].

pub mod route;
pub mod view;

use crate::core::{Query, Result, Todo, TodoId, TodoPatch};
use crate::model::TodoModel;
use log::debug;

pub use route::Route;
pub use view::{RecordingView, RenderCommand, View, ViewEvent};

pub struct Controller<M: TodoModel, V: View> {
    model: M,
    view: V,
    route: Route,
}

impl<M: TodoModel, V: View> Controller<M, V> {
    pub fn new(model: M, view: V) -> Self {
        Self {
            model,
            view,
            route: Route::All,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn into_parts(self) -> (M, V) {
        (self.model, self.view)
    }

    /// Show the list for `fragment` (`""`, `"#/"`, `"#/active"`,
    /// `"#/completed"`; anything else shows all) and the summary widgets.
    pub fn set_view(&mut self, fragment: &str) -> Result<()> {
        let route = Route::parse(fragment);
        debug!("Routing '{}' to {}", fragment, route);
        self.route = route;

        let todos = self.model.read(&route.filter().query())?;
        self.view.render(RenderCommand::ShowEntries(todos));
        self.view
            .render(RenderCommand::SetFilter(route.name().to_string()));
        self.update_count()
    }

    pub fn handle(&mut self, event: ViewEvent) -> Result<()> {
        debug!("Handling view event {}", event.name());
        match event {
            ViewEvent::NewTodo(title) => self.add_item(&title),
            ViewEvent::ItemRemove { id } => self.remove_item(id),
            ViewEvent::ItemToggle { id, completed } => self.toggle_complete(id, completed),
            ViewEvent::ItemEdit { id } => self.edit_item(id),
            ViewEvent::ItemEditDone { id, title } => self.edit_item_save(id, &title),
            ViewEvent::ItemEditCancel { id } => self.edit_item_cancel(id),
            ViewEvent::ToggleAll { completed } => self.toggle_all(completed),
            ViewEvent::RemoveCompleted => self.remove_completed(),
        }
    }

    /// Blank titles create nothing; the input is cleared either way.
    pub fn add_item(&mut self, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            self.view.render(RenderCommand::ClearNewTodo);
            return Ok(());
        }

        self.model.create(title)?;
        let todos = self.model.read_all()?;
        self.view.render(RenderCommand::ShowEntries(todos));
        self.view.render(RenderCommand::ClearNewTodo);
        self.refilter()
    }

    pub fn remove_item(&mut self, id: TodoId) -> Result<()> {
        self.model.remove(id)?;
        self.view.render(RenderCommand::RemoveItem(id));
        self.refilter()
    }

    pub fn toggle_complete(&mut self, id: TodoId, completed: bool) -> Result<()> {
        self.set_completed(id, completed)?;
        self.refilter()
    }

    /// Enter edit mode with the stored title.
    pub fn edit_item(&mut self, id: TodoId) -> Result<()> {
        if let Some(todo) = self.find_one(id)? {
            self.view.render(RenderCommand::EditItem {
                id,
                title: todo.title,
            });
        }
        Ok(())
    }

    /// Commit an edit. An empty title removes the item.
    pub fn edit_item_save(&mut self, id: TodoId, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return self.remove_item(id);
        }

        self.model.update(id, TodoPatch::title(title))?;
        self.view.render(RenderCommand::EditItemDone {
            id,
            title: title.to_string(),
        });
        Ok(())
    }

    /// Leave edit mode, restoring the persisted title. Writes nothing.
    pub fn edit_item_cancel(&mut self, id: TodoId) -> Result<()> {
        if let Some(todo) = self.find_one(id)? {
            self.view.render(RenderCommand::EditItemDone {
                id,
                title: todo.title,
            });
        }
        Ok(())
    }

    /// Set every record to `completed`, one update and one render each.
    pub fn toggle_all(&mut self, completed: bool) -> Result<()> {
        for todo in self.model.read_all()? {
            self.set_completed(todo.id, completed)?;
        }
        self.refilter()
    }

    pub fn remove_completed(&mut self) -> Result<()> {
        for todo in self.model.read(&Query::by_completed(true))? {
            self.model.remove(todo.id)?;
            self.view.render(RenderCommand::RemoveItem(todo.id));
        }
        self.refilter()
    }

    fn set_completed(&mut self, id: TodoId, completed: bool) -> Result<()> {
        self.model.update(id, TodoPatch::completed(completed))?;
        self.view
            .render(RenderCommand::ElementComplete { id, completed });
        Ok(())
    }

    fn find_one(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(self.model.read(&Query::by_id(id))?.into_iter().next())
    }

    /// Summary widgets, always counted over the unfiltered collection.
    fn update_count(&mut self) -> Result<()> {
        let counts = self.model.count()?;
        self.view.render(RenderCommand::ContentBlockVisibility {
            visible: counts.total > 0,
        });
        self.view.render(RenderCommand::ToggleAll {
            checked: counts.active == 0,
        });
        self.view.render(RenderCommand::ClearCompletedButton {
            completed: counts.completed,
            visible: counts.completed > 0,
        });
        self.view
            .render(RenderCommand::UpdateElementCount(counts.active));
        Ok(())
    }

    /// After a mutation: refresh the summary, and the list too when a
    /// filtered route may now hide or show different records.
    fn refilter(&mut self) -> Result<()> {
        self.update_count()?;
        if self.route != Route::All {
            let todos = self.model.read(&self.route.filter().query())?;
            self.view.render(RenderCommand::ShowEntries(todos));
        }
        Ok(())
    }
}
