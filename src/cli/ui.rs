use super::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
};
use todokit::{BlobStorage, Route};

pub fn draw<S: BlobStorage>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Filter tabs
                Constraint::Min(1),    // Entries grow
                Constraint::Length(1), // Counters
                Constraint::Length(4), // Messages
                Constraint::Length(3), // Input
            ]
            .as_ref(),
        )
        .split(f.area());

    let view = app.view();

    // Filter tabs
    let selected = match Route::parse(&format!("#/{}", view.filter)) {
        Route::All => 0,
        Route::Active => 1,
        Route::Completed => 2,
    };
    let tabs = Tabs::new(vec!["All", "Active", "Completed"])
        .block(Block::default().borders(Borders::ALL).title(" todos "))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    // Counters
    let noun = if view.active_count == 1 { "item" } else { "items" };
    let mut counters = vec![Span::raw(format!("{} {} left", view.active_count, noun))];
    if view.completed_count > 0 {
        counters.push(Span::styled(
            format!("   {} completed (Ctrl+K to clear)", view.completed_count),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if view.all_checked && view.content_visible {
        counters.push(Span::styled("   all done", Style::default().fg(Color::Green)));
    }
    let counters = Paragraph::new(Line::from(counters));

    // Messages: only the last ones that fit
    let skip_count = app.messages.len().saturating_sub(chunks[3].height as usize);
    let messages: Vec<Line> = app.messages.iter().skip(skip_count).cloned().collect();
    let messages = Paragraph::new(messages);

    let view = app.view_mut();
    let entries_block = Block::default().borders(Borders::ALL);
    if view.content_visible {
        let items: Vec<ListItem> = view
            .entries
            .iter()
            .map(|todo| {
                let (mark, style) = if todo.completed {
                    ("[x] ", Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT))
                } else {
                    ("[ ] ", Style::default())
                };
                ListItem::new(Line::from(vec![Span::raw(mark), Span::styled(todo.title.clone(), style)]))
            })
            .collect();
        let list = List::new(items)
            .block(entries_block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, chunks[1], &mut view.list_state);
        f.render_widget(counters, chunks[2]);
    } else {
        f.render_widget(
            Paragraph::new("Nothing to do yet.").block(entries_block),
            chunks[1],
        );
    }

    f.render_widget(messages, chunks[3]);
    f.render_widget(&view.textarea, chunks[4]);
}
