use common::types::Session;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, HighlightSpacing, List, ListItem},
};

use crate::types::{AppState, DashboardColumn, Panels, SessionList};

/// ### Renders the dashboard: pending sessions above active ones.
pub fn render_side_panel(frame: &mut Frame, area: Rect, app: &mut AppState) {
    let panel_focused = app.active_panel == Panels::SideBar;
    let border_color = if panel_focused {
        Color::Cyan
    } else {
        Color::White
    };

    frame.render_widget(
        Block::new()
            .borders(Borders::ALL)
            .border_style(border_color),
        area,
    );

    let inner = area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    });
    let [pending_area, active_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    let open_id = app.open_session_id().map(String::from);
    let focus = app.dashboard.focus;

    render_column(
        frame,
        pending_area,
        "PENDING",
        &mut app.dashboard.pending,
        panel_focused && focus == DashboardColumn::Pending,
        open_id.as_deref(),
    );
    render_column(
        frame,
        active_area,
        "ACTIVE",
        &mut app.dashboard.active,
        panel_focused && focus == DashboardColumn::Active,
        open_id.as_deref(),
    );
}

fn render_column(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    list: &mut SessionList,
    focused: bool,
    open_id: Option<&str>,
) {
    let title_color = if focused { Color::Magenta } else { Color::Gray };
    let block = Block::new()
        .borders(Borders::BOTTOM)
        .title(Line::from(format!(" {} ({}) ", title, list.sessions.len())).centered())
        .title_style(Style::default().fg(title_color));

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = if list.sessions.is_empty() {
        vec![ListItem::new(Line::from("No sessions").centered())]
    } else {
        list.sessions
            .iter()
            .map(|session| {
                session_item(session, width, open_id == Some(session.id.as_str()))
            })
            .collect()
    };

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
        .highlight_spacing(HighlightSpacing::Always);

    frame.render_stateful_widget(list_widget, area, &mut list.state);
}

fn session_item(session: &Session, width: usize, is_open: bool) -> ListItem<'static> {
    let (marker, marker_color) = if session.is_online {
        ("● ", Color::Green)
    } else {
        ("○ ", Color::DarkGray)
    };
    let id = format!("#{}", session.id);

    // Two columns for the highlight symbol, two for the marker.
    let spacing = width.saturating_sub(session.full_name.chars().count() + id.len() + 4);

    let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(marker_color)),
        Span::raw(session.full_name.clone()),
        Span::raw(" ".repeat(spacing)),
        Span::styled(id, Style::default().fg(Color::DarkGray)),
    ]);

    if is_open {
        ListItem::new(line).style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
    } else {
        ListItem::new(line)
    }
}
