use chrono::{DateTime, Local, Utc};
use common::types::{AttachmentKind, Message, SenderType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, HighlightSpacing, List, ListItem, Paragraph},
};

use crate::types::{AppState, DetailView, LogLevel, LogMessage, MessageStore, Panels};

/// ### Renders the session detail panel.
///
/// Header, message list, compose line, and the notification line. Without an
/// open session only the compose/command line and notifications are drawn.
pub fn render_main_panel(
    frame: &mut Frame,
    area: Rect,
    app: &mut AppState,
    store: Option<&MessageStore>,
) {
    let border_color = match app.active_panel {
        Panels::SideBar => Color::White,
        Panels::Main => Color::Cyan,
    };

    let (header_area, body_area, footer_area, log_area) = split_main_panel(area, app);

    match app.detail.as_mut() {
        Some(view) => {
            render_main_header(frame, header_area, border_color, view);
            render_messages(frame, body_area, view, store);
        }
        None => {
            render_placeholder(frame, header_area, border_color);
        }
    }
    render_main_footer(frame, footer_area, app);

    if let Some(log) = &app.log {
        render_log_message(frame, log_area, log);
    }

    frame.render_widget(
        Block::new()
            .borders(Borders::ALL)
            .border_style(border_color),
        area,
    );
}

/// ### Splits the main panel into header, body, footer, and log areas.
fn split_main_panel(area: Rect, app: &AppState) -> (Rect, Rect, Rect, Rect) {
    let inner_main_area = area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });

    let required_height_for_input = app.input.lines().len().max(1) as u16;
    let pending_file_line = app
        .detail
        .as_ref()
        .map_or(0, |view| u16::from(view.pending_file.is_some()));

    let main_split = Layout::vertical([
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(required_height_for_input + pending_file_line + 1),
        Constraint::Length(2),
    ])
    .split(inner_main_area);

    (main_split[0], main_split[1], main_split[2], main_split[3])
}

fn render_placeholder(frame: &mut Frame, header_area: Rect, border_color: Color) {
    let inner = header_area.inner(Margin {
        vertical: 1,
        horizontal: 0,
    });

    frame.render_widget(
        Paragraph::new("No session open, pick one from the dashboard")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::new()
                    .borders(Borders::BOTTOM)
                    .border_style(border_color),
            ),
        inner,
    );
}

/// ### Renders the session header
fn render_main_header(
    frame: &mut Frame,
    header_area: Rect,
    border_color: Color,
    view: &DetailView,
) {
    let inner_header_area = header_area.inner(Margin {
        vertical: 1,
        horizontal: 0,
    });

    let session = &view.session;
    let (presence, presence_color) = if session.is_online {
        ("online", Color::Green)
    } else {
        ("offline", Color::DarkGray)
    };
    let assigned = session
        .assigned_admin_name
        .as_deref()
        .unwrap_or("unassigned");

    let title = Line::from(vec![
        Span::styled(session.full_name.clone(), Style::default().fg(Color::Magenta)),
        Span::raw(format!("  #{}  ", session.id)),
        Span::styled(
            session.status.as_str().to_uppercase(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(presence, Style::default().fg(presence_color)),
    ])
    .alignment(Alignment::Center);

    let mut contact = vec![session.email.clone()];
    if let Some(phone) = &session.phone_number {
        contact.push(phone.clone());
    }
    contact.push(format!("assigned: {assigned}"));
    let contact = Line::from(contact.join("  ·  "))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    frame.render_widget(
        Paragraph::new(vec![title, contact]).block(
            Block::new()
                .borders(Borders::BOTTOM)
                .border_style(border_color),
        ),
        inner_header_area,
    );
}

/// ### Renders the compose line and the editor mode prompt
fn render_main_footer(frame: &mut Frame, footer_area: Rect, app: &AppState) {
    let inner_footer_area = footer_area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });

    let pending_file = app
        .detail
        .as_ref()
        .and_then(|view| view.pending_file.as_ref());

    let [file_area, input_row] = Layout::vertical([
        Constraint::Length(u16::from(pending_file.is_some())),
        Constraint::Min(0),
    ])
    .areas(inner_footer_area);

    if let Some(path) = pending_file {
        frame.render_widget(
            Paragraph::new(format!("unsent file: {} (:file to retry)", path.display()))
                .style(Style::default().fg(Color::Red)),
            file_area,
        );
    }

    let [prompt_area, input_area] =
        Layout::horizontal([Constraint::Length(10), Constraint::Min(0)]).areas(input_row);

    frame.render_widget(
        Paragraph::new(format!("{:?}: ", app.mode))
            .style(Style::default().fg(Color::LightMagenta)),
        prompt_area,
    );
    frame.render_widget(&app.input, input_area);
}

/// ### Renders the log message if there is any
fn render_log_message(frame: &mut Frame, log_area: Rect, log: &LogMessage) {
    let inner_log_area = log_area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });

    let [level_area, msg_area] =
        Layout::horizontal([Constraint::Max(9), Constraint::Min(0)]).areas(inner_log_area);

    let color = match log.level {
        LogLevel::INFO => Color::Green,
        LogLevel::ERROR => Color::Red,
    };
    frame.render_widget(
        Paragraph::new(format!("{:?}: ", log.level)).style(Style::default().fg(color)),
        level_area,
    );
    frame.render_widget(Paragraph::new(log.msg.clone()), msg_area);
}

/// ### Renders the conversation, oldest first.
///
/// Every store refresh scrolls to the newest message; in between, the
/// operator's scroll position is kept.
fn render_messages(
    frame: &mut Frame,
    area: Rect,
    view: &mut DetailView,
    store: Option<&MessageStore>,
) {
    let message_area = area.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let messages = store.map(MessageStore::messages).unwrap_or_default();

    let items: Vec<ListItem> = if messages.is_empty() {
        vec![ListItem::new(Line::from("No Messages Yet!").alignment(Alignment::Center))]
    } else {
        messages
            .iter()
            .map(|message| format_message(message, message_area.width))
            .collect()
    };

    let list_widget = List::new(items)
        .highlight_symbol("| ")
        .highlight_spacing(HighlightSpacing::Always);

    view.follow_store(store.map_or(0, MessageStore::revision));
    frame.render_stateful_widget(list_widget, message_area, &mut view.message_state);
}

/// ### Formats a message for display in the main panel.
pub fn format_message(message: &Message, width: u16) -> ListItem<'static> {
    let prompt_style = match message.sender_type {
        SenderType::Admin => Style::default().fg(Color::LightYellow),
        SenderType::Visitor => Style::default().fg(Color::Cyan),
    };

    let sender = if message.sender_name.is_empty() {
        match message.sender_type {
            SenderType::Admin => "Support",
            SenderType::Visitor => "Visitor",
        }
    } else {
        message.sender_name.as_str()
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} | {}", sender, format_date_time(message.timestamp)),
            prompt_style,
        ))
        .alignment(Alignment::Left),
    ];

    match message.attachment() {
        Some(attachment) => {
            let label = attachment_label(attachment.kind());
            lines.push(Line::from(vec![
                Span::styled(format!("> {label} "), Style::default().fg(Color::Magenta)),
                Span::raw(attachment.name.clone()),
            ]));
            lines.push(Line::from(Span::styled(
                format!("  {}", attachment.path),
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
        }
        None => lines.extend(wrap_text_to_width(message.text(), width)),
    }

    ListItem::new(lines)
}

/// `[image]` for inline-image attachments, `[file]` for everything else.
pub fn attachment_label(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Image => "[image]",
        AttachmentKind::File => "[file]",
    }
}

/// ### Formats a timestamp in local time, like "17 Aug 3:41".
fn format_date_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d %b %-H:%M").to_string()
}

/// ### Wraps text to fit within a specified width.
///
/// The first line gets a `> ` prefix, continuation lines are indented to
/// match, and a blank line separates the message from the next one.
pub fn wrap_text_to_width(text: &str, max_width: u16) -> Vec<Line<'static>> {
    let limit = max_width.saturating_sub(2).max(8) as usize;
    let mut rows: Vec<String> = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let needed = current.chars().count() + word.chars().count() + 3;
            if !current.is_empty() && needed > limit {
                rows.push(std::mem::take(&mut current));
            }

            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }

        rows.push(current);
    }

    let mut lines: Vec<Line<'static>> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let prefix = if i == 0 { "> " } else { "  " };
            Line::from(Span::styled(
                format!("{prefix}{row}"),
                Style::default().fg(Color::Gray),
            ))
            .alignment(Alignment::Left)
        })
        .collect();

    lines.push(Line::from(""));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text_to_width("the quick brown fox jumps", 14);
        assert_eq!(
            plain(&lines),
            vec!["> the quick", "  brown fox", "  jumps", ""]
        );
    }

    #[test]
    fn keeps_explicit_line_breaks() {
        let lines = wrap_text_to_width("hi\nthere", 40);
        assert_eq!(plain(&lines), vec!["> hi", "  there", ""]);
    }

    #[test]
    fn tiny_widths_do_not_underflow() {
        let lines = wrap_text_to_width("hello world", 0);
        assert!(!lines.is_empty());
    }

    #[test]
    fn attachment_labels_distinguish_images() {
        assert_eq!(attachment_label(AttachmentKind::Image), "[image]");
        assert_eq!(attachment_label(AttachmentKind::File), "[file]");
    }
}
