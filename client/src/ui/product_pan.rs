use common::types::Product;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, HighlightSpacing, List, ListItem, Paragraph},
};

use crate::types::{AppState, EditorMode, NO_PRODUCTS_NOTICE, SearchResults};

/// ### Renders the product search popup over the main panel.
pub fn render_product_panel(frame: &mut Frame, area: Rect, app: &mut AppState) {
    let popup = centered(area, 70, 60);
    frame.render_widget(Clear, popup);

    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(" Send a product ").centered())
        .title_bottom(
            Line::from(" Enter: search · Tab: send · Esc: close ")
                .style(Style::default().fg(Color::DarkGray))
                .centered(),
        );
    frame.render_widget(block, popup);

    let inner = popup.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });
    let [search_area, results_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);

    render_search_field(frame, search_area, app);

    let panel = &mut app.products;
    match &panel.results {
        SearchResults::Idle => render_notice(
            frame,
            results_area,
            "Type a term and press Enter",
            Color::DarkGray,
        ),
        SearchResults::Loading => {
            render_notice(frame, results_area, "Searching...", Color::Yellow)
        }
        SearchResults::Empty => {
            render_notice(frame, results_area, NO_PRODUCTS_NOTICE, Color::Gray)
        }
        SearchResults::Notice(message) => {
            render_notice(frame, results_area, message, Color::Red)
        }
        SearchResults::Products(products) => {
            let width = results_area.width.saturating_sub(2) as usize;
            let items: Vec<ListItem> = products
                .iter()
                .enumerate()
                .map(|(i, product)| product_item(i + 1, product, width))
                .collect();

            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ")
                .highlight_spacing(HighlightSpacing::Always);
            frame.render_stateful_widget(list, results_area, &mut panel.list_state);
        }
    }
}

fn render_search_field(frame: &mut Frame, area: Rect, app: &AppState) {
    let [prompt_area, field_area] =
        Layout::horizontal([Constraint::Length(8), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new("Search: ").style(Style::default().fg(Color::LightMagenta)),
        prompt_area,
    );

    if app.mode == EditorMode::SEARCH {
        frame.render_widget(&app.input, field_area);
    } else {
        frame.render_widget(Paragraph::new(app.products.term.clone()), field_area);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    frame.render_widget(
        Paragraph::new(Line::from(message.to_string()).centered())
            .style(Style::default().fg(color)),
        area,
    );
}

fn product_item(number: usize, product: &Product, width: usize) -> ListItem<'static> {
    let price = product.price.clone().unwrap_or_default();
    let title = format!("{number}. {}", product.title);
    let spacing = width.saturating_sub(title.chars().count() + price.chars().count() + 2);

    let mut lines = vec![Line::from(vec![
        Span::raw(title),
        Span::raw(" ".repeat(spacing)),
        Span::styled(price, Style::default().fg(Color::Green)),
    ])];

    let mut details = Vec::new();
    if let Some(sku) = &product.sku {
        details.push(format!("SKU {sku}"));
    }
    details.push(product.url.clone());
    lines.push(Line::from(Span::styled(
        format!("   {}", details.join("  ·  ")),
        Style::default().fg(Color::DarkGray),
    )));

    ListItem::new(lines)
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    area
}
