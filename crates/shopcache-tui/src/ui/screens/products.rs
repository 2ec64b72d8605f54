use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use shopcache_core::utils::wrap_lines;
use shopcache_core::{Product, Provenance};

use crate::app::{App, GRID_COLUMNS};
use crate::ui::styles;

/// Card height: borders, two title lines and the price
const CARD_HEIGHT: u16 = 5;

/// Lines of title shown on a card
const TITLE_LINES: usize = 2;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_header(frame, app, chunks[0]);

    if app.loading {
        render_message(frame, chunks[1], "Loading products...", styles::highlight_style());
    } else if app.products.is_empty() {
        render_message(frame, chunks[1], "No products to show", styles::muted_style());
    } else {
        render_grid(frame, app, chunks[1]);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let source = match app.provenance {
        Some(Provenance::Network) => Span::styled("live", styles::success_style()),
        Some(Provenance::Cache) => Span::styled(
            format!(
                "offline · cached {}",
                app.cache_age().unwrap_or_else(|| "earlier".to_string())
            ),
            if app.cache_is_stale() {
                styles::error_style()
            } else {
                styles::highlight_style()
            },
        ),
        Some(Provenance::Empty) => Span::styled("no data", styles::error_style()),
        None => Span::raw(""),
    };

    let line = Line::from(vec![
        Span::styled("Products List", styles::title_style()),
        Span::raw("  "),
        source,
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center).block(block),
        area,
    );
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, style: ratatui::style::Style) {
    let paragraph = Paragraph::new(Line::styled(text.to_string(), style)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Index of the first visible grid row, keeping the selection on screen
fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
    let first_row = first_visible_row(app.selection / GRID_COLUMNS, visible_rows);
    let last_row = (first_row + visible_rows).min(app.row_count());

    let row_constraints: Vec<Constraint> = (first_row..last_row)
        .map(|_| Constraint::Length(CARD_HEIGHT))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (slot, row) in (first_row..last_row).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(rows[slot]);

        for col in 0..GRID_COLUMNS {
            let index = row * GRID_COLUMNS + col;
            if let Some(product) = app.products.get(index) {
                render_card(frame, product, index == app.selection, cells[col]);
            }
        }
    }
}

fn render_card(frame: &mut Frame, product: &Product, selected: bool, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = wrap_lines(&product.title, inner_width, TITLE_LINES)
        .into_iter()
        .map(|l| Line::styled(l, styles::product_title_style()))
        .collect();
    while lines.len() < TITLE_LINES {
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(product.display_price(), styles::price_style()));

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(selected));
    if selected {
        block = block.style(styles::selected_style());
    } else {
        block = block.style(styles::list_item_style());
    }

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}
