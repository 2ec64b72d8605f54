use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use shopcache_core::Product;

use crate::ui::styles;

/// Render one product. Everything shown comes from `product`; nothing is fetched.
pub fn render(frame: &mut Frame, product: &Product, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(product.image.clone(), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(product.title.clone(), styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(product.display_price(), styles::price_style())),
    ];

    if let Some(ref category) = product.category {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Category: ", styles::highlight_style()),
            Span::raw(category.clone()),
        ]));
    }

    if let Some(rating) = product.display_rating() {
        lines.push(Line::from(vec![
            Span::styled("Rating: ", styles::highlight_style()),
            Span::raw(rating),
        ]));
    }

    if let Some(ref description) = product.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            description.clone(),
            styles::list_item_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Esc] Go Back",
        styles::help_key_style(),
    )));

    let block = Block::default()
        .title(format!(" Product #{} ", product.id))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}
