use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState};
use crate::navigator::Route;

use super::screens::{product_detail, products};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(6),    // Current screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_screen(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ShowingNotice => render_notice_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  shopcache › {}", app.navigator.current().title());
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 2),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_screen(frame: &mut Frame, app: &App, area: Rect) {
    match app.navigator.current() {
        Route::Products => products::render(frame, app, area),
        Route::ProductDetails { product } => product_detail::render(frame, product, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.navigator.current() {
        Route::Products => "[Enter] open | [r]eload | [q]uit",
        Route::ProductDetails { .. } => "[Esc] back | [q]uit",
    };

    let left_text = format!(" {} ", app.status_message.as_deref().unwrap_or(""));
    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 16, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let help_text = vec![
        Line::from(Span::styled(
            format!(" shopcache {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Products", styles::highlight_style())),
        help_line("←↑↓→ hjkl", "Move selection"),
        help_line("Enter", "Open product details"),
        help_line("r", "Reload from catalog"),
        Line::from(""),
        Line::from(Span::styled(" Details", styles::highlight_style())),
        help_line("Esc / ⌫", "Go back"),
        Line::from(""),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_notice_overlay(frame: &mut Frame, app: &App) {
    let Some(ref notice) = app.notice else {
        return;
    };
    let area = centered_rect_fixed(50, 8, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(notice.message(), styles::list_item_style())),
    ];
    if let Some(detail) = notice.detail() {
        lines.push(Line::from(Span::styled(detail, styles::muted_style())));
    }
    lines.extend([
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[OK]", styles::help_key_style()),
            Span::styled(" (Enter) to continue", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .title(format!(" {} ", notice.title()))
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style())
        .style(Style::default());

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
