use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, View};

use super::styles::Palette;
use super::views::{chats, members};

pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, &palette, chunks[0]);
    render_main_content(frame, app, &palette, chunks[1]);
    render_status_bar(frame, app, &palette, chunks[2]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, &palette),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app, &palette),
        AppState::ConfirmingQuit => render_quit_overlay(frame, &palette),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let title = "  Chat Roster";
    let mode_hint = if app.offline_mode { "[offline] " } else { "" };
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, palette.title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub((title.len() + mode_hint.len() + help_hint.len() + 4) as u16)
                as usize,
        )),
        Span::styled(mode_hint, palette.highlight_style()),
        Span::styled(help_hint, palette.muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(palette.muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    match app.view {
        View::Chats => chats::render(frame, app, palette, area),
        View::Members => members::render(frame, app, palette, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let shortcuts = match app.view {
        View::Chats => "[Enter] open | [d]elete | [/] search | [u]pdate | [f]orce | [t]heme | [o]ffline | [q]uit",
        View::Members => "[Esc] back | [u]pdate | [f]orce | [t]heme | [q]uit",
    };

    let left_text = if matches!(app.state, AppState::Searching) {
        format!(" Search: {}▌ ", app.filter.search)
    } else if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if let Some(ref age) = app.last_updated {
        format!(" Updated {} ", age)
    } else {
        " Never updated ".to_string()
    };

    let right_text = format!(" {} ", shortcuts);

    // Pad by char count; the left text can carry multibyte content (the
    // search cursor, backend messages)
    let width = area.width as usize;
    let padding = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, palette.muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, palette.muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(palette.status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect_fixed(50, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", k), palette.help_key_style()),
            Span::styled(desc, palette.help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("   Chat Roster", palette.title_style())),
        Line::from(Span::styled(
            format!("   version {}", version),
            palette.muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", palette.highlight_style())),
        key("↑/↓ j/k", "Navigate list"),
        key("PgUp/PgDn", "Scroll a page"),
        key("Home/End", "Jump to start/end"),
        key("Enter", "Open member roster"),
        key("Esc", "Back to chat list"),
        Line::from(""),
        Line::from(Span::styled(" Chat list", palette.highlight_style())),
        key("/", "Search by title"),
        key("n/m/y", "Sort by name/members/type"),
        key("g", "Cycle type filter"),
        key("d", "Remove chat from the bot"),
        Line::from(""),
        Line::from(Span::styled(" Session", palette.highlight_style())),
        key("u", "Update (cache-friendly)"),
        key("f", "Force refresh from Telegram"),
        key("t", "Toggle light/dark theme"),
        key("o", "Toggle offline mode"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", palette.muted_style()),
            Span::styled("?", palette.help_key_style()),
            Span::styled(" or ", palette.muted_style()),
            Span::styled("Esc", palette.help_key_style()),
            Span::styled(" to close", palette.muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App, palette: &Palette) {
    let area = centered_rect_fixed(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let title = app
        .pending_delete
        .as_ref()
        .map(|c| c.title.clone())
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Remove chat?", palette.title_style())),
        Line::from(""),
        Line::from(Span::styled(
            format!("   \"{}\"", crate::utils::truncate(&title, 42)),
            palette.highlight_style(),
        )),
        Line::from(Span::styled(
            "   The bot will stop tracking this chat.",
            palette.muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", palette.muted_style()),
            Span::styled("[Y]", palette.help_key_style()),
            Span::styled(" to remove, ", palette.muted_style()),
            Span::styled("[N]", palette.help_key_style()),
            Span::styled(" to cancel", palette.muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame, palette: &Palette) {
    let area = centered_rect_fixed(44, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            palette.highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", palette.muted_style()),
            Span::styled("[Y]", palette.help_key_style()),
            Span::styled(" to quit, ", palette.muted_style()),
            Span::styled("[N]", palette.help_key_style()),
            Span::styled(" to cancel", palette.muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::App;

    #[test]
    fn test_status_bar_keeps_shortcuts_right_aligned_with_multibyte_message() {
        let mut app = App::bare();
        app.status_message = Some("Чаты не найдены".to_string());

        let width: u16 = 130;
        let mut terminal = Terminal::new(TestBackend::new(width, 20)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        // Status bar starts two rows from the bottom
        let buffer = terminal.backend().buffer();
        let row: String = (0..width)
            .map(|x| buffer.cell((x, 18)).unwrap().symbol())
            .collect();

        assert!(row.contains("Чаты не найдены"));
        assert!(row.trim_end().ends_with("[q]uit"));
    }
}
