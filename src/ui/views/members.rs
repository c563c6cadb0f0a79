//! Member roster view for the opened chat.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, LoadState};
use crate::ui::styles::Palette;
use crate::utils::truncate;

const SKELETON_ROWS: usize = 5;

pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let title = match app.current_chat {
        Some(ref chat) => format!(
            " {} - members ({}) - [Esc] back ",
            truncate(&chat.title, 40),
            app.members.len()
        ),
        None => " Members ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .title_style(palette.muted_style())
        .borders(Borders::ALL)
        .border_style(palette.border_style(true));

    match &app.load {
        LoadState::Loading => {
            render_skeleton(frame, palette, block, area);
            return;
        }
        LoadState::Errored(message) => {
            render_error(frame, palette, block, message, area);
            return;
        }
        LoadState::Loaded => {}
    }

    if app.members.is_empty() {
        let message = app
            .data_note
            .clone()
            .unwrap_or_else(|| "No members visible to the bot in this chat.".to_string());
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", message), palette.muted_style())),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Username"),
        Cell::from("Status"),
        Cell::from("Bot"),
    ])
    .style(palette.title_style())
    .height(1);

    let rows: Vec<Row> = app
        .members
        .iter()
        .map(|member| {
            let status_style = match member.status {
                crate::models::MemberStatus::Creator => palette.highlight_style(),
                crate::models::MemberStatus::Administrator => palette.success_style(),
                crate::models::MemberStatus::Member => palette.list_item_style(),
            };
            Row::new(vec![
                Cell::from(truncate(&member.display_name(), 32)),
                Cell::from(member.username_str()),
                Cell::from(Span::styled(member.status.label(), status_style)),
                Cell::from(if member.is_bot { "yes" } else { "" }),
            ])
            .style(palette.list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Length(4),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(palette.selected_style());

    let mut state = TableState::default();
    state.select(Some(app.member_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_skeleton(frame: &mut Frame, palette: &Palette, block: Block, area: Rect) {
    let mut lines = vec![Line::from("")];
    for _ in 0..SKELETON_ROWS {
        lines.push(Line::from(Span::styled(
            "  ░░░░░░░░░░░░░░      ░░░░░░░░    ░░░░░░",
            palette.skeleton_style(),
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_error(frame: &mut Frame, palette: &Palette, block: Block, message: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            palette.error_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", palette.muted_style()),
            Span::styled("[r]", palette.help_key_style()),
            Span::styled(" to retry or ", palette.muted_style()),
            Span::styled("[Esc]", palette.help_key_style()),
            Span::styled(" to go back", palette.muted_style()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::{App, View};
    use crate::config::Theme;
    use crate::models::{Chat, ChatType};

    fn roster_app() -> App {
        let mut app = App::bare();
        app.view = View::Members;
        app.load = LoadState::Loaded;
        app.current_chat = Some(Chat {
            id: -100,
            title: "Alpha".to_string(),
            chat_type: ChatType::Group,
            username: None,
            photo_url: None,
            members_count: Some(0),
        });
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|f| render(f, app, &Palette::for_theme(Theme::Dark), f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_empty_roster_renders_empty_state() {
        let text = draw(&roster_app());
        assert!(text.contains("No members visible"));
    }

    #[test]
    fn test_empty_roster_prefers_data_note() {
        let mut app = roster_app();
        app.data_note = Some("Showing cached roster from 5m ago".to_string());
        let text = draw(&app);
        assert!(text.contains("Showing cached roster"));
        assert!(!text.contains("No members visible"));
    }
}
