//! Chat list view: sortable table plus the stats panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, LoadState};
use crate::models::ChatSortColumn;
use crate::ui::styles::Palette;
use crate::utils::truncate;

/// Skeleton rows shown while the first fetch is in flight
const SKELETON_ROWS: usize = 6;

pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(area);

    render_chat_table(frame, app, palette, chunks[0]);
    render_stats_panel(frame, app, palette, chunks[1]);
}

fn render_chat_table(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .title(table_title(app))
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

    let visible = app.visible_chats();
    if visible.is_empty() {
        render_empty(frame, app, palette, block, area);
        return;
    }

    let sort_indicator = |col: ChatSortColumn| {
        if app.filter.sort_by == col {
            if app.filter.ascending {
                " ▲"
            } else {
                " ▼"
            }
        } else {
            ""
        }
    };

    let header = Row::new([
        Cell::from(format!("Title{}", sort_indicator(ChatSortColumn::Title))),
        Cell::from(format!("Type{}", sort_indicator(ChatSortColumn::Type))),
        Cell::from(format!("Members{}", sort_indicator(ChatSortColumn::MembersCount))),
    ])
    .style(palette.title_style())
    .height(1);

    let rows: Vec<Row> = visible
        .iter()
        .map(|chat| {
            Row::new(vec![
                Cell::from(truncate(&chat.title, area.width.saturating_sub(24) as usize)),
                Cell::from(chat.chat_type.label()),
                Cell::from(format!("{:>7}", chat.members_count_str())),
            ])
            .style(palette.list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(11),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(palette.selected_style());

    let mut state = TableState::default();
    state.select(Some(app.chat_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn table_title(app: &App) -> String {
    let sort_help = "[n]ame [m]embers t[y]pe [g]roup-filter";
    let search = if app.filter.search.trim().is_empty() {
        String::new()
    } else {
        format!(" /{}", app.filter.search.trim())
    };
    format!(
        " Chats ({}, {}){} - {} ",
        app.visible_chats().len(),
        app.filter.type_filter.label(),
        search,
        sort_help
    )
}

fn render_skeleton(frame: &mut Frame, palette: &Palette, block: Block, area: Rect) {
    let mut lines = vec![Line::from("")];
    for _ in 0..SKELETON_ROWS {
        lines.push(Line::from(Span::styled(
            "  ░░░░░░░░░░░░░░░░░░░░        ░░░░░░      ░░░",
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
            Span::styled(" to retry", palette.muted_style()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_empty(frame: &mut Frame, app: &App, palette: &Palette, block: Block, area: Rect) {
    // Prefer the backend's warning when one was attached to the data
    let message = app.data_note.clone().unwrap_or_else(|| {
        if app.chats.is_empty() {
            "No chats registered yet. Send a message in a group where the bot \
             is an admin, or use /register there."
                .to_string()
        } else {
            "No chats match the current filter.".to_string()
        }
    });

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", message), palette.muted_style())),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_stats_panel(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let stats = app.stats();

    let mut lines = vec![
        Line::from(""),
        stat_line(palette, "Total", stats.total),
        stat_line(palette, "Groups", stats.groups),
        stat_line(palette, "Supergroups", stats.supergroups),
    ];

    if let Some(ref note) = app.data_note {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", note),
            palette.highlight_style(),
        )));
    }

    if app.offline_mode {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " OFFLINE MODE",
            palette.highlight_style(),
        )));
    }

    let block = Block::default()
        .title(" Stats ")
        .title_style(palette.muted_style())
        .borders(Borders::ALL)
        .border_style(palette.border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn stat_line(palette: &Palette, label: &str, value: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<12}", label), palette.muted_style()),
        Span::styled(value.to_string(), palette.success_style()),
    ])
}
