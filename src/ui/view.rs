use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::domain::{
    conversation_store::ConversationListUiState,
    modal_state::{DirectChatPicker, GroupFormField, ModalState, NewGroupForm, PickerLoad},
    open_chat_state::OpenChatUiState,
    shell_state::{ActivePane, ScreenRect, ShellState},
};

use super::{
    message_input::render_composer,
    message_rendering::{build_message_rows, row_to_list_item as message_item},
    sidebar_rendering::{build_sidebar_rows, cursor_row_index, row_to_list_item as sidebar_item},
    styles,
};

const SIDEBAR_HINTS: &str =
    "j/k move  Enter open  Tab compose  1/2 fold  g group  n direct  r reload  L logout  q quit";
const COMPOSER_HINTS: &str = "Enter send  Esc/Tab back";
const MODAL_HINTS: &str = "Tab field  Space toggle  Enter confirm  Esc close";

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let [sidebar_area, conversation_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .areas(content_area);

    // 3 lines for the composer: border, text, border.
    let [messages_area, composer_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .areas(conversation_area);

    let active_pane = state.active_pane();
    let modal_open = state.modal().is_open();

    render_sidebar(frame, sidebar_area, state, active_pane == ActivePane::Sidebar && !modal_open);
    render_messages(frame, messages_area, state);
    render_composer(
        frame,
        composer_area,
        state.composer(),
        active_pane == ActivePane::Composer && !modal_open,
        state.open_chat().is_open(),
    );
    frame.render_widget(Paragraph::new(status_line(state)), status_area);

    let modal_area = match state.modal() {
        ModalState::Closed => None,
        ModalState::NewGroup(form) => Some(render_group_modal(frame, form)),
        ModalState::NewDirectChat(picker) => Some(render_direct_modal(frame, picker)),
    };
    state.set_modal_area(modal_area.map(|area| ScreenRect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height,
    }));
}

fn panel_block(title: impl Into<Line<'static>>, is_active: bool) -> Block<'static> {
    let border_style = if is_active {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_sidebar(frame: &mut Frame<'_>, area: Rect, state: &ShellState, is_active: bool) {
    let store = state.conversations();
    let placeholder = match store.ui_state() {
        ConversationListUiState::Loading => Some("Loading conversations..."),
        ConversationListUiState::Empty => Some("No conversations yet. Press r to reload."),
        ConversationListUiState::Error => Some("Failed to load conversations. Press r to retry."),
        ConversationListUiState::Ready => None,
    };

    if let Some(text) = placeholder {
        frame.render_widget(
            Paragraph::new(text).block(panel_block("Conversations", is_active)),
            area,
        );
        return;
    }

    let rows = build_sidebar_rows(store, state.sidebar(), state.open_chat().conversation_id());
    let items: Vec<ListItem<'static>> = rows.iter().map(sidebar_item).collect();
    let list = List::new(items)
        .block(panel_block("Conversations", is_active))
        .highlight_style(styles::cursor_row_style());

    let mut list_state = ListState::default();
    list_state.select(cursor_row_index(&rows));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_messages(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let open_chat = state.open_chat();
    let title = if open_chat.is_open() {
        open_chat.title().to_owned()
    } else {
        "Messages".to_owned()
    };
    let block = panel_block(title, false);

    let placeholder = match open_chat.ui_state() {
        OpenChatUiState::Empty => Some("Select a conversation to view messages"),
        OpenChatUiState::Loading => Some("Loading messages..."),
        OpenChatUiState::Error => Some("Failed to load messages. Press Enter to retry."),
        OpenChatUiState::Ready if open_chat.messages().is_empty() => Some("No messages yet"),
        OpenChatUiState::Ready => None,
    };

    if let Some(text) = placeholder {
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let rows = build_message_rows(open_chat.messages(), state.session(), &Local::now());
    let items: Vec<ListItem<'static>> = rows.iter().map(message_item).collect();

    // Selecting the newest entry keeps the list scrolled to the bottom.
    let mut list_state = ListState::default();
    list_state.select(open_chat.newest_index());
    frame.render_stateful_widget(
        List::new(items).block(block).highlight_style(Style::default()),
        area,
        &mut list_state,
    );
}

fn status_line(state: &ShellState) -> Line<'static> {
    let connectivity = state.connectivity_status();
    let mut spans = vec![Span::styled(
        format!(" {} ", connectivity.as_label()),
        styles::connectivity_style(connectivity),
    )];

    if let Some(notice) = state.notice() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(notice.to_owned(), styles::notice_style()));
    }

    if let Some(toast) = state.toast() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {}: {} ", toast.title, toast.body),
            styles::toast_style(),
        ));
    }

    let hints = if state.modal().is_open() {
        MODAL_HINTS
    } else {
        match state.active_pane() {
            ActivePane::Sidebar => SIDEBAR_HINTS,
            ActivePane::Composer => COMPOSER_HINTS,
        }
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled(hints, styles::hint_style()));

    Line::from(spans)
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(height_percent) / 100) as u16;

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::modal_border_style())
}

fn render_group_modal(frame: &mut Frame<'_>, form: &NewGroupForm) -> Rect {
    let area = centered_rect(frame.area(), 60, 70);
    frame.render_widget(Clear, area);

    let block = modal_block("New Group");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [name_area, description_area, members_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(inner);

    let focus = form.focus();
    frame.render_widget(
        Paragraph::new(form.name.text().to_owned())
            .block(panel_block("Name", focus == GroupFormField::Name)),
        name_area,
    );
    frame.render_widget(
        Paragraph::new(form.description.text().to_owned())
            .block(panel_block("Description", focus == GroupFormField::Description)),
        description_area,
    );

    let members_block = panel_block("Members", focus == GroupFormField::Members);
    match form.members_load() {
        PickerLoad::Loading => frame.render_widget(
            Paragraph::new("Loading contacts...").block(members_block),
            members_area,
        ),
        PickerLoad::Error => frame.render_widget(
            Paragraph::new("Failed to load contacts.").block(members_block),
            members_area,
        ),
        PickerLoad::Ready if form.members().is_empty() => frame.render_widget(
            Paragraph::new("No direct contacts to add.").block(members_block),
            members_area,
        ),
        PickerLoad::Ready => {
            let items: Vec<ListItem<'static>> = form
                .members()
                .iter()
                .map(|member| {
                    let check = if member.selected { "[x]" } else { "[ ]" };
                    ListItem::new(format!("{check} {}", member.name))
                })
                .collect();
            let mut list_state = ListState::default();
            if focus == GroupFormField::Members {
                list_state.select(Some(form.member_cursor()));
            }
            frame.render_stateful_widget(
                List::new(items)
                    .block(members_block)
                    .highlight_style(styles::cursor_row_style()),
                members_area,
                &mut list_state,
            );
        }
    }

    let focused_input = match focus {
        GroupFormField::Name => Some((&form.name, name_area)),
        GroupFormField::Description => Some((&form.description, description_area)),
        GroupFormField::Members => None,
    };
    if let Some((input, field_area)) = focused_input {
        let column = input.text().chars().take(input.cursor_position()).count() as u16;
        frame.set_cursor_position((
            field_area.x.saturating_add(1).saturating_add(column),
            field_area.y.saturating_add(1),
        ));
    }

    area
}

fn render_direct_modal(frame: &mut Frame<'_>, picker: &DirectChatPicker) -> Rect {
    let area = centered_rect(frame.area(), 50, 60);
    frame.render_widget(Clear, area);

    let block = modal_block("New Direct Chat");
    match picker.load() {
        PickerLoad::Loading => {
            frame.render_widget(Paragraph::new("Loading users...").block(block), area)
        }
        PickerLoad::Error => {
            frame.render_widget(Paragraph::new("Failed to load users.").block(block), area)
        }
        PickerLoad::Ready if picker.candidates().is_empty() => frame.render_widget(
            Paragraph::new("Everyone already has a direct chat with you.").block(block),
            area,
        ),
        PickerLoad::Ready => {
            let items: Vec<ListItem<'static>> = picker
                .candidates()
                .iter()
                .map(|user| ListItem::new(user.username.clone()))
                .collect();
            let mut list_state = ListState::default();
            list_state.select(Some(picker.cursor()));
            frame.render_stateful_widget(
                List::new(items)
                    .block(block)
                    .highlight_style(styles::cursor_row_style()),
                area,
                &mut list_state,
            );
        }
    }

    area
}
