//! Sidebar projection: two sections (direct, groups) in fetch order.

use ratatui::{
    text::{Line, Span},
    widgets::ListItem,
};

use crate::domain::{
    conversation::{Conversation, ConversationId, PresenceStatus},
    conversation_store::ConversationStore,
    shell_state::SidebarState,
};

use super::styles;

const DIRECT_TITLE: &str = "Direct Messages";
const GROUPS_TITLE: &str = "Groups";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRow {
    pub id: ConversationId,
    /// Presence of the counterpart; groups have none.
    pub indicator: Option<PresenceStatus>,
    pub name: String,
    /// Unread count, omitted when zero.
    pub badge: Option<u32>,
    pub active: bool,
    pub cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarRow {
    Header {
        title: &'static str,
        collapsed: bool,
        count: usize,
    },
    Conversation(ConversationRow),
}

pub fn build_sidebar_rows(
    store: &ConversationStore,
    sidebar: &SidebarState,
    active: Option<ConversationId>,
) -> Vec<SidebarRow> {
    let mut rows = Vec::new();

    push_section(
        &mut rows,
        DIRECT_TITLE,
        sidebar.direct_collapsed(),
        store.direct().collect(),
        sidebar.cursor(),
        active,
    );
    push_section(
        &mut rows,
        GROUPS_TITLE,
        sidebar.groups_collapsed(),
        store.groups().collect(),
        sidebar.cursor(),
        active,
    );

    rows
}

fn push_section(
    rows: &mut Vec<SidebarRow>,
    title: &'static str,
    collapsed: bool,
    conversations: Vec<&Conversation>,
    cursor: Option<ConversationId>,
    active: Option<ConversationId>,
) {
    rows.push(SidebarRow::Header {
        title,
        collapsed,
        count: conversations.len(),
    });

    if collapsed {
        return;
    }

    rows.extend(conversations.into_iter().map(|conversation| {
        SidebarRow::Conversation(ConversationRow {
            id: conversation.id,
            indicator: conversation.presence().cloned(),
            name: conversation.name.clone(),
            badge: (conversation.unread_count > 0).then_some(conversation.unread_count),
            active: active == Some(conversation.id),
            cursor: cursor == Some(conversation.id),
        })
    }));
}

/// Index of the cursor row within `rows`, for list highlighting.
pub fn cursor_row_index(rows: &[SidebarRow]) -> Option<usize> {
    rows.iter()
        .position(|row| matches!(row, SidebarRow::Conversation(row) if row.cursor))
}

pub fn row_to_list_item(row: &SidebarRow) -> ListItem<'static> {
    match row {
        SidebarRow::Header {
            title,
            collapsed,
            count,
        } => {
            let arrow = if *collapsed { ">" } else { "v" };
            ListItem::new(Line::from(Span::styled(
                format!("{arrow} {title} ({count})"),
                styles::section_header_style(),
            )))
        }
        SidebarRow::Conversation(row) => ListItem::new(conversation_line(row)),
    }
}

fn conversation_line(row: &ConversationRow) -> Line<'static> {
    let marker = if row.active { "> " } else { "  " };
    let mut spans = vec![Span::styled(marker, styles::active_marker_style())];

    match &row.indicator {
        Some(status) => spans.push(Span::styled("\u{25CF} ", styles::presence_style(status))),
        None => spans.push(Span::raw("# ")),
    }

    spans.push(Span::styled(row.name.clone(), styles::conversation_name_style()));

    if let Some(count) = row.badge {
        spans.push(Span::styled(format!(" [{count}]"), styles::unread_badge_style()));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{ConversationKind, UserId};

    fn direct(id: i64, name: &str, unread: u32) -> Conversation {
        Conversation {
            id: ConversationId(id),
            name: name.to_owned(),
            kind: ConversationKind::Direct {
                counterpart: UserId(id + 100),
                presence: PresenceStatus::Online,
            },
            unread_count: unread,
        }
    }

    fn group(id: i64, name: &str, unread: u32) -> Conversation {
        Conversation {
            id: ConversationId(id),
            name: name.to_owned(),
            kind: ConversationKind::Group,
            unread_count: unread,
        }
    }

    fn loaded(conversations: Vec<Conversation>) -> ConversationStore {
        let mut store = ConversationStore::default();
        store.load(conversations);
        store
    }

    fn conversation_rows(rows: &[SidebarRow]) -> Vec<&ConversationRow> {
        rows.iter()
            .filter_map(|row| match row {
                SidebarRow::Conversation(row) => Some(row),
                SidebarRow::Header { .. } => None,
            })
            .collect()
    }

    #[test]
    fn only_the_unread_direct_row_carries_a_badge() {
        let store = loaded(vec![direct(1, "bob", 2), group(2, "pond", 0)]);

        let rows = build_sidebar_rows(&store, &SidebarState::default(), None);
        let badges: Vec<_> = conversation_rows(&rows)
            .iter()
            .filter_map(|row| row.badge.map(|count| (row.id, count)))
            .collect();

        assert_eq!(badges, vec![(ConversationId(1), 2)]);
    }

    #[test]
    fn sections_keep_fetch_order_with_direct_first() {
        let store = loaded(vec![
            group(5, "zeta", 0),
            direct(3, "carol", 0),
            group(4, "alpha", 0),
            direct(1, "bob", 0),
        ]);

        let rows = build_sidebar_rows(&store, &SidebarState::default(), None);
        let names: Vec<_> = conversation_rows(&rows)
            .iter()
            .map(|row| row.name.as_str())
            .collect();

        assert_eq!(names, vec!["carol", "bob", "zeta", "alpha"]);
        assert!(matches!(
            rows[0],
            SidebarRow::Header {
                title: DIRECT_TITLE,
                count: 2,
                ..
            }
        ));
    }

    #[test]
    fn indicator_only_on_direct_rows() {
        let store = loaded(vec![direct(1, "bob", 0), group(2, "pond", 0)]);

        let rows = build_sidebar_rows(&store, &SidebarState::default(), None);
        let rows = conversation_rows(&rows);

        assert_eq!(rows[0].indicator, Some(PresenceStatus::Online));
        assert_eq!(rows[1].indicator, None);
    }

    #[test]
    fn active_and_cursor_markers_follow_state() {
        let store = loaded(vec![direct(1, "bob", 0), group(2, "pond", 0)]);
        let mut sidebar = SidebarState::default();
        sidebar.set_cursor(ConversationId(2));

        let rows = build_sidebar_rows(&store, &sidebar, Some(ConversationId(1)));

        let conversations = conversation_rows(&rows);
        assert!(conversations[0].active);
        assert!(!conversations[0].cursor);
        assert!(conversations[1].cursor);
        assert_eq!(cursor_row_index(&rows), Some(3));
    }

    #[test]
    fn collapsed_section_renders_only_its_header() {
        let store = loaded(vec![direct(1, "bob", 0), group(2, "pond", 0)]);
        let mut sidebar = SidebarState::default();
        sidebar.toggle_direct();

        let rows = build_sidebar_rows(&store, &sidebar, None);

        assert_eq!(rows.len(), 3);
        assert!(matches!(
            rows[0],
            SidebarRow::Header {
                collapsed: true,
                count: 1,
                ..
            }
        ));
    }
}
