//! Message list projection.
//!
//! Each message becomes a [`MessageRow`]: sent/received by comparing the
//! sender with the session identity, a relative timestamp, the sender name
//! on received messages, and a read label on sent ones.

use chrono::{DateTime, TimeZone};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::ListItem,
};

use crate::domain::{
    message::{Message, ReadState},
    session::SessionIdentity,
};

use super::{styles, timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub direction: Direction,
    /// Shown on received messages only.
    pub sender: Option<String>,
    pub timestamp: String,
    pub body: String,
    /// Shown on sent messages only.
    pub read_label: Option<String>,
}

pub fn build_message_rows<Tz>(
    messages: &[Message],
    session: SessionIdentity,
    now: &DateTime<Tz>,
) -> Vec<MessageRow>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    messages
        .iter()
        .map(|message| build_message_row(message, session, now))
        .collect()
}

fn build_message_row<Tz>(
    message: &Message,
    session: SessionIdentity,
    now: &DateTime<Tz>,
) -> MessageRow
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let timestamp = timestamp::format_relative(message.timestamp, now);

    if message.is_sent_by(session) {
        MessageRow {
            direction: Direction::Sent,
            sender: None,
            timestamp,
            body: message.body.clone(),
            read_label: Some(read_label(&message.read_state)),
        }
    } else {
        MessageRow {
            direction: Direction::Received,
            sender: Some(message.sender_name.clone()),
            timestamp,
            body: message.body.clone(),
            read_label: None,
        }
    }
}

pub fn read_label(state: &ReadState) -> String {
    match state {
        ReadState::Unread => "Sent".to_owned(),
        ReadState::Read => "Read".to_owned(),
        ReadState::ReadBy(reader) => format!("Read by {reader}"),
    }
}

/// Renders a row as a list item: header line, body lines, blank spacer.
/// Sent messages are right-aligned.
pub fn row_to_list_item(row: &MessageRow) -> ListItem<'static> {
    let alignment = match row.direction {
        Direction::Sent => Alignment::Right,
        Direction::Received => Alignment::Left,
    };
    let text_style = match row.direction {
        Direction::Sent => styles::sent_message_text_style(),
        Direction::Received => styles::message_text_style(),
    };

    let mut header = Vec::new();
    if let Some(sender) = &row.sender {
        header.push(Span::styled(sender.clone(), styles::message_sender_style()));
        header.push(Span::raw(" "));
    }
    header.push(Span::styled(row.timestamp.clone(), styles::message_time_style()));
    if let Some(label) = &row.read_label {
        header.push(Span::raw(" "));
        header.push(Span::styled(label.clone(), styles::read_label_style()));
    }

    let mut lines = vec![Line::from(header).alignment(alignment)];
    // `lines()` yields nothing for an empty body; keep one line.
    if row.body.is_empty() {
        lines.push(Line::default());
    }
    lines.extend(
        row.body
            .lines()
            .map(|text| Line::from(Span::styled(text.to_owned(), text_style)).alignment(alignment)),
    );
    lines.push(Line::default());

    ListItem::new(lines)
}
