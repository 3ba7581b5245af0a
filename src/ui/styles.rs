//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{conversation::PresenceStatus, events::ConnectivityStatus};

// =============================================================================
// Panels
// =============================================================================

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn modal_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

// =============================================================================
// Sidebar styles
// =============================================================================

/// Style for conversation name (bold, bright).
pub fn conversation_name_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for unread count badge (green).
pub fn unread_badge_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Style for section headers like "v Direct Messages".
pub fn section_header_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn active_marker_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn cursor_row_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

pub fn presence_style(status: &PresenceStatus) -> Style {
    match status {
        PresenceStatus::Online => Style::default().fg(Color::Green),
        PresenceStatus::Offline => Style::default().fg(Color::DarkGray),
        PresenceStatus::Other(_) => Style::default().fg(Color::Yellow),
    }
}

// =============================================================================
// Message list styles
// =============================================================================

/// Style for message sender name (white, bold).
pub fn message_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn sent_message_text_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn read_label_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

// =============================================================================
// Composer and status bar
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn connectivity_style(status: ConnectivityStatus) -> Style {
    match status {
        ConnectivityStatus::Connected => Style::default().fg(Color::Green),
        ConnectivityStatus::Connecting => Style::default().fg(Color::Yellow),
        ConnectivityStatus::Disconnected => Style::default().fg(Color::Red),
    }
}

pub fn notice_style() -> Style {
    Style::default().fg(Color::Red)
}

pub fn toast_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
}

pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
