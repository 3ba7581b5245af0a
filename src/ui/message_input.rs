//! Composer field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::text_input::TextInputState;

use super::styles;

const PLACEHOLDER_TEXT: &str = "Press Tab to type a message...";
const NO_CHAT_TEXT: &str = "Open a conversation to start typing";
const PROMPT_SYMBOL: &str = "> ";

pub fn render_composer(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &TextInputState,
    is_focused: bool,
    has_open_chat: bool,
) {
    let border_style = if is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let paragraph = Paragraph::new(build_input_line(input, is_focused, has_open_chat)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if is_focused {
        let before_cursor: String = input.text().chars().take(input.cursor_position()).collect();
        let offset = (PROMPT_SYMBOL.width() + before_cursor.width()).min(u16::MAX as usize) as u16;
        let cursor_x = area.x.saturating_add(1).saturating_add(offset);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn build_input_line(
    input: &TextInputState,
    is_focused: bool,
    has_open_chat: bool,
) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL, styles::input_prompt_style());

    if !has_open_chat {
        return Line::from(vec![
            prompt,
            Span::styled(NO_CHAT_TEXT, styles::input_placeholder_style()),
        ]);
    }

    if input.is_empty() && !is_focused {
        return Line::from(vec![
            prompt,
            Span::styled(PLACEHOLDER_TEXT, styles::input_placeholder_style()),
        ]);
    }

    Line::from(vec![
        prompt,
        Span::styled(input.text().to_owned(), styles::input_text_style()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn shows_placeholder_when_empty_and_unfocused() {
        let line = build_input_line(&TextInputState::default(), false, true);

        assert!(line_text(&line).contains(PLACEHOLDER_TEXT));
    }

    #[test]
    fn shows_bare_prompt_when_focused_and_empty() {
        let line = build_input_line(&TextInputState::default(), true, true);

        assert_eq!(line_text(&line), PROMPT_SYMBOL);
    }

    #[test]
    fn shows_typed_text() {
        let mut input = TextInputState::default();
        input.insert_char('H');
        input.insert_char('i');

        let line = build_input_line(&input, false, true);

        assert_eq!(line_text(&line), "> Hi");
    }

    #[test]
    fn explains_missing_conversation() {
        let line = build_input_line(&TextInputState::default(), false, false);

        assert!(line_text(&line).contains(NO_CHAT_TEXT));
    }
}
