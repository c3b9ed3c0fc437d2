//! Single-line text input
//!
//! Backs the search bar, the state filter and both dispatch-box fields.
//! The value lives in app state; the input only owns its cursor.

use action_lens_core::{Component, EventKind};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct TextInputProps<'a, A> {
    pub value: &'a str,
    /// Shown dimmed while the value is empty
    pub placeholder: &'a str,
    pub is_focused: bool,
    /// Border title; only drawn with `show_border`
    pub title: Option<&'a str>,
    pub show_border: bool,
    pub bg_color: Option<Color>,
    pub padding_x: u16,
    pub on_change: fn(String) -> A,
    pub on_submit: fn(String) -> A,
}

/// Text input with a cursor that scrolls horizontally for long values
#[derive(Default)]
pub struct TextInput {
    /// Byte index into the value
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the cursor after the last character.
    pub fn move_to_end(&mut self, value: &str) {
        self.cursor = value.len();
    }

    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.len());
        while !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn prev_boundary(&self, value: &str) -> usize {
        value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self, value: &str) -> usize {
        value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(value.len())
    }

    fn insert_char(&mut self, value: &str, c: char) -> String {
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..self.cursor]);
        new_value.push(c);
        new_value.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        new_value
    }

    fn delete_before(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let start = self.prev_boundary(value);
        let new_value = format!("{}{}", &value[..start], &value[self.cursor..]);
        self.cursor = start;
        Some(new_value)
    }

    fn delete_at(&self, value: &str) -> Option<String> {
        if self.cursor >= value.len() {
            return None;
        }
        let end = self.next_boundary(value);
        Some(format!("{}{}", &value[..self.cursor], &value[end..]))
    }

    /// Delete back to the start of the previous word (Ctrl+W)
    fn delete_word_before(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let head = value[..self.cursor].trim_end();
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let new_value = format!("{}{}", &value[..start], &value[self.cursor..]);
        self.cursor = start;
        Some(new_value)
    }

    /// Characters to skip so the cursor stays inside `width` columns
    fn scroll_chars(&self, value: &str, width: usize) -> usize {
        let before = value[..self.cursor].chars().count();
        if width == 0 {
            return before;
        }
        before.saturating_sub(width - 1)
    }
}

impl<A> Component<A> for TextInput {
    type Props<'a> = TextInputProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        self.clamp_cursor(props.value);
        let value = props.value;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = value.len();
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some((props.on_change)(String::new()))
                }
                KeyCode::Char('w') => self.delete_word_before(value).map(props.on_change),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some((props.on_change)(self.insert_char(value, c))),
            KeyCode::Backspace => self.delete_before(value).map(props.on_change),
            KeyCode::Delete => self.delete_at(value).map(props.on_change),
            KeyCode::Left => {
                self.cursor = self.prev_boundary(value);
                None
            }
            KeyCode::Right => {
                self.cursor = self.next_boundary(value);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = value.len();
                None
            }
            KeyCode::Enter => Some((props.on_submit)(value.to_string())),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.clamp_cursor(props.value);

        let mut style = Style::default();
        if let Some(bg) = props.bg_color {
            style = style.bg(bg);
            frame.buffer_mut().set_style(area, style);
        }

        let mut block = Block::default();
        if props.show_border {
            block = block
                .borders(Borders::ALL)
                .border_style(if props.is_focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                });
            if let Some(title) = props.title {
                block = block.title(format!(" {title} "));
            }
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_area = Rect {
            x: inner.x + props.padding_x.min(inner.width),
            width: inner.width.saturating_sub(props.padding_x * 2),
            ..inner
        };
        if text_area.width == 0 || text_area.height == 0 {
            return;
        }

        let width = text_area.width as usize;
        let (text, text_style) = if props.value.is_empty() {
            (props.placeholder.to_string(), style.fg(Color::DarkGray))
        } else {
            let skip = self.scroll_chars(props.value, width);
            (props.value.chars().skip(skip).collect(), style)
        };
        frame.render_widget(Paragraph::new(text).style(text_style), text_area);

        if props.is_focused {
            let before = props.value[..self.cursor].chars().count();
            let column = before - self.scroll_chars(props.value, width);
            frame.set_cursor_position((text_area.x + column as u16, text_area.y));
        }
    }
}
