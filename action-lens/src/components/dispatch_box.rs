//! Modal for composing a synthetic action
//!
//! Two fields, type and payload. The payload is parsed as JSON on submit; a
//! blank payload sends `[]`.

use action_lens_components::{centered_rect, render_modal, ModalStyle, TextInput, TextInputProps};
use action_lens_core::inspect::InspectorStyle;
use action_lens_core::EventKind;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::state::DispatchField;

const MODAL_WIDTH: u16 = 64;
const MODAL_HEIGHT: u16 = 11;
const MODAL_BG: Color = Color::Rgb(30, 33, 46);

pub struct DispatchBoxProps<'a> {
    pub action_type: &'a str,
    pub payload: &'a str,
    pub field: DispatchField,
    pub is_connected: bool,
    /// Key hint for sending, e.g. `^S`
    pub send_hint: &'a str,
}

#[derive(Default)]
pub struct DispatchBox {
    type_input: TextInput,
    payload_input: TextInput,
}

impl DispatchBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put both cursors at the end of the current values
    pub fn open(&mut self, action_type: &str, payload: &str) {
        self.type_input.move_to_end(action_type);
        self.payload_input.move_to_end(payload);
    }

    fn type_props<'a>(value: &'a str, is_focused: bool) -> TextInputProps<'a, Action> {
        TextInputProps {
            value,
            placeholder: "todos/add",
            is_focused,
            title: Some("Type"),
            show_border: true,
            bg_color: Some(MODAL_BG),
            padding_x: 1,
            on_change: Action::DispatchTypeChange,
            on_submit: |_| Action::DispatchFieldToggle,
        }
    }

    fn payload_props<'a>(value: &'a str, is_focused: bool) -> TextInputProps<'a, Action> {
        TextInputProps {
            value,
            placeholder: r#"{"text": "milk"}"#,
            is_focused,
            title: Some("Payload (JSON)"),
            show_border: true,
            bg_color: Some(MODAL_BG),
            padding_x: 1,
            on_change: Action::DispatchPayloadChange,
            on_submit: |_| Action::DispatchSubmit,
        }
    }
}

impl Component<Action> for DispatchBox {
    type Props<'a> = DispatchBoxProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let actions: Vec<Action> = match props.field {
            DispatchField::Type => self
                .type_input
                .handle_event(event, Self::type_props(props.action_type, true))
                .into_iter()
                .collect(),
            DispatchField::Payload => self
                .payload_input
                .handle_event(event, Self::payload_props(props.payload, true))
                .into_iter()
                .collect(),
        };
        actions
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let style = InspectorStyle::default();
        let modal = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        render_modal(
            frame,
            modal,
            &ModalStyle::with_bg(MODAL_BG).dim(style.dim_factor),
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style.focused_border)
            .title(" Dispatch Action to the app ")
            .title_style(style.label_style);
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let [type_area, payload_area, _, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.type_input.render(
            frame,
            type_area,
            Self::type_props(props.action_type, props.field == DispatchField::Type),
        );
        self.payload_input.render(
            frame,
            payload_area,
            Self::payload_props(props.payload, props.field == DispatchField::Payload),
        );

        let hint = if props.is_connected {
            Line::from(vec![
                Span::styled(format!(" {} ", props.send_hint), style.key_style),
                Span::styled(" dispatch  ", style.label_style),
                Span::styled(" Tab ", style.key_style),
                Span::styled(" switch field  ", style.label_style),
                Span::styled(" Esc ", style.key_style),
                Span::styled(" close", style.label_style),
            ])
        } else {
            Line::from(Span::styled(
                " No client connected, nothing will be sent",
                Style::default().fg(Color::Rgb(236, 95, 103)),
            ))
        };
        frame.render_widget(Paragraph::new(hint), hint_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_lens_core::testing::{key, RenderHarness};

    fn props<'a>(action_type: &'a str, payload: &'a str, field: DispatchField) -> DispatchBoxProps<'a> {
        DispatchBoxProps {
            action_type,
            payload,
            field,
            is_connected: true,
            send_hint: "^S",
        }
    }

    fn press(dispatch: &mut DispatchBox, k: &str, p: DispatchBoxProps<'_>) -> Vec<Action> {
        dispatch
            .handle_event(&EventKind::Key(key(k)), p)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut dispatch = DispatchBox::new();
        dispatch.open("todos", "");

        assert_eq!(
            press(&mut dispatch, "/", props("todos", "", DispatchField::Type)),
            vec![Action::DispatchTypeChange("todos/".into())]
        );
        assert_eq!(
            press(&mut dispatch, "1", props("todos", "", DispatchField::Payload)),
            vec![Action::DispatchPayloadChange("1".into())]
        );
    }

    #[test]
    fn test_enter_moves_then_submits() {
        let mut dispatch = DispatchBox::new();
        assert_eq!(
            press(&mut dispatch, "enter", props("a", "", DispatchField::Type)),
            vec![Action::DispatchFieldToggle]
        );
        assert_eq!(
            press(&mut dispatch, "enter", props("a", "1", DispatchField::Payload)),
            vec![Action::DispatchSubmit]
        );
    }

    #[test]
    fn test_render() {
        let mut render = RenderHarness::new(80, 24);
        let mut dispatch = DispatchBox::new();
        let output = render.render_to_string_plain(|frame| {
            dispatch.render(
                frame,
                frame.area(),
                props("todos/add", r#"{"text":"milk"}"#, DispatchField::Payload),
            );
        });

        assert!(output.contains("Dispatch Action to the app"));
        assert!(output.contains("todos/add"));
        assert!(output.contains(r#"{"text":"milk"}"#));
        assert!(output.contains("dispatch"));
    }

    #[test]
    fn test_render_disconnected_warning() {
        let mut render = RenderHarness::new(80, 24);
        let mut dispatch = DispatchBox::new();
        let output = render.render_to_string_plain(|frame| {
            let props = DispatchBoxProps {
                is_connected: false,
                ..props("", "", DispatchField::Type)
            };
            dispatch.render(frame, frame.area(), props);
        });

        assert!(output.contains("No client connected"));
    }
}
