//! Component trait for pure UI elements

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A UI element that renders from props and turns events into actions
///
/// - Props carry all read-only data needed to render, including focus.
/// - `handle_event` returns actions and never mutates application state.
/// - Purely visual state (scroll offset, cursor) may live in `&mut self`.
///
/// # Example
///
/// ```ignore
/// struct SearchBar;
///
/// struct SearchBarProps<'a> {
///     query: &'a str,
///     is_focused: bool,
/// }
///
/// impl Component<Action> for SearchBar {
///     type Props<'a> = SearchBarProps<'a>;
///
///     fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> impl IntoIterator<Item = Action> {
///         match event {
///             EventKind::Key(key) if props.is_focused => match key.code {
///                 KeyCode::Esc => Some(Action::SearchQueryChange(String::new())),
///                 _ => None,
///             },
///             _ => None,
///         }
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
///         frame.render_widget(Paragraph::new(props.query), area);
///     }
/// }
/// ```
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Handle an event and return actions to dispatch
    ///
    /// Returns anything iterable: `None`, `Some(action)` or a `Vec`.
    /// The default returns nothing (render-only components).
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    /// Render the component to the frame
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
