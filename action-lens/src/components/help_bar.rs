use action_lens_core::inspect::{BannerItem, HelpBanner, InspectorStyle};
use action_lens_core::{format_key_for_display, InspectorContext, Keybindings, PanelFlags};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    Frame,
};

use super::Component;
use crate::action::Action;

const CONNECTED: Style = Style::new().fg(ratatui::style::Color::Rgb(80, 220, 120));

pub struct HelpBarProps<'a> {
    pub focus: InspectorContext,
    pub keybindings: &'a Keybindings<InspectorContext>,
    pub panels: PanelFlags,
    /// Peer address of the connected host
    pub host: Option<&'a str>,
    /// Shown while no host is connected
    pub idle_label: &'a str,
    pub following: bool,
}

pub struct HelpBar;

/// Commands advertised in each context, with their labels
fn hints(focus: InspectorContext, panels: PanelFlags) -> Vec<(&'static str, &'static str)> {
    let mut hints = match focus {
        InspectorContext::Table => vec![
            ("search.open", "search"),
            ("dispatch.open", "dispatch"),
            ("table.follow", "follow"),
            ("clear", "clear"),
            ("copy", "copy"),
            ("focus.next", "details"),
            ("quit", "quit"),
        ],
        InspectorContext::Sidebar => vec![
            ("sidebar.tab", "diff/tree"),
            ("filter.open", "filter keys"),
            ("dispatch.open", "dispatch"),
            ("copy", "copy"),
            ("focus.next", "actions"),
            ("quit", "quit"),
        ],
        InspectorContext::Search => vec![("search.close", "done"), ("search.clear", "clear")],
        InspectorContext::StateFilter => vec![("filter.close", "done"), ("filter.clear", "clear")],
        InspectorContext::Dispatch => vec![
            ("dispatch.send", "send"),
            ("dispatch.field", "next field"),
            ("dispatch.close", "close"),
        ],
    };

    hints.retain(|(command, _)| match *command {
        "search.open" => panels.contains(PanelFlags::SEARCH_BAR),
        "dispatch.open" => panels.contains(PanelFlags::DISPATCH_BOX),
        "table.follow" => panels.contains(PanelFlags::AUTO_SCROLL),
        "sidebar.tab" => panels.contains(PanelFlags::STATE_TABS),
        _ => true,
    });
    hints
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let style = InspectorStyle::default();

        let keys: Vec<(String, &'static str)> = hints(props.focus, props.panels)
            .into_iter()
            .filter_map(|(command, label)| {
                let key = props.keybindings.get_first_keybinding(command, props.focus)?;
                Some((format_key_for_display(&key), label))
            })
            .collect();

        let mut status = match props.host {
            Some(peer) => format!("● {peer}"),
            None => format!("○ {}", props.idle_label),
        };
        if props.following {
            status.push_str(" ⇣");
        }
        status.push(' ');
        let status_style = if props.host.is_some() {
            CONNECTED.add_modifier(Modifier::BOLD)
        } else {
            style.label_style
        };

        let banner = keys
            .iter()
            .fold(
                HelpBanner::new().title("action-lens").themed(&style),
                |banner, (key, label)| banner.item(BannerItem::new(key, label, style.key_style)),
            )
            .status(Span::styled(status, status_style));
        frame.render_widget(banner, area);
    }
}
