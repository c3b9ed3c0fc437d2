//! Terminal events and the crossterm polling task

use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Raw event from crossterm before processing
#[derive(Debug)]
pub enum RawEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Events delivered to components
#[derive(Debug, Clone)]
pub enum EventKind {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Scroll wheel with position and delta (+1 down, -1 up)
    Scroll { column: u16, row: u16, delta: isize },
    Resize(u16, u16),
    Tick,
}

impl EventKind {
    /// Events every component sees regardless of focus (quit keys, resize)
    pub fn is_global(&self) -> bool {
        match self {
            EventKind::Key(key) => {
                key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            }
            EventKind::Resize(_, _) => true,
            _ => false,
        }
    }

    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            EventKind::Key(key) => Some(key),
            _ => None,
        }
    }
}

/// Spawn the event polling task with cancellation support
///
/// Polls crossterm in batches and forwards key, mouse and resize events.
/// On cancellation the crossterm buffer is drained so no stray input leaks
/// into the shell after the TUI exits.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut processed = 0;
                    while processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        processed += 1;
                        let raw = match event::read() {
                            Ok(event::Event::Key(key)) => RawEvent::Key(key),
                            Ok(event::Event::Mouse(mouse)) => RawEvent::Mouse(mouse),
                            Ok(event::Event::Resize(w, h)) => RawEvent::Resize(w, h),
                            _ => continue,
                        };
                        if tx.send(raw).is_err() {
                            debug!("Event channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}

/// Process a raw event into an [`EventKind`]
pub fn process_raw_event(raw: RawEvent) -> EventKind {
    match raw {
        RawEvent::Key(key) => EventKind::Key(key),
        RawEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: 1,
            },
            MouseEventKind::ScrollUp => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: -1,
            },
            _ => EventKind::Mouse(mouse),
        },
        RawEvent::Resize(w, h) => EventKind::Resize(w, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_process_raw_event_key() {
        let kind = process_raw_event(RawEvent::Key(key(KeyCode::Char('a'), KeyModifiers::NONE)));
        assert!(matches!(kind, EventKind::Key(_)));
        assert_eq!(kind.as_key().map(|k| k.code), Some(KeyCode::Char('a')));
    }

    #[test]
    fn test_process_raw_event_scroll() {
        let scroll_up = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 10,
            row: 20,
            modifiers: KeyModifiers::NONE,
        };

        match process_raw_event(RawEvent::Mouse(scroll_up)) {
            EventKind::Scroll { column, row, delta } => {
                assert_eq!((column, row, delta), (10, 20, -1));
            }
            other => panic!("Expected Scroll event, got {other:?}"),
        }
    }

    #[test]
    fn test_global_events() {
        let ctrl_c = EventKind::Key(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let plain_c = EventKind::Key(key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(ctrl_c.is_global());
        assert!(!plain_c.is_global());
        assert!(EventKind::Resize(80, 24).is_global());
        assert!(!EventKind::Tick.is_global());
    }
}
