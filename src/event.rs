use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::state::app_state::FocusPanel;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(next) = reader.next().await {
                let event = match next {
                    // Windows reports releases too
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                    Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!(error = %e, "terminal event stream failed");
                        break;
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// All context needed to map a key event to an action.
pub struct KeyContext {
    pub focus: FocusPanel,
    pub commit_dialog_open: bool,
}

/// Map a key event to an action based on current app context.
pub fn map_key_to_action(key: KeyEvent, ctx: &KeyContext) -> Option<Action> {
    // Ctrl-C always quits, even inside the commit dialog
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if ctx.commit_dialog_open {
        return match key.code {
            KeyCode::Esc => Some(Action::CancelCommit),
            KeyCode::Enter => Some(Action::ConfirmCommit),
            KeyCode::Backspace => Some(Action::CommitBackspace),
            KeyCode::Char(c) => Some(Action::CommitChar(c)),
            _ => None,
        };
    }

    // Global bindings
    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Tab => return Some(Action::ToggleFocus),
        KeyCode::Char('R') => return Some(Action::RefreshDiff),
        KeyCode::Char('c') => return Some(Action::OpenCommitDialog),
        KeyCode::Char('a') => return Some(Action::SelectAllRows),
        KeyCode::Char('n') => return Some(Action::SelectNoRows),
        _ => {}
    }

    match ctx.focus {
        FocusPanel::Navigator => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigatorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigatorDown),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => Some(Action::FocusDiffView),
            _ => None,
        },
        FocusPanel::DiffView => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
            KeyCode::PageUp => Some(Action::ScrollPageUp),
            KeyCode::PageDown => Some(Action::ScrollPageDown),
            KeyCode::Char(' ') => Some(Action::ToggleRow),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Esc => Some(Action::FocusNavigator),
            _ => None,
        },
    }
}
