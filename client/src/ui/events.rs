use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::MutexGuard;

use crate::{
    cmd::process_command,
    handlers::Desk,
    types::{AppState, EditorMode, Panels},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Quit,
}

/// Work a key press hands off to a background task once the state lock is
/// released.
enum Action {
    Open(String),
    Close,
    Send,
    Command(String),
    Search(String),
    Pick,
    OpenProducts,
    CloseProducts,
    Refresh,
}

pub async fn handle_events(desk: &Desk, key: KeyEvent) -> Option<Signal> {
    let action = {
        let app = desk.state.lock().await;

        let outcome = match app.mode {
            EditorMode::NORMAL => handle_normal_mode(key, app),
            EditorMode::INSERT => handle_insert_mode(key, app),
            EditorMode::COMMAND => handle_command_mode(key, app),
            EditorMode::SEARCH => handle_search_mode(key, app),
        };

        match outcome {
            Err(signal) => return Some(signal),
            Ok(action) => action,
        }
    };

    desk.ctx.redraw.request();

    if let Some(action) = action {
        let desk = desk.clone();
        tokio::spawn(async move { dispatch(&desk, action).await });
    }

    None
}

async fn dispatch(desk: &Desk, action: Action) {
    match action {
        Action::Open(session_id) => {
            desk.open_session(&session_id).await;
        }
        Action::Close => {
            desk.close_session().await;
        }
        Action::Send => {
            desk.send_message().await;
        }
        Action::Command(cmd) => process_command(desk, &cmd).await,
        Action::Search(term) => {
            desk.search_products(&term).await;
        }
        Action::Pick => {
            desk.select_product(None).await;
        }
        Action::OpenProducts => {
            desk.open_products().await;
        }
        Action::CloseProducts => desk.close_products().await,
        Action::Refresh => {
            desk.refresh_dashboard().await;
        }
    }
}

type Outcome = Result<Option<Action>, Signal>;

fn handle_normal_mode(key: KeyEvent, mut app: MutexGuard<'_, AppState>) -> Outcome {
    if key.modifiers == KeyModifiers::CONTROL {
        return match key.code {
            KeyCode::Char('c') => Err(Signal::Quit),
            _ => Ok(None),
        };
    }

    match key.code {
        KeyCode::Char('i') => {
            if app.detail.is_some() {
                app.switch_mode(EditorMode::INSERT);
                app.switch_panel(Panels::Main);
            }
        }
        KeyCode::Char('/') | KeyCode::Char(':') => app.switch_mode(EditorMode::COMMAND),
        KeyCode::Left | KeyCode::Char('h') => app.switch_panel(Panels::SideBar),
        KeyCode::Right | KeyCode::Char('l') => app.switch_panel(Panels::Main),
        KeyCode::Tab => {
            if app.active_panel == Panels::SideBar {
                app.dashboard.toggle_focus();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => match app.active_panel {
            Panels::Main => {
                if let Some(view) = app.detail.as_mut() {
                    view.auto_scroll = false;
                    view.message_state.select_next();
                }
            }
            Panels::SideBar => app.dashboard.focused().state.select_next(),
        },
        KeyCode::Up | KeyCode::Char('k') => match app.active_panel {
            Panels::Main => {
                if let Some(view) = app.detail.as_mut() {
                    view.auto_scroll = false;
                    view.message_state.select_previous();
                }
            }
            Panels::SideBar => app.dashboard.focused().state.select_previous(),
        },
        KeyCode::End | KeyCode::Char('g') => match app.active_panel {
            Panels::Main => {
                if let Some(view) = app.detail.as_mut() {
                    view.auto_scroll = true;
                    view.message_state.select_last();
                }
            }
            Panels::SideBar => app.dashboard.focused().state.select_last(),
        },
        KeyCode::Enter => {
            if app.active_panel == Panels::SideBar {
                let selected = app.dashboard.selected_session().map(|s| s.id.clone());
                return Ok(selected.map(Action::Open));
            }
        }
        KeyCode::Char('p') => return Ok(Some(Action::OpenProducts)),
        KeyCode::Char('x') => return Ok(Some(Action::Close)),
        KeyCode::Char('r') => return Ok(Some(Action::Refresh)),
        KeyCode::Esc => {
            if app.products.visible {
                return Ok(Some(Action::CloseProducts));
            }
        }
        _ => (),
    }

    Ok(None)
}

fn handle_insert_mode(key: KeyEvent, mut app: MutexGuard<'_, AppState>) -> Outcome {
    match key.code {
        KeyCode::Esc => {
            app.switch_mode(EditorMode::NORMAL);
            Ok(None)
        }
        KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => Err(Signal::Quit),
        KeyCode::Enter if key.modifiers == KeyModifiers::NONE => Ok(Some(Action::Send)),
        _ => {
            app.input.input(key);
            Ok(None)
        }
    }
}

fn handle_command_mode(key: KeyEvent, mut app: MutexGuard<'_, AppState>) -> Outcome {
    match key.code {
        KeyCode::Esc => {
            app.switch_mode(EditorMode::NORMAL);
            app.clear_input();
            Ok(None)
        }
        KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => Err(Signal::Quit),
        KeyCode::Enter => {
            let cmd = app.take_input().trim().to_string();
            app.switch_mode(EditorMode::NORMAL);

            match cmd.as_str() {
                "" => Ok(None),
                "q" | "quit" => Err(Signal::Quit),
                _ => Ok(Some(Action::Command(cmd))),
            }
        }
        _ => {
            app.input.input(key);
            Ok(None)
        }
    }
}

fn handle_search_mode(key: KeyEvent, mut app: MutexGuard<'_, AppState>) -> Outcome {
    match key.code {
        KeyCode::Esc => Ok(Some(Action::CloseProducts)),
        KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => Err(Signal::Quit),
        KeyCode::Enter => Ok(Some(Action::Search(app.input_text()))),
        KeyCode::Down => {
            app.products.list_state.select_next();
            Ok(None)
        }
        KeyCode::Up => {
            app.products.list_state.select_previous();
            Ok(None)
        }
        KeyCode::Tab => Ok(Some(Action::Pick)),
        _ => {
            app.input.input(key);
            Ok(None)
        }
    }
}
