use std::time::Duration;

use ratatui::{
    DefaultTerminal, Frame, Terminal,
    backend::Backend,
    crossterm::event::{self, Event, KeyEventKind},
    layout::{Constraint, Layout},
};
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};

use crate::{
    handlers::Desk,
    types::{AppState, LogMessage, MessageStore, SharedState},
    ui::{
        self,
        events::{Signal, handle_events},
    },
};

/// How long the loop waits for a key before checking for redraw requests.
const INPUT_POLL: Duration = Duration::from_millis(100);

pub async fn run_terminal(
    mut terminal: DefaultTerminal,
    desk: Desk,
    log_rx: UnboundedReceiver<LogMessage>,
) -> color_eyre::Result<()> {
    let log_task = spawn_log_task(desk.clone(), log_rx);

    let result = event_loop(&mut terminal, &desk).await;

    log_task.abort();
    // Stops the poll task of whatever session is still open.
    desk.close_session().await;
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, desk: &Desk) -> color_eyre::Result<()> {
    loop {
        if desk.ctx.redraw.take() {
            draw(terminal, &desk.state).await?;
        }

        if !event::poll(INPUT_POLL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(Signal::Quit) = handle_events(desk, key).await {
                    return Ok(());
                }
            }
            Event::Resize(_, _) => desk.ctx.redraw.request(),
            _ => (),
        }
    }
}

/// Shows incoming notifications on the status line and hides each one after
/// its delay, unless a newer one replaced it in the meantime.
fn spawn_log_task(desk: Desk, mut log_rx: UnboundedReceiver<LogMessage>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = log_rx.recv().await {
            let hide_after = message.hide_after;
            let seq = desk.state.lock().await.show_log(message);
            desk.ctx.redraw.request();

            if hide_after > Duration::ZERO {
                let desk = desk.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(hide_after).await;
                    desk.state.lock().await.hide_log(seq);
                    desk.ctx.redraw.request();
                });
            }
        }
    })
}

/// Draws one frame from the current state: app state first, then the open
/// session's message store.
pub async fn draw<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &SharedState,
) -> color_eyre::Result<()> {
    let mut app = state.lock().await;
    let store = app.detail.as_ref().map(|view| view.store.clone());
    let store = match &store {
        Some(store) => Some(store.lock().await),
        None => None,
    };

    terminal.draw(|frame| draw_frame(frame, &mut app, store.as_deref()))?;
    Ok(())
}

fn draw_frame(frame: &mut Frame, app: &mut AppState, store: Option<&MessageStore>) {
    let layout = Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]);
    let [side_panel, main_panel] = layout.areas(frame.area());

    ui::side_pan::render_side_panel(frame, side_panel, app);
    ui::main_pan::render_main_panel(frame, main_panel, app, store);

    if app.products.visible {
        ui::product_pan::render_product_panel(frame, main_panel, app);
    }
}
