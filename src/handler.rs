use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::ChatApp;
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut ChatApp, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.on_tick(),
        AppEvent::TypingShard { message, shard } => app.apply_typing_shard(message, &shard),
        AppEvent::TypingDone { message } => app.finish_typing(message),
    }
    Ok(())
}

fn handle_key(app: &mut ChatApp, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        // The predefined question control
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_question(),

        // Chat container scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_to_bottom(),

        _ => {}
    }
}

fn handle_mouse(app: &mut ChatApp, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.scroll_down();
            app.scroll_down();
            app.scroll_down();
        }
        MouseEventKind::ScrollUp => {
            app.scroll_up();
            app.scroll_up();
            app.scroll_up();
        }
        _ => {}
    }
}
