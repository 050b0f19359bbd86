use rand::Rng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{sleep, Duration};

use crate::tui::AppEvent;

/// Reveal `text` word by word into the event loop, one shard per word with
/// its trailing space, pausing 50-150ms between words. Each pause yields to
/// the runtime, so the UI stays live while a reply "types". The animation is
/// bound to a message index and cannot be cancelled or restarted; a later
/// animation is a fresh task against its own message.
pub fn spawn(
    message: usize,
    text: String,
    events: UnboundedSender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for word in text.split(' ') {
            let shard = format!("{word} ");
            if events.send(AppEvent::TypingShard { message, shard }).is_err() {
                return;
            }
            let delay = rand::thread_rng().gen_range(50..150);
            sleep(Duration::from_millis(delay)).await;
        }
        let _ = events.send(AppEvent::TypingDone { message });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn reveals_every_word_with_trailing_space() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn(3, "a b c".to_string(), tx);

        let mut revealed = String::new();
        let mut done = false;
        while let Some(event) = rx.recv().await {
            match event {
                AppEvent::TypingShard { message, shard } => {
                    assert_eq!(message, 3);
                    revealed.push_str(&shard);
                }
                AppEvent::TypingDone { message } => {
                    assert_eq!(message, 3);
                    done = true;
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }

        assert!(done);
        assert_eq!(revealed, "a b c ");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_receiver_stops_the_animation() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn(0, "one two three".to_string(), tx);
        drop(rx);

        // The task bails out on the first failed send instead of sleeping
        // through the rest of the text.
        handle.await.unwrap();
    }
}
