use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{error, info};

use crate::api::{AskError, BlipClient};
use crate::tui::AppEvent;
use crate::typing;

pub const WELCOME: &str =
    "😾 *stretches* Meow! I'm BLIP, your grumpy Solana memecoin oracle. What do you want to know? 🙄";
pub const APOLOGY: &str =
    "❌ Sorry, there was an error processing your question. Please try again.";
pub const PROCESSING_LABEL: &str = "😾 Processing...";

/// How long the typing indicator lingers after a reply arrives, so the
/// word-by-word animation is visibly under way before it disappears.
const INDICATOR_LINGER: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One chat bubble. `content` holds the full text from the moment the
/// message is appended; `revealed` is the byte length of the prefix the
/// typing animation has shown so far. Messages are append-only and never
/// mutated once fully revealed.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub revealed: usize,
}

impl ChatMessage {
    pub fn visible_text(&self) -> &str {
        self.content.get(..self.revealed).unwrap_or(&self.content)
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed >= self.content.len()
    }
}

pub struct ChatApp {
    pub should_quit: bool,

    // Session state: at most one request in flight, ever
    pub is_processing: bool,
    pub is_initialized: bool,

    // Display surface content
    pub messages: Vec<ChatMessage>,

    // The predefined question control
    pub question: String,
    pub button_label: String,
    pub button_enabled: bool,

    // Typing indicator
    pub indicator_visible: bool,
    pub indicator_frame: u8, // 0-2 for ellipsis animation
    indicator_hide_at: Option<Instant>,

    // Chat container scroll bookkeeping (updated during render)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    client: BlipClient,
    events: UnboundedSender<AppEvent>,
    ask_task: Option<JoinHandle<Result<String, AskError>>>,
}

impl ChatApp {
    pub fn new(client: BlipClient, question: String, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            is_processing: false,
            is_initialized: false,
            messages: Vec::new(),
            button_label: question.clone(),
            question,
            button_enabled: true,
            indicator_visible: false,
            indicator_frame: 0,
            indicator_hide_at: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            client,
            events,
            ask_task: None,
        }
    }

    /// Append the welcome message and arm the question control. Nothing here
    /// can fail hard; if it is never called the activation guard keeps the
    /// widget inert.
    pub fn initialize(&mut self) {
        self.push_assistant(WELCOME.to_string());
        self.is_initialized = true;
        info!("chat session initialized");
    }

    /// One press of the predefined question control. No-op while a request
    /// is outstanding or before initialization, which is what serializes
    /// turns: a second press cannot start a second turn.
    pub fn activate_question(&mut self) {
        if self.is_processing || !self.is_initialized {
            return;
        }

        self.button_enabled = false;
        self.button_label = PROCESSING_LABEL.to_string();

        self.push_user(self.question.clone());
        self.show_typing_indicator();
        self.is_processing = true;

        info!(question = %self.question, "asking BLIP");
        let client = self.client.clone();
        let question = self.question.clone();
        self.ask_task = Some(tokio::spawn(async move { client.ask(&question).await }));
    }

    /// Finish the turn once the in-flight request has resolved. Called from
    /// the main loop on every pass; does nothing while the task is pending.
    /// Whatever the outcome, the control always comes back enabled with its
    /// original label.
    pub async fn poll_ask_task(&mut self) {
        let finished = self
            .ask_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }
        let Some(task) = self.ask_task.take() else {
            return;
        };

        match task.await {
            Ok(Ok(answer)) => {
                self.push_assistant(answer);
                // Let the animation visibly start before the indicator goes
                self.indicator_hide_at = Some(Instant::now() + INDICATOR_LINGER);
            }
            Ok(Err(err)) => {
                error!("error processing predefined question: {err}");
                self.push_assistant(APOLOGY.to_string());
                self.hide_typing_indicator();
            }
            Err(err) => {
                error!("ask task failed to complete: {err}");
                self.push_assistant(APOLOGY.to_string());
                self.hide_typing_indicator();
            }
        }

        self.is_processing = false;
        self.button_enabled = true;
        self.button_label = self.question.clone();
    }

    /// User messages appear instantly, fully revealed.
    fn push_user(&mut self, content: String) {
        let revealed = content.len();
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content,
            revealed,
        });
        self.scroll_to_bottom();
    }

    /// Assistant messages start hidden and are revealed word by word by a
    /// typing animation bound to this message's index.
    fn push_assistant(&mut self, content: String) {
        let index = self.messages.len();
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: content.clone(),
            revealed: 0,
        });
        typing::spawn(index, content, self.events.clone());
        self.scroll_to_bottom();
    }

    /// Advance a message's revealed prefix by one animation shard. Shards
    /// always land on word boundaries, and the final shard's trailing space
    /// overshoots by one byte, so clamp to the content length.
    pub fn apply_typing_shard(&mut self, message: usize, shard: &str) {
        if let Some(msg) = self.messages.get_mut(message) {
            msg.revealed = (msg.revealed + shard.len()).min(msg.content.len());
        }
        self.scroll_to_bottom();
    }

    pub fn finish_typing(&mut self, message: usize) {
        if let Some(msg) = self.messages.get_mut(message) {
            msg.revealed = msg.content.len();
        }
    }

    pub fn show_typing_indicator(&mut self) {
        self.indicator_visible = true;
        self.indicator_hide_at = None;
        self.scroll_to_bottom();
    }

    pub fn hide_typing_indicator(&mut self) {
        self.indicator_visible = false;
        self.indicator_hide_at = None;
    }

    /// Tick animation frame and apply a due deferred indicator hide.
    pub fn on_tick(&mut self) {
        if self.indicator_visible {
            self.indicator_frame = (self.indicator_frame + 1) % 3;
        }
        if let Some(hide_at) = self.indicator_hide_at {
            if Instant::now() >= hide_at {
                self.hide_typing_indicator();
            }
        }
    }

    // Manual scrolling
    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1).min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    /// Keep the newest content in view after every append and shard.
    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self.max_scroll();
    }

    fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.total_chat_lines().saturating_sub(visible_height)
    }

    /// Wrap-aware line count of the rendered chat, mirroring the layout in
    /// `ui::render_chat`: one sender line per message, the wrapped visible
    /// text, a blank separator, plus the indicator when shown.
    fn total_chat_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.messages {
            total_lines += 1; // sender line ("👤 You" or "😾 BLIP")
            for line in msg.visible_text().lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // blank line after message
        }

        if self.indicator_visible {
            total_lines += 1; // "😾 BLIP is typing..."
        }

        total_lines
    }
}
