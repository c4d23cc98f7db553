use crate::core::{QueryEngine, TranscriptService, extract_video_id};
use crate::error::{Error, Result};
use crate::tui::components::{ChatView, InputField};
use crate::tui::events::AppEvent;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Waiting for a video URL.
    Setup,
    /// Transcript fetch running in the background.
    Processing { video_id: String },
    /// A session is live; questions are accepted.
    Chat,
}

/// One question/answer pair, kept only for on-screen display. The log is
/// append-only and never sent back to the model.
pub struct Exchange {
    pub question: String,
    pub answer: String,
    pub failed: bool,
    pub at: DateTime<Local>,
}

/// Everything tied to one processed video. Constructed when a transcript
/// lands, replaced wholesale when a new video is processed.
pub struct ChatSession {
    pub video_id: String,
    pub engine: QueryEngine,
    pub exchanges: Vec<Exchange>,
}

impl ChatSession {
    fn new(video_id: String, engine: QueryEngine) -> Self {
        Self {
            video_id,
            engine,
            exchanges: Vec::new(),
        }
    }
}

/// Status line content, kept as a kind so the UI can color it.
pub enum Notice {
    Info(String),
    Error(String),
}

/// Results of background work, delivered over the channel and drained on
/// tick.
pub enum SessionEvent {
    TranscriptReady { video_id: String, transcript: String },
    TranscriptFailed(Error),
    Answer { question: String, result: Result<String> },
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,

    pub url_input: InputField,
    pub question_input: InputField,
    pub chat_view: ChatView,

    pub session: Option<ChatSession>,
    pub pending_question: Option<String>,
    pub notice: Option<Notice>,

    transcripts: TranscriptService,
    api_key: String,
    model: String,
    languages: Vec<String>,

    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl App {
    pub fn new(api_key: String, model: String, languages: Vec<String>) -> Result<Self> {
        let transcripts = TranscriptService::new()?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut url_input = InputField::new("Video URL", "https://www.youtube.com/watch?v=...");
        url_input.focused = true;

        Ok(Self {
            state: AppState::Setup,
            should_quit: false,

            url_input,
            question_input: InputField::new("Your question", "Ask about the video..."),
            chat_view: ChatView::new(),

            session: None,
            pending_question: None,
            notice: None,

            transcripts,
            api_key,
            model,
            languages,

            events_tx,
            events_rx,
        })
    }

    /// The model name shown in the chat header.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Pre-fill the URL field and start processing immediately. Used for a
    /// URL passed on the command line.
    pub fn submit_url(&mut self, url: &str) {
        self.url_input.value = url.to_string();
        self.url_input.cursor_to_end();
        self.process_url();
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => self.handle_tick(),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match &self.state {
            AppState::Setup => self.handle_setup_key(key),
            AppState::Processing { .. } => {}
            AppState::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Enter => {
                self.process_url();
            }
            _ => {
                self.url_input.handle_key(key);
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                // Back to the URL form. The current session stays around
                // until a new video replaces it.
                self.state = AppState::Setup;
                self.url_input.clear();
                self.url_input.focused = true;
                self.notice = None;
            }
            KeyCode::Enter => {
                self.submit_question();
            }
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown | KeyCode::End => {
                self.chat_view.handle_key(key);
            }
            _ => {
                self.question_input.handle_key(key);
            }
        }
    }

    fn process_url(&mut self) {
        if !self.url_input.is_valid() {
            return;
        }

        let Some(video_id) = extract_video_id(&self.url_input.value) else {
            self.notice = Some(Notice::Error(Error::InvalidUrl.to_string()));
            return;
        };

        self.notice = None;
        self.state = AppState::Processing {
            video_id: video_id.clone(),
        };

        let service = self.transcripts.clone();
        let languages = self.languages.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let language_refs: Vec<&str> = languages.iter().map(String::as_str).collect();
            let event = match service.fetch_text(&video_id, &language_refs).await {
                Ok(transcript) => SessionEvent::TranscriptReady {
                    video_id,
                    transcript,
                },
                Err(e) => SessionEvent::TranscriptFailed(e),
            };
            let _ = tx.send(event);
        });
    }

    fn submit_question(&mut self) {
        // One in-flight question at a time; the surface serializes actions.
        if self.pending_question.is_some() {
            return;
        }
        if !self.question_input.is_valid() {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        let question = self.question_input.value.trim().to_string();
        self.question_input.clear();
        self.question_input.focused = true;
        self.pending_question = Some(question.clone());
        self.chat_view.follow();

        let engine = session.engine.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = engine.query(&question).await;
            let _ = tx.send(SessionEvent::Answer { question, result });
        });
    }

    fn handle_tick(&mut self) {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }

        for event in events {
            match event {
                SessionEvent::TranscriptReady {
                    video_id,
                    transcript,
                } => self.open_session(video_id, &transcript),
                SessionEvent::TranscriptFailed(e) => {
                    self.state = AppState::Setup;
                    self.url_input.focused = true;
                    self.notice = Some(Notice::Error(e.to_string()));
                }
                SessionEvent::Answer { question, result } => {
                    self.record_answer(question, result);
                }
            }
        }
    }

    fn open_session(&mut self, video_id: String, transcript: &str) {
        match QueryEngine::new(transcript, Some(self.api_key.clone()), &self.model) {
            Ok(engine) => {
                let context_chars = engine.context().chars().count();
                self.session = Some(ChatSession::new(video_id, engine));
                self.pending_question = None;
                self.chat_view.reset();
                self.question_input.clear();
                self.question_input.focused = true;
                self.state = AppState::Chat;
                self.notice = Some(Notice::Info(format!(
                    "Transcript loaded ({context_chars} chars in context). Ask away."
                )));
            }
            Err(e) => {
                self.state = AppState::Setup;
                self.url_input.focused = true;
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    fn record_answer(&mut self, question: String, result: Result<String>) {
        self.pending_question = None;

        let Some(session) = &mut self.session else {
            return;
        };

        let (answer, failed) = match result {
            Ok(answer) => (answer, false),
            Err(e) => (e.to_string(), true),
        };

        session.exchanges.push(Exchange {
            question,
            answer,
            failed,
            at: Local::now(),
        });
        self.chat_view.follow();
    }
}
