//! Chat state machine
//!
//! The transcript starts with a seeded assistant welcome. Each send appends
//! the user turn immediately, then the assistant reply once the responder
//! answers. `send` takes `&mut self`, so only one message is ever in flight.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use satlens_client::AnalysisBackend;
use satlens_core::error::Result;
use satlens_core::models::ChatMessage;
use std::sync::Arc;
use std::time::Duration;

pub const WELCOME_MESSAGE: &str = "Hello! I've analyzed your satellite image. Feel free to ask me any questions about what I found - land use, vegetation, water bodies, or anything else you'd like to know!";

/// Suggested questions offered next to the chat
pub const SAMPLE_QUESTIONS: [&str; 4] = [
    "What does this satellite image show?",
    "What's the vegetation health in this area?",
    "Are there any water bodies visible?",
    "What land use patterns can you identify?",
];

/// Canned replies used in demo mode
pub const DEMO_RESPONSES: [&str; 4] = [
    "This satellite image shows a mixed landscape with approximately 60% vegetation coverage, 25% developed land, and 15% water features. The vegetation appears healthy with strong NDVI values indicating active photosynthesis.",
    "The vegetation health in this area appears excellent, with NDVI values ranging from 0.6 to 0.8. The high chlorophyll content suggests well-irrigated cropland or dense forest coverage.",
    "Yes, I can identify several water bodies including what appears to be a river system running north-south through the image, and two smaller ponds or reservoirs in the eastern section.",
    "The land use patterns show a well-organized agricultural area with rectangular field boundaries, indicating intensive farming. There's also urban development concentrated in the western portion with a clear road network.",
];

/// Image id sent when the chat is not tied to an analysis
pub const DEFAULT_IMAGE_ID: &str = "default";

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// Produces assistant replies
#[async_trait]
pub trait Responder: Send {
    /// Answer `message`, given the transcript that preceded it
    async fn respond(&mut self, message: &str, history: &[ChatMessage]) -> Result<String>;
}

/// Picks a canned reply at random after a fixed delay
pub struct DemoResponder {
    delay: Duration,
    responses: Vec<String>,
    rng: StdRng,
}

impl DemoResponder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            responses: DEMO_RESPONSES.iter().map(|r| r.to_string()).collect(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the candidate replies; an empty list keeps the defaults
    pub fn with_responses(mut self, responses: Vec<String>) -> Self {
        if !responses.is_empty() {
            self.responses = responses;
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

impl Default for DemoResponder {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}

#[async_trait]
impl Responder for DemoResponder {
    async fn respond(&mut self, _message: &str, _history: &[ChatMessage]) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.responses.choose(&mut self.rng).cloned().unwrap_or_default())
    }
}

/// Forwards questions to the backend chat endpoint
pub struct LiveResponder {
    backend: Arc<dyn AnalysisBackend>,
    image_id: String,
}

impl LiveResponder {
    pub fn new(backend: Arc<dyn AnalysisBackend>, image_id: Option<String>) -> Self {
        Self {
            backend,
            image_id: image_id.unwrap_or_else(|| DEFAULT_IMAGE_ID.to_string()),
        }
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }
}

#[async_trait]
impl Responder for LiveResponder {
    async fn respond(&mut self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let response = self.backend.chat_with_image(&self.image_id, message, history).await?;
        tracing::debug!(confidence = response.confidence, "Chat reply received");
        Ok(response.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Waiting,
}

pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    state: ChatState,
    error: Option<String>,
    welcome: String,
    responder: Box<dyn Responder>,
}

impl ChatSession {
    /// New session seeded with the default welcome message
    pub fn new(responder: Box<dyn Responder>) -> Self {
        let mut session = Self {
            transcript: Vec::new(),
            state: ChatState::Idle,
            error: None,
            welcome: WELCOME_MESSAGE.to_string(),
            responder,
        };
        session.reset();
        session
    }

    pub fn demo(delay: Duration) -> Self {
        Self::new(Box::new(DemoResponder::new(delay)))
    }

    pub fn live(backend: Arc<dyn AnalysisBackend>, image_id: Option<String>) -> Self {
        Self::new(Box::new(LiveResponder::new(backend, image_id)))
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Send a message and wait for the reply.
    ///
    /// Blank input is ignored and yields `Ok(None)`. On a responder failure the
    /// user turn stays in the transcript, the error is recorded, and returned.
    pub async fn send(&mut self, content: &str) -> Result<Option<ChatMessage>> {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        self.transcript.push(ChatMessage::user(content));
        self.state = ChatState::Waiting;
        self.error = None;

        let history_len = self.transcript.len() - 1;
        let reply = self.responder.respond(content, &self.transcript[..history_len]).await;
        self.state = ChatState::Idle;

        match reply {
            Ok(text) => {
                let message = ChatMessage::assistant(text);
                self.transcript.push(message.clone());
                Ok(Some(message))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Restore the transcript to the seeded welcome message
    pub fn reset(&mut self) {
        self.transcript = vec![ChatMessage::assistant(self.welcome.clone())];
        self.state = ChatState::Idle;
        self.error = None;
    }

    /// Empty the transcript entirely
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.state = ChatState::Idle;
        self.error = None;
    }

    /// Seed the transcript with `welcome`, or the default greeting
    pub fn initialize(&mut self, welcome: Option<&str>) {
        self.welcome = welcome.unwrap_or(WELCOME_MESSAGE).to_string();
        self.reset();
    }
}
