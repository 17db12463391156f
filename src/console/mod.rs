//! # Generation Console
//!
//! Client-side state for a generation session: the form, a single-fetch
//! gate, an injectable query cache, the append-only history and the current
//! selection.
//!
//! Every state change is an explicit method call. A generation is split into
//! [`Console::begin_generation`], which hands out a [`FetchTicket`] when a
//! proxy call is needed, and [`Console::complete_generation`], which applies
//! the outcome synchronously. [`Console::generate`] runs both around a
//! [`GenerationClient`].
//!
//! ```no_run
//! use fluxtogether::console::{Console, HttpGenerationClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpGenerationClient::new("http://127.0.0.1:3000", 120)?;
//! let mut console = Console::new();
//! console.form_mut().prompt = "a red fox".to_string();
//! console.generate(&client).await?;
//! console.download(std::path::Path::new("."))?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod download;
pub mod error;
pub mod form;
pub mod history;
pub mod notify;

pub use cache::{MemoryQueryCache, QueryCache};
pub use client::{ClientError, GenerationClient, HttpGenerationClient};
pub use error::ConsoleError;
pub use form::FormState;
pub use history::{Generation, History};
pub use notify::user_message;

use crate::api::types::{ImageConfig, ImageObject};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether a proxy call is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    /// Waiting on the proxy for this request
    Pending(ImageConfig),
}

/// Permission to perform exactly one proxy call.
///
/// Returned by [`Console::begin_generation`] and consumed by
/// [`Console::complete_generation`].
#[derive(Debug)]
pub struct FetchTicket {
    request: ImageConfig,
}

impl FetchTicket {
    pub fn request(&self) -> &ImageConfig {
        &self.request
    }
}

/// Why a generate request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    BlankPrompt,
    FetchInFlight,
}

/// Result of asking the console to start a generation.
#[derive(Debug)]
pub enum Trigger {
    /// A proxy call is required.
    Fetch(FetchTicket),
    /// Answered from the query cache; the entry at this index is selected.
    Cached(usize),
    Ignored(IgnoreReason),
}

/// Result of a full [`Console::generate`] round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// New result from the proxy, selected at this history index
    Generated(usize),
    /// Served from the query cache, selected at this history index
    Cached(usize),
    Ignored(IgnoreReason),
}

/// Clears a pending fetch if its future is dropped before completion.
struct PendingReset<'a, C: QueryCache> {
    console: &'a mut Console<C>,
}

impl<C: QueryCache> Drop for PendingReset<'_, C> {
    fn drop(&mut self) {
        if self.console.is_fetching() {
            debug!("Generation abandoned before completion");
            self.console.phase = FetchPhase::Idle;
        }
    }
}

/// Session state of the generation console.
pub struct Console<C: QueryCache = MemoryQueryCache> {
    form: FormState,
    phase: FetchPhase,
    cache: C,
    history: History,
    active_index: Option<usize>,
    enlarged: bool,
    last_error: Option<String>,
}

impl Console<MemoryQueryCache> {
    pub fn new() -> Self {
        Self::with_cache(MemoryQueryCache::new())
    }
}

impl Default for Console<MemoryQueryCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: QueryCache> Console<C> {
    /// Create a console that owns the given cache.
    pub fn with_cache(cache: C) -> Self {
        Self {
            form: FormState::default(),
            phase: FetchPhase::Idle,
            cache,
            history: History::new(),
            active_index: None,
            enlarged: false,
            last_error: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Edit form inputs. Edits never fire a request on their own.
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, FetchPhase::Pending(_))
    }

    /// True when a generate request would not be ignored.
    pub fn can_generate(&self) -> bool {
        !self.is_fetching() && self.form.has_prompt()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_generation(&self) -> Option<&Generation> {
        self.active_index.and_then(|i| self.history.get(i))
    }

    pub fn is_enlarged(&self) -> bool {
        self.enlarged
    }

    /// Message of the most recent failed generation, cleared by the next attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a generation from the current form.
    ///
    /// Ignored while a fetch is pending or when the prompt is blank. A request
    /// whose key is already cached completes immediately.
    pub fn begin_generation(&mut self) -> Trigger {
        if self.is_fetching() {
            debug!("Generate ignored, fetch already in flight");
            return Trigger::Ignored(IgnoreReason::FetchInFlight);
        }
        if !self.form.has_prompt() {
            debug!("Generate ignored, prompt is blank");
            return Trigger::Ignored(IgnoreReason::BlankPrompt);
        }

        self.last_error = None;
        let request = self.form.to_config();

        if let Some(result) = self.cache.get(&request) {
            debug!("Generation served from query cache");
            return Trigger::Cached(self.record(request, result));
        }

        self.phase = FetchPhase::Pending(request.clone());
        Trigger::Fetch(FetchTicket { request })
    }

    /// Apply the outcome of the proxy call for `ticket`.
    ///
    /// Success caches the result, appends it to history (unless that exact
    /// result object is already there) and selects it. Failure records a
    /// user-facing message and leaves history untouched. Either way the
    /// console is idle afterwards.
    pub fn complete_generation(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<ImageObject, ClientError>,
    ) -> Result<usize, ConsoleError> {
        match &self.phase {
            FetchPhase::Pending(pending) if *pending == ticket.request => {}
            _ => return Err(ConsoleError::StaleTicket),
        }
        self.phase = FetchPhase::Idle;

        match outcome {
            Ok(image) => {
                let result = Arc::new(image);
                self.cache
                    .insert(ticket.request.clone(), Arc::clone(&result));
                let index = self.record(ticket.request, result);
                info!(index, history_len = self.history.len(), "Generation added to history");
                Ok(index)
            }
            Err(e) => {
                let message = e.user_message();
                warn!(error = %message, "Generation failed");
                self.last_error = Some(message.clone());
                Err(ConsoleError::Generation(message))
            }
        }
    }

    /// Abandon the pending fetch for `ticket` without touching history.
    ///
    /// Returns `false` when `ticket` is not the pending fetch.
    pub fn cancel_generation(&mut self, ticket: FetchTicket) -> bool {
        match &self.phase {
            FetchPhase::Pending(pending) if *pending == ticket.request => {
                debug!("Pending generation cancelled");
                self.phase = FetchPhase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Begin, fetch through `client`, and complete one generation.
    ///
    /// Dropping the returned future mid-fetch leaves the console idle.
    pub async fn generate<G>(&mut self, client: &G) -> Result<GenerateOutcome, ConsoleError>
    where
        G: GenerationClient + ?Sized,
    {
        match self.begin_generation() {
            Trigger::Ignored(reason) => Ok(GenerateOutcome::Ignored(reason)),
            Trigger::Cached(index) => Ok(GenerateOutcome::Cached(index)),
            Trigger::Fetch(ticket) => {
                let guard = PendingReset { console: self };
                let outcome = client.generate(ticket.request()).await;
                let completed = guard.console.complete_generation(ticket, outcome);
                completed.map(GenerateOutcome::Generated)
            }
        }
    }

    /// Select a history entry and overwrite the form with its prompt and settings.
    pub fn select(&mut self, index: usize) -> Result<&Generation, ConsoleError> {
        let len = self.history.len();
        let generation = self
            .history
            .get(index)
            .ok_or(ConsoleError::InvalidSelection { index, len })?;

        self.form.load(generation);
        self.active_index = Some(index);
        Ok(generation)
    }

    /// Toggle the enlarged view of the selected image. No-op without a selection.
    pub fn toggle_enlarged(&mut self) -> bool {
        if self.active_generation().is_some() {
            self.enlarged = !self.enlarged;
        }
        self.enlarged
    }

    pub fn dismiss_enlarged(&mut self) {
        self.enlarged = false;
    }

    /// Decode the selected image and save it as a timestamped PNG in `dir`.
    pub fn download(&self, dir: &Path) -> Result<PathBuf, ConsoleError> {
        let generation = self.active_generation().ok_or(ConsoleError::NoActiveImage)?;
        let bytes = download::decode_image(&generation.result.b64_json)?;
        let path = download::save_image(dir, &bytes, Utc::now())?;

        info!(path = %path.display(), bytes = bytes.len(), "Image saved");
        Ok(path)
    }

    fn record(&mut self, request: ImageConfig, result: Arc<ImageObject>) -> usize {
        let index = match self.history.position_of(&result) {
            Some(existing) => existing,
            None => self.history.push(Generation {
                prompt: request.prompt,
                result,
                settings: request.settings,
            }),
        };

        if let Some(generation) = self.history.get(index) {
            self.form.load(generation);
        }
        self.active_index = Some(index);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ImageSettings, Timings};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn image(b64: &str) -> ImageObject {
        ImageObject {
            b64_json: b64.to_string(),
            timings: Some(Timings {
                inference: Some(0.5),
                extra: Default::default(),
            }),
            extra: Default::default(),
        }
    }

    /// Returns queued outcomes in order and counts calls.
    #[derive(Default)]
    struct ScriptedClient {
        outcomes: Mutex<VecDeque<Result<ImageObject, ClientError>>>,
        requests: Mutex<Vec<ImageConfig>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn with(outcomes: Vec<Result<ImageObject, ClientError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn generate(&self, request: &ImageConfig) -> Result<ImageObject, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected proxy call")
        }
    }

    fn console_with_prompt(prompt: &str) -> Console {
        let mut console = Console::new();
        console.form_mut().prompt = prompt.to_string();
        console
    }

    #[test]
    fn test_blank_prompt_is_ignored() {
        let mut console = console_with_prompt("   ");
        assert!(!console.can_generate());
        assert!(matches!(
            console.begin_generation(),
            Trigger::Ignored(IgnoreReason::BlankPrompt)
        ));
        assert!(!console.is_fetching());
    }

    #[test]
    fn test_second_trigger_while_pending_is_ignored() {
        let mut console = console_with_prompt("a red fox");

        let Trigger::Fetch(ticket) = console.begin_generation() else {
            panic!("expected a fetch");
        };
        assert!(console.is_fetching());
        assert!(matches!(
            console.begin_generation(),
            Trigger::Ignored(IgnoreReason::FetchInFlight)
        ));

        let index = console
            .complete_generation(ticket, Ok(image("AA==")))
            .unwrap();
        assert_eq!(index, 0);
        assert!(!console.is_fetching());
        assert!(console.can_generate());
    }

    #[tokio::test]
    async fn test_success_appends_and_selects() {
        let client = ScriptedClient::with(vec![Ok(image("AA=="))]);
        let mut console = console_with_prompt("a red fox");

        let outcome = console.generate(&client).await.unwrap();

        assert_eq!(outcome, GenerateOutcome::Generated(0));
        assert_eq!(console.history().len(), 1);
        assert_eq!(console.active_index(), Some(0));
        let entry = console.active_generation().unwrap();
        assert_eq!(entry.prompt, "a red fox");
        assert_eq!(entry.settings, ImageSettings::default());
        assert_eq!(
            client.requests.lock().unwrap()[0],
            ImageConfig {
                prompt: "a red fox".to_string(),
                settings: ImageSettings::default(),
            }
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_history_and_reports_message() {
        let client = ScriptedClient::with(vec![Err(ClientError::Rejected {
            status: 500,
            body: r#"{"error":"rate limited"}"#.to_string(),
        })]);
        let mut console = console_with_prompt("a red fox");

        let err = console.generate(&client).await.unwrap_err();

        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(console.last_error(), Some("rate limited"));
        assert!(console.history().is_empty());
        assert!(!console.is_fetching());
        assert!(console.can_generate());
    }

    #[tokio::test]
    async fn test_identical_request_is_served_from_cache() {
        let client = ScriptedClient::with(vec![Ok(image("AA=="))]);
        let mut console = console_with_prompt("a red fox");

        console.generate(&client).await.unwrap();
        let outcome = console.generate(&client).await.unwrap();

        assert_eq!(outcome, GenerateOutcome::Cached(0));
        assert_eq!(client.calls(), 1);
        assert_eq!(console.history().len(), 1);
        assert_eq!(console.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_changed_input_fetches_again() {
        let client = ScriptedClient::with(vec![Ok(image("AA==")), Ok(image("AB=="))]);
        let mut console = console_with_prompt("a red fox");

        console.generate(&client).await.unwrap();
        console.form_mut().steps = 4;
        assert_eq!(client.calls(), 1);

        let outcome = console.generate(&client).await.unwrap();
        assert_eq!(outcome, GenerateOutcome::Generated(1));
        assert_eq!(client.calls(), 2);
        assert_eq!(console.history().get(1).unwrap().settings.steps, 4);
    }

    #[tokio::test]
    async fn test_cached_result_reselects_existing_entry() {
        let client = ScriptedClient::with(vec![Ok(image("AA==")), Ok(image("AB=="))]);
        let mut console = console_with_prompt("first");
        console.generate(&client).await.unwrap();
        console.form_mut().prompt = "second".to_string();
        console.generate(&client).await.unwrap();

        console.form_mut().prompt = "first".to_string();
        let outcome = console.generate(&client).await.unwrap();

        assert_eq!(outcome, GenerateOutcome::Cached(0));
        assert_eq!(console.active_index(), Some(0));
        assert_eq!(console.history().len(), 2);
    }

    #[tokio::test]
    async fn test_select_restores_form() {
        let client = ScriptedClient::with(vec![Ok(image("AA==")), Ok(image("AB=="))]);
        let mut console = console_with_prompt("a red fox");
        console.form_mut().width = 512;
        console.form_mut().iterative_mode = true;
        console.generate(&client).await.unwrap();

        console.form_mut().prompt = "a blue whale".to_string();
        console.form_mut().width = 1024;
        console.form_mut().iterative_mode = false;
        console.generate(&client).await.unwrap();

        console.select(0).unwrap();
        let entry = console.history().get(0).unwrap().clone();
        assert_eq!(console.form().prompt, entry.prompt);
        assert_eq!(console.form().settings(), entry.settings);
        assert_eq!(console.form().width, 512);
        assert!(console.form().iterative_mode);
    }

    #[test]
    fn test_select_out_of_range_keeps_state() {
        let mut console = console_with_prompt("keep me");
        let err = console.select(3).unwrap_err();

        assert!(matches!(
            err,
            ConsoleError::InvalidSelection { index: 3, len: 0 }
        ));
        assert_eq!(console.active_index(), None);
        assert_eq!(console.form().prompt, "keep me");
    }

    #[test]
    fn test_cancel_generation_returns_to_idle() {
        let mut console = console_with_prompt("a red fox");
        let Trigger::Fetch(ticket) = console.begin_generation() else {
            panic!("expected a fetch");
        };
        assert!(console.is_fetching());

        let stale = FetchTicket {
            request: console_with_prompt("other").form().to_config(),
        };
        assert!(!console.cancel_generation(stale));
        assert!(console.is_fetching());

        assert!(console.cancel_generation(ticket));
        assert!(!console.is_fetching());
        assert!(console.history().is_empty());
        assert!(console.can_generate());
    }

    /// Never answers within a test's lifetime.
    struct StalledClient;

    #[async_trait]
    impl GenerationClient for StalledClient {
        async fn generate(&self, _request: &ImageConfig) -> Result<ImageObject, ClientError> {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Err(ClientError::Timeout(60))
        }
    }

    #[tokio::test]
    async fn test_dropped_generation_does_not_block_next_trigger() {
        let mut console = console_with_prompt("a red fox");

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            console.generate(&StalledClient),
        )
        .await;
        assert!(timed_out.is_err());
        assert!(!console.is_fetching());
        assert!(console.history().is_empty());

        console.form_mut().prompt = "a blue fox".to_string();
        let client = ScriptedClient::with(vec![Ok(image("AA=="))]);
        let outcome = console.generate(&client).await.unwrap();
        assert_eq!(outcome, GenerateOutcome::Generated(0));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut console = console_with_prompt("a red fox");
        let forged = FetchTicket {
            request: console.form().to_config(),
        };

        let err = console
            .complete_generation(forged, Ok(image("AA==")))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::StaleTicket));
        assert!(console.history().is_empty());
    }

    #[test]
    fn test_ticket_keeps_request_snapshot() {
        let mut console = console_with_prompt("a red fox");
        let Trigger::Fetch(ticket) = console.begin_generation() else {
            panic!("expected a fetch");
        };

        // Edits while pending do not change what gets recorded
        console.form_mut().prompt = "something else".to_string();
        console.form_mut().height = 1024;

        console
            .complete_generation(ticket, Ok(image("AA==")))
            .unwrap();
        let entry = console.history().get(0).unwrap();
        assert_eq!(entry.prompt, "a red fox");
        assert_eq!(entry.settings.height, 768);
        assert_eq!(console.form().prompt, "a red fox");
    }

    #[tokio::test]
    async fn test_history_never_shrinks() {
        let client = ScriptedClient::with(vec![
            Ok(image("AA==")),
            Err(ClientError::Network("down".to_string())),
            Ok(image("AB==")),
        ]);
        let mut console = console_with_prompt("p1");
        let mut last_len = 0;

        for prompt in ["p1", "p2", "p3", "p1"] {
            console.form_mut().prompt = prompt.to_string();
            let _ = console.generate(&client).await;
            let _ = console.select(0);
            assert!(console.history().len() >= last_len);
            last_len = console.history().len();
        }
        assert_eq!(last_len, 2);
    }

    #[tokio::test]
    async fn test_enlarge_requires_selection() {
        let mut console = console_with_prompt("a red fox");
        assert!(!console.toggle_enlarged());

        let client = ScriptedClient::with(vec![Ok(image("AA=="))]);
        console.generate(&client).await.unwrap();

        assert!(console.toggle_enlarged());
        assert!(!console.toggle_enlarged());
        assert!(console.toggle_enlarged());
        console.dismiss_enlarged();
        assert!(!console.is_enlarged());
    }

    #[tokio::test]
    async fn test_download_writes_decoded_png() {
        let temp = tempfile::tempdir().unwrap();
        let mut console = console_with_prompt("a red fox");
        assert!(matches!(
            console.download(temp.path()),
            Err(ConsoleError::NoActiveImage)
        ));

        let client = ScriptedClient::with(vec![Ok(image("iVBORw=="))]);
        console.generate(&client).await.unwrap();

        let path = console.download(temp.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("fluxtogether-"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_injected_cache_is_used() {
        let mut cache = MemoryQueryCache::new();
        let request = ImageConfig {
            prompt: "preloaded".to_string(),
            settings: ImageSettings::default(),
        };
        cache.insert(request, Arc::new(image("AA==")));

        let mut console = Console::with_cache(cache);
        console.form_mut().prompt = "preloaded".to_string();

        assert!(matches!(console.begin_generation(), Trigger::Cached(0)));
        assert_eq!(console.history().len(), 1);
        assert!(!console.is_fetching());
    }
}
