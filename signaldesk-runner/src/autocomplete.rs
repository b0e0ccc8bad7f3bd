//! Autocomplete: a background search worker plus the controller that feeds it.
//!
//! Communication with the caller is via `mpsc` channels. Every query carries
//! a sequence number from a [`RequestSequencer`]; responses are applied only
//! when they answer the latest query, so a slow answer to an old prefix can
//! never overwrite the list for what the user typed since.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use signaldesk_core::data::SymbolSearch;
use signaldesk_core::symbols::Selection;
use signaldesk_core::{RequestSequencer, SearchCandidate, SuggestionBox, SuggestionEvent, SymbolMatcher};

/// Commands sent to the search worker.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCommand {
    Query { seq: u64, query: String },
    Shutdown,
}

/// Responses sent back from the search worker.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchReply {
    Results {
        seq: u64,
        candidates: Vec<SearchCandidate>,
    },
    Failed {
        seq: u64,
        error: String,
    },
}

impl SearchReply {
    pub fn seq(&self) -> u64 {
        match self {
            Self::Results { seq, .. } | Self::Failed { seq, .. } => *seq,
        }
    }
}

/// Spawn the background search thread.
pub fn spawn_search_worker(
    search: Arc<dyn SymbolSearch>,
    matcher: SymbolMatcher,
    rx: Receiver<SearchCommand>,
    tx: Sender<SearchReply>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("signaldesk-search".into())
        .spawn(move || worker_loop(search.as_ref(), &matcher, rx, tx))
}

fn worker_loop(
    search: &dyn SymbolSearch,
    matcher: &SymbolMatcher,
    rx: Receiver<SearchCommand>,
    tx: Sender<SearchReply>,
) {
    loop {
        match rx.recv() {
            Ok(SearchCommand::Shutdown) | Err(_) => break,
            Ok(SearchCommand::Query { seq, query }) => {
                let reply = match search.search(&query) {
                    Ok(raw) => SearchReply::Results {
                        seq,
                        candidates: matcher.filter_candidates(&query, &raw),
                    },
                    Err(e) => SearchReply::Failed {
                        seq,
                        error: e.to_string(),
                    },
                };
                if tx.send(reply).is_err() {
                    break;
                }
            }
        }
    }
}

/// Drives a [`SuggestionBox`] from user input and worker replies.
pub struct Autocomplete {
    commands: Sender<SearchCommand>,
    replies: Receiver<SearchReply>,
    sequencer: RequestSequencer,
    suggestions: SuggestionBox,
    answered: bool,
    stale_dropped: usize,
    handle: Option<JoinHandle<()>>,
}

impl Autocomplete {
    /// Start the worker and an empty, closed suggestion list.
    pub fn spawn(search: Arc<dyn SymbolSearch>, matcher: SymbolMatcher) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let handle = spawn_search_worker(search, matcher.clone(), cmd_rx, reply_tx)?;
        Ok(Self {
            commands: cmd_tx,
            replies: reply_rx,
            sequencer: RequestSequencer::new(),
            suggestions: SuggestionBox::new(matcher),
            answered: true,
            stale_dropped: 0,
            handle: Some(handle),
        })
    }

    pub fn suggestions(&self) -> &SuggestionBox {
        &self.suggestions
    }

    /// Replies discarded because a newer query had been issued.
    pub fn stale_dropped(&self) -> usize {
        self.stale_dropped
    }

    /// The search text changed.
    ///
    /// Every change takes a new sequence number, even when the text is too
    /// short to search, so replies to earlier text are ignored from now on.
    pub fn on_input(&mut self, query: &str) {
        let seq = self.sequencer.next();
        self.suggestions
            .apply(SuggestionEvent::QueryChanged(query.to_string()));

        if !self.suggestions.matcher().should_search(query) {
            self.answered = true;
            return;
        }
        self.answered = false;
        debug!(seq, query, "search issued");
        if self
            .commands
            .send(SearchCommand::Query {
                seq,
                query: query.to_string(),
            })
            .is_err()
        {
            warn!("search worker is gone");
            self.answered = true;
        }
    }

    /// Apply every reply that has already arrived. Returns how many were current.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(reply) = self.replies.try_recv() {
            if self.accept(reply) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until the latest query is answered or `timeout` passes.
    ///
    /// Returns whether the latest query was answered.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.answered {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.replies.recv_timeout(remaining) {
                Ok(reply) => {
                    self.accept(reply);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.answered
    }

    /// The user picked a suggestion.
    pub fn select(&mut self, index: usize) -> Option<Selection> {
        self.suggestions
            .apply(SuggestionEvent::CandidateSelected(index))
    }

    /// Focus left the search field.
    pub fn dismiss(&mut self) {
        self.suggestions.apply(SuggestionEvent::FocusLost);
    }

    fn accept(&mut self, reply: SearchReply) -> bool {
        if !self.sequencer.is_current(reply.seq()) {
            debug!(seq = reply.seq(), latest = self.sequencer.latest(), "stale search reply dropped");
            self.stale_dropped += 1;
            return false;
        }
        self.answered = true;
        match reply {
            SearchReply::Results { candidates, .. } => {
                self.suggestions
                    .apply(SuggestionEvent::ResultsArrived(candidates));
            }
            SearchReply::Failed { error, .. } => {
                warn!(error = %error, "symbol search failed");
                self.suggestions
                    .apply(SuggestionEvent::ResultsArrived(Vec::new()));
            }
        }
        true
    }
}

impl Drop for Autocomplete {
    fn drop(&mut self) {
        let _ = self.commands.send(SearchCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
