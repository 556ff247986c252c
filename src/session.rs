//! Search session: the single owner of query state
//!
//! A session is a tokio task that owns the [`QueryState`], the [`Debouncer`],
//! the backend and the location. Everything that changes state arrives as a
//! message and is handled one at a time, so no two updates ever interleave.
//!
//! # Workflow
//!
//! ```text
//! spawn()
//!     ↓
//! read location → seed params → initial fetch
//!     ↓
//! ┌─→ next message
//! │   ├─ SetText      → debounce → DebounceElapsed → fetch
//! │   ├─ SetTags/Page → fetch
//! │   ├─ Submit       → cancel debounce → fetch
//! │   ├─ Fetched      → QueryState::complete (stale tokens dropped)
//! │   └─ Shutdown / all handles dropped → cancel debounce → stop
//! └── publish ViewSnapshot
//! ```
//!
//! Every issued fetch rewrites the location with the parameters it was
//! issued for. Fetches run as their own tasks; a session that stops while a
//! fetch is in flight simply never applies its result.

use crate::client::{FetchError, SearchBackend};
use crate::debounce::{DEFAULT_DELAY, Debouncer};
use crate::location::{self, Location, LocationState};
use crate::query::{
    Completion, DEFAULT_PAGE_SIZE, QueryParams, QueryState, Refetch, RequestToken, SearchResult,
    check_pagination,
};
use crate::{Post, PostrError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Errors from talking to a session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session task has stopped
    #[error("Search session has shut down")]
    Closed,
}

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Records per page for the initial query
    pub page_size: u32,
    /// Delay before a text change triggers a fetch
    pub debounce: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DELAY,
        }
    }
}

/// Everything a view needs to draw the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub params: QueryParams,
    /// Records of the current page that pass the tag selection
    pub rows: Vec<Post>,
    /// Server-side total; may exceed what the tag filter leaves visible
    pub total: u64,
    pub tag_options: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub page_count: u64,
    pub completed_requests: u64,
}

impl ViewSnapshot {
    fn from_state(state: &QueryState) -> Self {
        Self {
            params: state.params().clone(),
            rows: state.visible_rows().into_iter().cloned().collect(),
            total: state.result().total,
            tag_options: state.tag_options().to_vec(),
            loading: state.loading(),
            error: state.error().map(str::to_string),
            page_count: state.page_count(),
            completed_requests: state.completed_requests(),
        }
    }
}

#[derive(Debug)]
enum Command {
    SetText(String),
    SetTags(Vec<String>),
    SetPage { page: u32, page_size: u32 },
    Submit,
    Shutdown,
}

#[derive(Debug)]
enum Event {
    DebounceElapsed(u64),
    Fetched {
        token: RequestToken,
        outcome: Result<SearchResult, FetchError>,
    },
}

/// Owner task state; see the module docs
pub struct SearchSession {
    state: QueryState,
    backend: Arc<dyn SearchBackend>,
    location: Box<dyn Location>,
    debouncer: Debouncer,
    debounce_seq: u64,
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Sender<ViewSnapshot>,
}

impl SearchSession {
    /// Start a session and return the handle that drives it
    ///
    /// The location is read once to seed the parameters, then the initial
    /// fetch is issued.
    ///
    /// # Errors
    ///
    /// Returns `PostrError::QueryError` if `settings.page_size` is zero.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<L>(
        backend: Arc<dyn SearchBackend>,
        settings: SessionSettings,
        location: L,
    ) -> Result<SearchHandle, PostrError>
    where
        L: Location + 'static,
    {
        let defaults = QueryParams::new(settings.page_size)?;
        let params = location::restore(&location.read(), &defaults);
        debug!(text = params.text(), page = params.page(), "Seeded session from location");

        let state = QueryState::new(params);
        let (snapshots, snapshot_rx) = watch::channel(ViewSnapshot::from_state(&state));
        let (events, event_rx) = mpsc::unbounded_channel();
        let (commands, command_rx) = mpsc::unbounded_channel();

        let session = Self {
            state,
            backend,
            location: Box::new(location),
            debouncer: Debouncer::new(settings.debounce),
            debounce_seq: 0,
            events,
            snapshots,
        };
        let task = tokio::spawn(session.run(command_rx, event_rx));

        Ok(SearchHandle {
            commands,
            snapshots: snapshot_rx,
            task,
        })
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
    ) {
        self.fetch_now();
        self.publish();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(event) = events.recv() => self.handle_event(event),
            }
            self.publish();
        }

        if self.debouncer.cancel() {
            debug!("Cancelled pending refetch on shutdown");
        }
        debug!("Search session stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let refetch = match command {
            Command::SetText(text) => self.state.set_text(text),
            Command::SetTags(tags) => self.state.set_tags(tags),
            Command::SetPage { page, page_size } => match self.state.set_page(page, page_size) {
                Ok(refetch) => refetch,
                Err(e) => {
                    debug!(error = %e, "Ignoring invalid page change");
                    return;
                }
            },
            Command::Submit => self.state.submit(),
            Command::Shutdown => return,
        };
        self.refetch(refetch);
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::DebounceElapsed(seq) if seq == self.debounce_seq => self.fetch_now(),
            Event::DebounceElapsed(seq) => {
                debug!(seq, current = self.debounce_seq, "Ignoring superseded debounce");
            }
            Event::Fetched { token, outcome } => match self.state.complete(token, outcome) {
                Completion::Applied => info!(
                    token = token.get(),
                    total = self.state.result().total,
                    records = self.state.result().records.len(),
                    "Search results applied"
                ),
                Completion::Failed | Completion::Stale => {}
            },
        }
    }

    fn refetch(&mut self, refetch: Refetch) {
        self.debounce_seq += 1;
        match refetch {
            Refetch::Debounced => {
                let seq = self.debounce_seq;
                let events = self.events.clone();
                self.debouncer.schedule(move || {
                    let _ = events.send(Event::DebounceElapsed(seq));
                });
            }
            Refetch::Immediate => {
                self.debouncer.cancel();
                self.fetch_now();
            }
        }
    }

    fn fetch_now(&mut self) {
        let (token, params) = self.state.begin_fetch();
        self.location
            .replace(LocationState::from_params(&params).to_query_string());
        info!(
            token = token.get(),
            text = params.text(),
            page = params.page(),
            page_size = params.page_size(),
            "Issuing search"
        );

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = backend.search(&params).await;
            let _ = events.send(Event::Fetched { token, outcome });
        });
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(ViewSnapshot::from_state(&self.state));
    }
}

/// Handle to a running [`SearchSession`]
///
/// Dropping the handle stops the session the same way [`SearchHandle::shutdown`]
/// does, without waiting for it.
#[derive(Debug)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<ViewSnapshot>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Closed)
    }

    /// Replace the search text; fetches after the debounce delay
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session has stopped.
    pub fn set_text(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::SetText(text.into()))
    }

    /// Replace the tag selection; fetches immediately
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session has stopped.
    pub fn set_tags<I, S>(&self, tags: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(Command::SetTags(tags.into_iter().map(Into::into).collect()))
    }

    /// Move to another page or page size; fetches immediately
    ///
    /// # Errors
    ///
    /// Returns `PostrError::QueryError` for a zero page or page size, or
    /// `PostrError::SessionError` if the session has stopped.
    pub fn set_page(&self, page: u32, page_size: u32) -> Result<(), PostrError> {
        check_pagination(page, page_size)?;
        self.send(Command::SetPage { page, page_size })?;
        Ok(())
    }

    /// Commit the current text and fetch page 1 now, skipping the debounce
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session has stopped.
    pub fn submit(&self) -> Result<(), SessionError> {
        self.send(Command::Submit)
    }

    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.clone()
    }

    /// Wait for the first snapshot satisfying `predicate`
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session stops first.
    pub async fn wait_until<F>(&self, predicate: F) -> Result<ViewSnapshot, SessionError>
    where
        F: FnMut(&ViewSnapshot) -> bool,
    {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(snapshot.clone())
    }

    /// Stop the session and wait for it to finish
    ///
    /// A pending debounced fetch is cancelled. Fetches already in flight are
    /// not aborted, but their results are never applied.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            debug!(error = %e, "Search session ended abnormally");
        }
    }
}
