//! Live page sessions.
//!
//! Each open page gets a session: a task that owns a [ViewController], feeds it
//! the store's change notifications and the page's commands, and streams the
//! rendered patches to the page as server-sent events.

use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_extra::extract::Form;
use futures::{StreamExt, stream::FuturesUnordered};
use serde::Deserialize;
use tokio::sync::{
    broadcast::{
        self,
        error::{RecvError, TryRecvError},
    },
    mpsc,
};

use crate::{
    AppState, Error,
    database_id::RecordId,
    store::{ChangeBatch, RecordStore, Subscription},
    view::{
        aggregation::ChartMode,
        controller::{ViewController, ViewInput, ViewUpdate, ViewVariant},
        render::render_update,
        render_diff::{Patch, diff_record_sets},
        sorting::SortRequest,
    },
};

/// Identifies one open page.
pub type SessionId = u64;

/// How many commands may wait for a session before senders have to wait.
const COMMAND_CAPACITY: usize = 16;
/// How many rendered patches may wait for the page before the session has to wait.
const PATCH_CAPACITY: usize = 32;

/// The name of the server-sent event that carries a patch.
pub const PATCH_EVENT: &str = "patch";

/// A request from the page to its session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    SelectMode(ChartMode),
    Sort(SortRequest),
}

impl From<ViewCommand> for ViewInput {
    fn from(command: ViewCommand) -> Self {
        match command {
            ViewCommand::SelectMode(mode) => ViewInput::SelectMode(mode),
            ViewCommand::Sort(request) => ViewInput::Sort(request),
        }
    }
}

/// The connected sessions and the channel for sending each one commands.
#[derive(Debug, Clone, Default)]
pub struct ViewSessions {
    next_id: Arc<AtomicU64>,
    senders: Arc<Mutex<HashMap<SessionId, mpsc::Sender<ViewCommand>>>>,
}

impl FromRef<AppState> for ViewSessions {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl ViewSessions {
    /// Reserve a new session ID for a page that is being rendered.
    pub fn allocate(&self) -> SessionId {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Route commands for `session_id` to `sender`, replacing any earlier connection.
    pub fn register(&self, session_id: SessionId, sender: mpsc::Sender<ViewCommand>) {
        self.senders().insert(session_id, sender);
    }

    /// Forget `session_id` if it is still connected through `sender`.
    ///
    /// A page that reconnects registers a new sender, which is left in place.
    pub fn unregister(&self, session_id: SessionId, sender: &mpsc::Sender<ViewCommand>) {
        let mut senders = self.senders();

        if senders
            .get(&session_id)
            .is_some_and(|current| current.same_channel(sender))
        {
            senders.remove(&session_id);
        }
    }

    /// Send `command` to a connected session.
    ///
    /// # Errors
    ///
    /// Returns [Error::SessionNotFound] if the session is not connected.
    pub async fn send(&self, session_id: SessionId, command: ViewCommand) -> Result<(), Error> {
        let sender = self
            .senders()
            .get(&session_id)
            .cloned()
            .ok_or(Error::SessionNotFound(session_id))?;

        sender
            .send(command)
            .await
            .map_err(|_| Error::SessionNotFound(session_id))
    }

    /// The number of connected sessions.
    pub fn len(&self) -> usize {
        self.senders().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn senders(&self) -> MutexGuard<'_, HashMap<SessionId, mpsc::Sender<ViewCommand>>> {
        // The map is valid after any panic, so a poisoned lock can be reused.
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The state needed to render pages and run their sessions.
#[derive(Debug, Clone)]
pub struct ViewSessionState {
    pub store: RecordStore,
    pub sessions: ViewSessions,
    /// How long a card plays its exit transition before it is removed.
    pub exit_transition: Duration,
}

impl FromRef<AppState> for ViewSessionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            sessions: state.sessions.clone(),
            exit_transition: state.exit_transition,
        }
    }
}

/// Start the session task for a page and return the receiver of its rendered patches.
///
/// The first patch draws the current state of the store. The session ends
/// when the receiver is dropped.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn start_session(
    state: &ViewSessionState,
    session_id: SessionId,
    variant: ViewVariant,
) -> Result<mpsc::Receiver<String>, Error> {
    let subscription = state.store.subscribe()?;
    let (command_sender, commands) = mpsc::channel(COMMAND_CAPACITY);
    let (patch_sender, patches) = mpsc::channel(PATCH_CAPACITY);

    state.sessions.register(session_id, command_sender.clone());
    tracing::debug!("Starting {variant} view session {session_id}");

    let session = Session {
        id: session_id,
        controller: ViewController::new(variant.capabilities()),
        store: state.store.clone(),
        sessions: state.sessions.clone(),
        exit_transition: state.exit_transition,
        registration: command_sender,
    };
    tokio::spawn(session.run(subscription, commands, patch_sender));

    Ok(patches)
}

struct Session {
    id: SessionId,
    controller: ViewController,
    store: RecordStore,
    sessions: ViewSessions,
    exit_transition: Duration,
    registration: mpsc::Sender<ViewCommand>,
}

impl Session {
    async fn run(
        mut self,
        subscription: Subscription,
        mut commands: mpsc::Receiver<ViewCommand>,
        patches: mpsc::Sender<String>,
    ) {
        let Subscription {
            records,
            deposit,
            events,
            mut receiver,
        } = subscription;
        let mut exits = FuturesUnordered::new();

        let mut update = self.controller.handle(ViewInput::Events(events));
        update.merge(self.controller.handle(ViewInput::Deposit(deposit)));
        update.merge(self.controller.handle(ViewInput::Records(records)));

        loop {
            for id in exiting_cards(&update) {
                exits.push(exit_timer(id, self.exit_transition));
            }

            if !update.is_empty() && patches.send(self.render(&update)).await.is_err() {
                break;
            }

            update = tokio::select! {
                event = receiver.recv() => match event {
                    Ok(event) => self.controller.handle(event.into()),
                    Err(RecvError::Lagged(skipped)) => {
                        let stale = discard_queued(&mut receiver);
                        tracing::warn!(
                            "View session {} missed {skipped} store notifications, \
                            dropped {stale} queued ones and is reloading",
                            self.id
                        );
                        self.resync()
                    }
                    Err(RecvError::Closed) => break,
                },
                Some(command) = commands.recv() => self.controller.handle(command.into()),
                Some(id) = exits.next(), if !exits.is_empty() => {
                    self.controller.handle(ViewInput::ExitFinished(id))
                }
                _ = patches.closed() => break,
            };
        }

        self.sessions.unregister(self.id, &self.registration);
        tracing::debug!("View session {} ended", self.id);
    }

    fn render(&self, update: &ViewUpdate) -> String {
        render_update(
            update,
            self.controller.capabilities(),
            &self.controller.state().events,
        )
        .into_string()
    }

    /// Bring the view up to date after missing notifications.
    fn resync(&mut self) -> ViewUpdate {
        let snapshot = self.store.records().and_then(|records| {
            Ok((records, self.store.deposit()?, self.store.events()?))
        });

        let (records, deposit, events) = match snapshot {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::error!("View session {} could not reload the store: {error}", self.id);
                return ViewUpdate::default();
            }
        };

        let changes = diff_record_sets(&self.controller.state().records, &records);
        let mut update = self.controller.handle(ViewInput::Events(events));
        update.merge(self.controller.handle(ViewInput::Deposit(deposit)));
        update.merge(
            self.controller
                .handle(ViewInput::Records(ChangeBatch { changes, records })),
        );

        update
    }
}

/// Drop every notification still queued in `receiver` and return how many there were.
///
/// After a reload the queued notifications are older than the reloaded state.
fn discard_queued<T: Clone>(receiver: &mut broadcast::Receiver<T>) -> usize {
    let mut discarded = 0;

    loop {
        match receiver.try_recv() {
            Ok(_) => discarded += 1,
            Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => return discarded,
        }
    }
}

fn exiting_cards(update: &ViewUpdate) -> Vec<RecordId> {
    update
        .cards
        .iter()
        .filter_map(|patch| match patch {
            Patch::BeginExit { record } => Some(record.id),
            _ => None,
        })
        .collect()
}

async fn exit_timer(id: RecordId, delay: Duration) -> RecordId {
    tokio::time::sleep(delay).await;
    id
}

fn patch_event(markup: &str) -> Event {
    // Server-sent event data cannot contain carriage returns.
    Event::default()
        .event(PATCH_EVENT)
        .data(markup.replace('\r', ""))
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub variant: ViewVariant,
}

/// The server-sent event stream for a page, which starts the page's session.
pub async fn view_events_endpoint(
    State(state): State<ViewSessionState>,
    Path(session_id): Path<SessionId>,
    Query(query): Query<SessionQuery>,
) -> Response {
    let patches = match start_session(&state, session_id, query.variant) {
        Ok(patches) => patches,
        Err(error) => {
            tracing::error!("Could not start view session {session_id}: {error}");
            return error.into_response();
        }
    };

    let stream = futures::stream::unfold(patches, |mut patches| async move {
        let markup = patches.recv().await?;
        Some((Ok::<_, Infallible>(patch_event(&markup)), patches))
    });

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ChartModeForm {
    pub mode: String,
}

/// Switch the chart of a page session to another mode.
pub async fn select_chart_mode_endpoint(
    State(sessions): State<ViewSessions>,
    Path(session_id): Path<SessionId>,
    Form(form): Form<ChartModeForm>,
) -> Response {
    let mode = match form.mode.parse::<ChartMode>() {
        Ok(mode) => mode,
        Err(error) => return error.into_alert_response(),
    };

    send_command(&sessions, session_id, ViewCommand::SelectMode(mode)).await
}

/// Sort the cards and table of a page session.
pub async fn sort_endpoint(
    State(sessions): State<ViewSessions>,
    Path(session_id): Path<SessionId>,
    Form(request): Form<SortRequest>,
) -> Response {
    send_command(&sessions, session_id, ViewCommand::Sort(request)).await
}

async fn send_command(
    sessions: &ViewSessions,
    session_id: SessionId,
    command: ViewCommand,
) -> Response {
    match sessions.send(session_id, command).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            tracing::warn!("Could not send {command:?} to view session {session_id}: {error}");
            error.into_alert_response()
        }
    }
}
