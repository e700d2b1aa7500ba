//! Polling coordination
//!
//! A [`PollingCoordinator`] owns one session per device. Each session runs
//! its own tokio task: discover the Thing Description once, then poll every
//! catalog property on a fixed cadence with bounded fan-out, exponential
//! backoff when the device stops answering, and a last-known-value cache the
//! host reads between cycles.
//!
//! A device without a usable Thing Description still gets a session in
//! fallback mode: its base URL is polled as a single opaque property named
//! [`FALLBACK_PROPERTY`].

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::{
    sync::{watch, Mutex, Notify, RwLock},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    action::{ActionInvoker, ActionOutcome},
    config::{DeviceConfig, SessionConfig},
    error::Error,
    resolver::{looks_like_thing_description, resolve, ActionCatalog, PropertyDef, ThingDescription},
    thing::Method,
    transport::{Credential, HttpTransport, Transport, TransportRequest},
    value::{normalize, DeclaredType, PropertyValue},
};

/// Snapshot key used for sessions polling in fallback mode.
pub const FALLBACK_PROPERTY: &str = "state";

/// Coordinator-wide tuning, applied to every session unless the session's
/// own configuration overrides it.
#[derive(Clone, Copy, Debug)]
pub struct CoordinatorConfig {
    /// Default cadence between polling cycles.
    pub poll_interval: Duration,

    /// Time budget for each individual request.
    pub request_timeout: Duration,

    /// Consecutive fully-failed cycles before backoff starts.
    pub failure_threshold: u32,

    /// Upper bound for the backed-off interval.
    pub backoff_cap: Duration,

    /// Maximum in-flight property reads per cycle.
    pub fanout: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
            failure_threshold: 3,
            backoff_cap: Duration::from_secs(300),
            fanout: 4,
        }
    }
}

/// The cached state of one property.
///
/// A failed read marks the snapshot unavailable but keeps the last known
/// value; the error of the most recent failed read is retained until a read
/// succeeds again.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PropertySnapshot {
    pub value: Option<PropertyValue>,

    #[serde(with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,

    pub last_error: Option<String>,

    pub available: bool,

    #[serde(skip)]
    cycle: u64,
}

struct ThingSession {
    name: String,
    base_url: String,
    /// `None` means fallback mode.
    description: Option<ThingDescription>,
    credential: Credential,
    transport: Arc<dyn Transport>,
    poll_interval: Duration,
    request_timeout: Duration,
    failure_threshold: u32,
    backoff_cap: Duration,
    fanout: usize,
    snapshots: RwLock<HashMap<String, PropertySnapshot>>,
    consecutive_failures: AtomicU32,
    cycle: AtomicU64,
    refresh: Notify,
}

struct SessionHandle {
    shared: Arc<ThingSession>,
    task: JoinHandle<()>,
    closed_tx: watch::Sender<()>,
}

/// Owns and drives every device session.
pub struct PollingCoordinator {
    config: CoordinatorConfig,
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl PollingCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config, sessions: Mutex::new(HashMap::new()) }
    }

    /// Validates `device`, discovers its Thing Description and starts its
    /// polling task.
    ///
    /// A device that answers but publishes no usable Thing Description gets
    /// a fallback session; a Thing Description that exists but cannot be
    /// resolved aborts the setup.
    pub async fn add_session(&self, device: DeviceConfig) -> Result<(), Error> {
        let session = device.validate()?;
        let transport = Arc::new(HttpTransport::new(session.tls)?);
        self.add_session_with_transport(session, transport).await
    }

    /// [`add_session`](Self::add_session) with a caller-supplied transport.
    pub async fn add_session_with_transport(
        &self,
        session: SessionConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<(), Error> {
        {
            let sessions = self.sessions.lock().await;
            if sessions.contains_key(&session.name) {
                return Err(duplicate_session(&session.name));
            }
        }

        // Discovery can take up to two request timeouts; the map stays
        // unlocked so other sessions keep answering in the meantime.
        let description = discover_description(
            transport.as_ref(),
            &session.credential,
            &session.base_url,
            self.config.request_timeout,
        )
        .await?;

        match &description {
            Some(description) => info!(
                session = %session.name,
                title = %description.title,
                properties = description.properties.len(),
                actions = description.actions.len(),
                "thing description resolved"
            ),
            None => info!(
                session = %session.name,
                base_url = %session.base_url,
                "no thing description found, polling in fallback mode"
            ),
        }

        let shared = Arc::new(ThingSession {
            name: session.name.clone(),
            base_url: session.base_url,
            description,
            credential: session.credential,
            transport,
            poll_interval: session.poll_interval.unwrap_or(self.config.poll_interval),
            request_timeout: self.config.request_timeout,
            failure_threshold: self.config.failure_threshold,
            backoff_cap: self.config.backoff_cap,
            fanout: self.config.fanout,
            snapshots: RwLock::new(HashMap::new()),
            consecutive_failures: AtomicU32::new(0),
            cycle: AtomicU64::new(0),
            refresh: Notify::new(),
        });

        let mut sessions = self.sessions.lock().await;
        // The name may have been taken while discovery ran.
        if sessions.contains_key(&session.name) {
            return Err(duplicate_session(&session.name));
        }

        let (closed_tx, closed_rx) = watch::channel(());
        let task = tokio::spawn(run_session(Arc::clone(&shared), closed_rx));
        sessions.insert(session.name, SessionHandle { shared, task, closed_tx });

        Ok(())
    }

    /// Stops and removes a session. In-flight operations on it fail with
    /// [`Error::SessionClosed`].
    pub async fn remove_session(&self, name: &str) -> Result<(), Error> {
        let handle = self
            .sessions
            .lock()
            .await
            .remove(name)
            .ok_or_else(|| Error::UnknownSession(name.to_string()))?;

        let _ = handle.closed_tx.send(());
        handle.task.abort();
        debug!(session = %name, "session removed");

        Ok(())
    }

    /// Requests an immediate extra polling cycle.
    pub async fn refresh(&self, name: &str) -> Result<(), Error> {
        let sessions = self.sessions.lock().await;
        let handle = sessions
            .get(name)
            .ok_or_else(|| Error::UnknownSession(name.to_string()))?;
        handle.shared.refresh.notify_one();

        Ok(())
    }

    /// The current property cache of a session.
    pub async fn snapshots(&self, name: &str) -> Result<HashMap<String, PropertySnapshot>, Error> {
        let shared = self.shared(name).await?;
        let snapshots = shared.snapshots.read().await.clone();
        Ok(snapshots)
    }

    /// The resolved Thing Description, or `None` for a fallback session.
    pub async fn description(&self, name: &str) -> Result<Option<ThingDescription>, Error> {
        let shared = self.shared(name).await?;
        Ok(shared.description.clone())
    }

    /// The invocable actions of a session; empty for a fallback session.
    pub async fn action_catalog(&self, name: &str) -> Result<ActionCatalog, Error> {
        let shared = self.shared(name).await?;
        Ok(shared
            .description
            .as_ref()
            .map(|description| description.actions.clone())
            .unwrap_or_default())
    }

    /// Invokes an action on a session's device.
    ///
    /// Removing the session while the invocation is in flight resolves it
    /// with [`Error::SessionClosed`].
    pub async fn invoke(
        &self,
        name: &str,
        action: &str,
        params: Value,
    ) -> Result<ActionOutcome, Error> {
        let (shared, mut closed) = {
            let sessions = self.sessions.lock().await;
            let handle = sessions
                .get(name)
                .ok_or_else(|| Error::UnknownSession(name.to_string()))?;
            (Arc::clone(&handle.shared), handle.closed_tx.subscribe())
        };

        let Some(description) = &shared.description else {
            return Err(Error::UnknownAction(action.to_string()));
        };

        let invoker = ActionInvoker::new(Arc::clone(&shared.transport), shared.request_timeout);
        tokio::select! {
            outcome = invoker.invoke(&description.actions, &shared.credential, action, params) => outcome,
            _ = closed.changed() => Err(Error::SessionClosed),
        }
    }

    /// Writes a property value to the device, then triggers a refresh so the
    /// cache catches up.
    pub async fn write_property(
        &self,
        name: &str,
        property: &str,
        value: Value,
    ) -> Result<(), Error> {
        let shared = self.shared(name).await?;
        let Some(description) = &shared.description else {
            return Err(Error::InvalidParameters(format!("unknown property \"{property}\"")));
        };
        let def = description
            .properties
            .get(property)
            .ok_or_else(|| Error::InvalidParameters(format!("unknown property \"{property}\"")))?;
        let write_url = def.write_url.as_deref().ok_or_else(|| {
            Error::InvalidParameters(format!("property \"{property}\" is not writable"))
        })?;

        let response = shared
            .transport
            .request(TransportRequest {
                method: Method::Put,
                url: write_url,
                credential: &shared.credential,
                body: Some(&value),
                timeout: shared.request_timeout,
            })
            .await?;
        if !response.is_success() {
            return Err(Error::ActionFailed {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        shared.refresh.notify_one();
        Ok(())
    }

    async fn shared(&self, name: &str) -> Result<Arc<ThingSession>, Error> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(name)
            .map(|handle| Arc::clone(&handle.shared))
            .ok_or_else(|| Error::UnknownSession(name.to_string()))
    }
}

fn duplicate_session(name: &str) -> Error {
    Error::InvalidConfig(format!("a session named \"{name}\" already exists"))
}

/// Probes the well-known location and then the base URL for a Thing
/// Description.
///
/// Unreachable candidates and non-TD answers are skipped; only a document
/// that looks like a Thing Description but fails to resolve is an error.
async fn discover_description(
    transport: &dyn Transport,
    credential: &Credential,
    base_url: &str,
    timeout: Duration,
) -> Result<Option<ThingDescription>, Error> {
    let candidates = [format!("{base_url}/.well-known/wot"), base_url.to_string()];

    for candidate in &candidates {
        let response = match transport
            .request(TransportRequest {
                method: Method::Get,
                url: candidate,
                credential,
                body: None,
                timeout,
            })
            .await
        {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!(url = %candidate, status = response.status, "discovery candidate rejected");
                continue;
            }
            Err(error) => {
                debug!(url = %candidate, %error, "discovery candidate unreachable");
                continue;
            }
        };

        let Ok(document) = serde_json::from_slice::<Value>(&response.body) else {
            continue;
        };
        if !looks_like_thing_description(&document) {
            continue;
        }

        return resolve(&response.body, candidate).map(Some);
    }

    Ok(None)
}

async fn run_session(session: Arc<ThingSession>, mut closed: watch::Receiver<()>) {
    loop {
        let seq = session.cycle.fetch_add(1, Ordering::Relaxed) + 1;
        run_cycle(&session, seq).await;

        let delay = effective_interval(
            session.poll_interval,
            session.consecutive_failures.load(Ordering::Relaxed),
            session.failure_threshold,
            session.backoff_cap,
        );
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = session.refresh.notified() => {
                debug!(session = %session.name, "refresh requested");
            }
            _ = closed.changed() => break,
        }
    }
}

/// Runs one polling cycle: every catalog property with bounded fan-out, or a
/// single base URL read in fallback mode.
async fn run_cycle(session: &ThingSession, seq: u64) {
    let mut succeeded = 0usize;
    let mut failed = 0usize;

    match &session.description {
        Some(description) => {
            let defs: Vec<PropertyDef> = description.properties.values().cloned().collect();
            let mut reads = futures::stream::iter(defs)
                .map(|def| async move {
                    let outcome = fetch_property(session, &def).await;
                    (def.name, outcome)
                })
                .buffer_unordered(session.fanout.max(1));

            while let Some((name, outcome)) = reads.next().await {
                match &outcome {
                    Ok(_) => succeeded += 1,
                    Err(error) => {
                        debug!(session = %session.name, property = %name, %error, "property read failed");
                        failed += 1;
                    }
                }
                apply_outcome(&session.snapshots, seq, &name, outcome).await;
            }
        }
        None => {
            let outcome = fetch_fallback(session).await;
            match &outcome {
                Ok(_) => succeeded += 1,
                Err(error) => {
                    debug!(session = %session.name, %error, "fallback read failed");
                    failed += 1;
                }
            }
            apply_outcome(&session.snapshots, seq, FALLBACK_PROPERTY, outcome).await;
        }
    }

    if succeeded > 0 {
        session.consecutive_failures.store(0, Ordering::Relaxed);
    } else if failed > 0 {
        let failures = session.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(session = %session.name, failures, "polling cycle failed entirely");
    }
}

async fn fetch_property(session: &ThingSession, def: &PropertyDef) -> Result<PropertyValue, Error> {
    let response = session
        .transport
        .request(TransportRequest {
            method: def.method,
            url: &def.url,
            credential: &session.credential,
            body: None,
            timeout: session.request_timeout,
        })
        .await?;
    if !response.is_success() {
        return Err(Error::UnexpectedStatus(response.status));
    }

    let content_type = response.content_type.as_deref().unwrap_or(&def.content_type);
    normalize(&response.body, content_type, def.declared_type)
}

async fn fetch_fallback(session: &ThingSession) -> Result<PropertyValue, Error> {
    let response = session
        .transport
        .request(TransportRequest {
            method: Method::Get,
            url: &session.base_url,
            credential: &session.credential,
            body: None,
            timeout: session.request_timeout,
        })
        .await?;
    if !response.is_success() {
        return Err(Error::UnexpectedStatus(response.status));
    }

    let content_type = response.content_type.as_deref().unwrap_or("application/json");
    normalize(&response.body, content_type, DeclaredType::Unknown)
}

/// Stores a read outcome on the snapshot, unless a later cycle already wrote
/// to it. Overlapping cycles may deliver out of order; the newest cycle wins
/// and a stale result is dropped.
async fn apply_outcome(
    snapshots: &RwLock<HashMap<String, PropertySnapshot>>,
    seq: u64,
    name: &str,
    outcome: Result<PropertyValue, Error>,
) {
    let mut snapshots = snapshots.write().await;
    let snapshot = snapshots.entry(name.to_string()).or_default();
    if seq < snapshot.cycle {
        debug!(property = %name, seq, current = snapshot.cycle, "stale read dropped");
        return;
    }
    snapshot.cycle = seq;

    match outcome {
        Ok(value) => {
            snapshot.value = Some(value);
            snapshot.last_updated = Some(OffsetDateTime::now_utc());
            snapshot.last_error = None;
            snapshot.available = true;
        }
        Err(error) => {
            snapshot.last_error = Some(error.to_string());
            snapshot.available = false;
        }
    }
}

/// The delay before the next cycle: the base interval until
/// `failure_threshold` consecutive failed cycles, then doubling per failure
/// up to `cap`.
fn effective_interval(base: Duration, failures: u32, threshold: u32, cap: Duration) -> Duration {
    if failures < threshold {
        return base;
    }

    let exponent = (failures - threshold + 1).min(10);
    base.saturating_mul(1 << exponent).min(cap)
}
