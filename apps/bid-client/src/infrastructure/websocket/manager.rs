//! Price Feed Connection Manager

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use super::reconnect::ReconnectPolicy;
use super::types::{CloseEvent, ConnectionConfig, ConnectionError, ConnectionState};
use crate::application::ports::{ConnectionHandler, PushChannel};
use crate::infrastructure::metrics;

/// Upper bound for flushing the close frame on `stop()`.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Connection state plus the write side of the live connection.
///
/// Both fields change together under one write lock, so a reader that sees
/// `Open` also sees the sender of that connection and no other.
#[derive(Debug, Default)]
struct Link {
    state: ConnectionState,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

/// A running connection loop.
struct Session {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

/// How a single connection attempt ended.
#[derive(Debug)]
enum AttemptEnd {
    /// The transport closed; a reconnect is due.
    Closed { code: Option<u16>, reason: String },
    /// `stop()` ended the attempt.
    Stopped { was_open: bool },
}

/// Owns the one price feed connection of the process.
///
/// `start` spawns a loop that connects, delivers events to a
/// [`ConnectionHandler`], and after every close waits the fixed reconnect
/// delay before connecting again. Only `stop` ends the loop.
///
/// The manager is the only writer of the connection state. Each attempt's
/// socket is dropped before the next one is opened, so a superseded
/// connection can never deliver frames.
pub struct ConnectionManager {
    config: ConnectionConfig,
    link: Arc<RwLock<Link>>,
    session: Mutex<Option<Session>>,
}

impl ConnectionManager {
    /// Create an idle manager.
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            link: Arc::new(RwLock::new(Link::default())),
            session: Mutex::new(None),
        }
    }

    /// Open a connection to `endpoint` and keep it alive.
    ///
    /// `handler` becomes the only subscriber for the lifetime of the loop.
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::InvalidEndpoint`] if `endpoint` is not a
    /// `ws://` or `wss://` URL, and [`ConnectionError::AlreadyConnected`] if
    /// a loop is already running. Call [`Self::stop`] first to restart.
    pub fn start(
        &self,
        endpoint: &str,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<(), ConnectionError> {
        let url = validate_endpoint(endpoint)?;

        let mut session = self.session.lock();
        if session.is_some() {
            return Err(ConnectionError::AlreadyConnected);
        }

        {
            let mut link = self.link.write();
            link.state = ConnectionState::Connecting;
            link.outbound = None;
        }

        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run_feed(
            url.to_string(),
            self.config.clone(),
            Arc::clone(&self.link),
            handler,
            shutdown.clone(),
        ));

        tracing::info!(endpoint = %url, "Price feed started");
        *session = Some(Session { shutdown, task });

        Ok(())
    }

    /// Write a frame to the live connection.
    ///
    /// Returns `false` without side effects unless the state is `Open`.
    /// Nothing is buffered.
    pub fn send(&self, frame: &str) -> bool {
        let link = self.link.read();
        if !link.state.is_open() {
            return false;
        }
        link.outbound
            .as_ref()
            .is_some_and(|tx| tx.send(frame.to_string()).is_ok())
    }

    /// Close the connection, cancel any pending reconnect and return to
    /// `Idle`.
    ///
    /// Resolves once the loop has exited, so a following `start` never
    /// overlaps the old connection.
    pub async fn stop(&self) {
        let session = self.session.lock().take();
        let Some(session) = session else {
            return;
        };

        {
            let mut link = self.link.write();
            session.shutdown.cancel();
            link.state = ConnectionState::Idle;
            link.outbound = None;
        }

        if let Err(e) = session.task.await {
            tracing::warn!(error = %e, "Price feed task ended abnormally");
        }

        tracing::info!("Price feed stopped");
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.link.read().state
    }

    /// Check if frames can be sent.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(ConnectionConfig::default())
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.shutdown.cancel();
        }
    }
}

impl PushChannel for ConnectionManager {
    fn is_open(&self) -> bool {
        Self::is_open(self)
    }

    fn send(&self, frame: &str) -> bool {
        Self::send(self, frame)
    }
}

fn validate_endpoint(endpoint: &str) -> Result<Url, ConnectionError> {
    let url = Url::parse(endpoint).map_err(|e| ConnectionError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(ConnectionError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Apply a state change unless `stop()` has already claimed the link.
///
/// `stop()` cancels under the same write lock, so once this returns `false`
/// the loop must exit without touching the link again.
fn transition(link: &RwLock<Link>, shutdown: &CancellationToken, next: ConnectionState) -> bool {
    let mut link = link.write();
    if shutdown.is_cancelled() {
        return false;
    }
    tracing::debug!(from = %link.state, to = %next, "Price feed state change");
    link.state = next;
    if !next.is_open() {
        link.outbound = None;
    }
    true
}

fn open_link(
    link: &RwLock<Link>,
    shutdown: &CancellationToken,
    outbound: mpsc::UnboundedSender<String>,
) -> bool {
    let mut link = link.write();
    if shutdown.is_cancelled() {
        return false;
    }
    link.state = ConnectionState::Open;
    link.outbound = Some(outbound);
    true
}

/// Run the connection loop until `shutdown` is cancelled.
async fn run_feed(
    endpoint: String,
    config: ConnectionConfig,
    link: Arc<RwLock<Link>>,
    handler: Arc<dyn ConnectionHandler>,
    shutdown: CancellationToken,
) {
    let mut policy = ReconnectPolicy::new(&config);

    loop {
        match connect_and_run(&endpoint, &link, handler.as_ref(), &shutdown, &mut policy).await {
            AttemptEnd::Stopped { was_open } => {
                if was_open {
                    handler.on_close(&CloseEvent {
                        code: None,
                        reason: "stopped".to_string(),
                        reconnect_in: None,
                    });
                }
                break;
            }
            AttemptEnd::Closed { code, reason } => {
                if !transition(&link, &shutdown, ConnectionState::Closed) {
                    handler.on_close(&CloseEvent {
                        code,
                        reason,
                        reconnect_in: None,
                    });
                    break;
                }

                let delay = policy.next_delay();
                handler.on_close(&CloseEvent {
                    code,
                    reason,
                    reconnect_in: Some(delay),
                });

                tracing::info!(
                    delay_ms = delay.as_millis(),
                    attempt = policy.current_attempt(),
                    total_attempts = policy.total_attempts(),
                    "Reconnecting price feed"
                );

                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = shutdown.cancelled() => {
                        tracing::debug!("Price feed stopped during reconnect delay");
                        break;
                    }
                }

                metrics::record_reconnect();
                if !transition(&link, &shutdown, ConnectionState::Connecting) {
                    break;
                }
            }
        }
    }
}

/// Make one connection attempt and pump it until it closes.
async fn connect_and_run(
    endpoint: &str,
    link: &RwLock<Link>,
    handler: &dyn ConnectionHandler,
    shutdown: &CancellationToken,
    policy: &mut ReconnectPolicy,
) -> AttemptEnd {
    tracing::debug!(endpoint, "Connecting to price feed");

    let connected = tokio::select! {
        result = connect_async(endpoint) => result,
        () = shutdown.cancelled() => return AttemptEnd::Stopped { was_open: false },
    };

    let mut ws_stream = match connected {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => return transport_failure(handler, &e.to_string()),
    };

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    if !open_link(link, shutdown, outbound_tx) {
        let _ = ws_stream.close(None).await;
        return AttemptEnd::Stopped { was_open: false };
    }

    policy.reset();
    tracing::info!(endpoint, "Price feed connected");
    handler.on_open();

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => handler.on_message(text.as_str()),
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame.map_or((None, String::new()), |f| {
                            (Some(u16::from(f.code)), f.reason.to_string())
                        });
                        tracing::info!(?code, reason = %reason, "Price feed received close frame");
                        return AttemptEnd::Closed { code, reason };
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return transport_failure(handler, &e.to_string()),
                    None => {
                        return AttemptEnd::Closed {
                            code: None,
                            reason: "stream ended".to_string(),
                        };
                    }
                }
            }
            Some(frame) = outbound_rx.recv() => {
                let sent = tokio::select! {
                    result = write.send(Message::Text(frame.into())) => result,
                    () = shutdown.cancelled() => return AttemptEnd::Stopped { was_open: true },
                };
                if let Err(e) = sent {
                    return transport_failure(handler, &e.to_string());
                }
            }
            () = shutdown.cancelled() => {
                match tokio::time::timeout(CLOSE_TIMEOUT, write.send(Message::Close(None))).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::debug!(error = %e, "Failed to send close frame"),
                    Err(_) => tracing::debug!("Close frame not flushed before timeout"),
                }
                return AttemptEnd::Stopped { was_open: true };
            }
        }
    }
}

/// Report a transport error; the close that follows drives the reconnect.
fn transport_failure(handler: &dyn ConnectionHandler, message: &str) -> AttemptEnd {
    let error = ConnectionError::Transport {
        message: message.to_string(),
    };
    tracing::warn!(error = %error, "Price feed transport error");
    handler.on_error(&error);

    AttemptEnd::Closed {
        code: None,
        reason: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl ConnectionHandler for Silent {
        fn on_message(&self, _raw: &str) {}
    }

    #[test]
    fn validate_endpoint_accepts_websocket_urls() {
        assert!(validate_endpoint("ws://localhost:4567/precios").is_ok());
        assert!(validate_endpoint("wss://example.com/precios").is_ok());
    }

    #[test]
    fn validate_endpoint_rejects_other_schemes() {
        let err = validate_endpoint("http://localhost:4567/precios").unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidEndpoint { .. }));

        let err = validate_endpoint("not a url").unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidEndpoint { .. }));
    }

    #[test]
    fn new_manager_is_idle() {
        let manager = ConnectionManager::default();
        assert_eq!(manager.state(), ConnectionState::Idle);
        assert!(!manager.is_open());
    }

    #[test]
    fn send_while_idle_is_noop() {
        let manager = ConnectionManager::default();
        assert!(!manager.send("42:19.99"));
        assert_eq!(manager.state(), ConnectionState::Idle);
    }

    #[tokio::test]
    async fn start_rejects_invalid_endpoint_and_stays_idle() {
        let manager = ConnectionManager::default();
        let err = manager
            .start("ftp://localhost/precios", Arc::new(Silent))
            .unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidEndpoint { .. }));
        assert_eq!(manager.state(), ConnectionState::Idle);
    }

    #[tokio::test]
    async fn stop_without_start_is_noop() {
        let manager = ConnectionManager::default();
        manager.stop().await;
        assert_eq!(manager.state(), ConnectionState::Idle);
    }

    #[test]
    fn transition_refused_after_cancel() {
        let link = RwLock::new(Link::default());
        let shutdown = CancellationToken::new();

        assert!(transition(&link, &shutdown, ConnectionState::Connecting));
        assert_eq!(link.read().state, ConnectionState::Connecting);

        shutdown.cancel();
        assert!(!transition(&link, &shutdown, ConnectionState::Closed));
        assert_eq!(link.read().state, ConnectionState::Connecting);
    }

    #[test]
    fn leaving_open_drops_outbound() {
        let link = RwLock::new(Link::default());
        let shutdown = CancellationToken::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        assert!(open_link(&link, &shutdown, tx));
        assert!(link.read().outbound.is_some());

        assert!(transition(&link, &shutdown, ConnectionState::Closed));
        assert!(link.read().outbound.is_none());
    }
}
