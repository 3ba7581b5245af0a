use std::{
    io::ErrorKind,
    net::TcpStream,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use thiserror::Error;
use tungstenite::{
    client::IntoClientRequest,
    http::{header::COOKIE, HeaderValue},
    stream::MaybeTlsStream,
    Message as WsMessage, WebSocket,
};
use url::Url;

use crate::{
    domain::events::{AppEvent, ConnectivityStatus},
    infra::{config::AppConfig, secrets::redact_text},
    usecases::realtime::{OutboundEvent, RealtimeError, RealtimeTransport},
};

use super::socketio::{self, Frame};

const REALTIME_WORKER_SHUTDOWN_FAILED: &str = "REALTIME_WORKER_SHUTDOWN_FAILED";
const REALTIME_CONNECT_FAILED: &str = "REALTIME_CONNECT_FAILED";
const REALTIME_CONNECTION_LOST: &str = "REALTIME_CONNECTION_LOST";
const REALTIME_FRAME_REJECTED: &str = "REALTIME_FRAME_REJECTED";

const READ_POLL: Duration = Duration::from_millis(50);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum RealtimeWorkerStartError {
    #[error("invalid realtime url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported server scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("worker spawn failed: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

#[derive(Debug, Error)]
enum SessionError {
    #[error("websocket failure: {0}")]
    Socket(#[from] tungstenite::Error),
    #[error("session cookie is not a valid header value")]
    InvalidCookie(#[from] tungstenite::http::header::InvalidHeaderValue),
    #[error("socket setup failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("server address did not resolve")]
    Unresolved,
    #[error("websocket handshake failed: {0}")]
    Handshake(String),
    #[error("server refused the namespace: {0}")]
    Refused(String),
    #[error("server closed the connection")]
    Closed,
}

#[derive(Clone)]
pub struct RealtimeSettings {
    pub url: Url,
    pub cookie: String,
    pub reconnect_delay: Duration,
    /// Bounds the TCP connect and each read or write of the upgrade.
    pub handshake_timeout: Duration,
}

impl std::fmt::Debug for RealtimeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeSettings")
            .field("url", &self.url.as_str())
            .field("cookie", &"<redacted>")
            .field("reconnect_delay", &self.reconnect_delay)
            .field("handshake_timeout", &self.handshake_timeout)
            .finish()
    }
}

impl RealtimeSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, RealtimeWorkerStartError> {
        Ok(Self {
            url: socket_url(&config.server.base_url, &config.realtime.socket_path)?,
            cookie: config.session.cookie.clone(),
            reconnect_delay: Duration::from_millis(config.realtime.reconnect_delay_ms),
            handshake_timeout: CONNECT_TIMEOUT,
        })
    }
}

/// Websocket endpoint for the Socket.IO server behind `base_url`.
pub fn socket_url(base_url: &str, socket_path: &str) -> Result<Url, RealtimeWorkerStartError> {
    let mut url = Url::parse(base_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(RealtimeWorkerStartError::UnsupportedScheme(other.to_owned())),
    };
    url.set_scheme(scheme)
        .map_err(|()| RealtimeWorkerStartError::UnsupportedScheme(scheme.to_owned()))?;

    let path = if socket_path.ends_with('/') {
        socket_path.to_owned()
    } else {
        format!("{socket_path}/")
    };
    url.set_path(&path);
    url.set_query(Some("EIO=4&transport=websocket"));

    Ok(url)
}

enum WorkerCommand {
    Emit(OutboundEvent),
    Stop,
}

enum SessionEnd {
    Lost,
    Stop,
}

/// Handle to the thread that owns the realtime socket. Reconnects on its
/// own; emits are refused while the namespace is not connected.
#[derive(Debug)]
pub struct RealtimeWorker {
    command_tx: Option<Sender<WorkerCommand>>,
    connected: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl RealtimeWorker {
    pub fn start(
        settings: RealtimeSettings,
        events: Sender<AppEvent>,
    ) -> Result<Self, RealtimeWorkerStartError> {
        let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>();
        let connected = Arc::new(AtomicBool::new(false));
        let worker_connected = Arc::clone(&connected);

        let worker = thread::Builder::new()
            .name("quack-realtime".to_owned())
            .spawn(move || run_worker(settings, command_rx, events, worker_connected))?;

        Ok(Self {
            command_tx: Some(command_tx),
            connected,
            worker: Some(worker),
        })
    }
}

impl RealtimeTransport for RealtimeWorker {
    fn emit(&mut self, event: OutboundEvent) -> Result<(), RealtimeError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(RealtimeError::NotConnected);
        }

        self.command_tx
            .as_ref()
            .ok_or(RealtimeError::Closed)?
            .send(WorkerCommand::Emit(event))
            .map_err(|_| RealtimeError::Closed)
    }
}

impl Drop for RealtimeWorker {
    fn drop(&mut self) {
        if let Some(command_tx) = self.command_tx.take() {
            let _ = command_tx.send(WorkerCommand::Stop);
        }

        if let Some(worker) = self.worker.take() {
            if let Err(error) = worker.join() {
                tracing::warn!(
                    code = REALTIME_WORKER_SHUTDOWN_FAILED,
                    error = ?error,
                    "realtime worker panicked on shutdown"
                );
            }
        }
    }
}

fn run_worker(
    settings: RealtimeSettings,
    commands: Receiver<WorkerCommand>,
    events: Sender<AppEvent>,
    connected: Arc<AtomicBool>,
) {
    loop {
        if !publish(&events, ConnectivityStatus::Connecting) {
            return;
        }

        match open_session(&settings) {
            Ok(mut socket) => {
                let end = drive_session(&mut socket, &commands, &events, &connected);
                connected.store(false, Ordering::Release);

                if let SessionEnd::Stop = end {
                    let _ = socket.close(None);
                    let _ = socket.flush();
                    let _ = publish(&events, ConnectivityStatus::Disconnected);
                    return;
                }
            }
            Err(error) => {
                tracing::warn!(
                    code = REALTIME_CONNECT_FAILED,
                    error = %redact_text(&error.to_string()),
                    "realtime connection attempt failed"
                );
            }
        }

        if !publish(&events, ConnectivityStatus::Disconnected) {
            return;
        }
        if !wait_before_reconnect(&commands, settings.reconnect_delay) {
            return;
        }
    }
}

fn open_session(settings: &RealtimeSettings) -> Result<Socket, SessionError> {
    let mut request = settings.url.as_str().into_client_request()?;
    if !settings.cookie.is_empty() {
        request
            .headers_mut()
            .insert(COOKIE, HeaderValue::from_str(&settings.cookie)?);
    }

    let address = settings
        .url
        .socket_addrs(|| None)?
        .into_iter()
        .next()
        .ok_or(SessionError::Unresolved)?;
    let stream = TcpStream::connect_timeout(&address, settings.handshake_timeout)?;
    stream.set_read_timeout(Some(settings.handshake_timeout))?;
    stream.set_write_timeout(Some(settings.handshake_timeout))?;
    let (mut socket, _response) = tungstenite::client_tls_with_config(request, stream, None, None)
        .map_err(|error| SessionError::Handshake(error.to_string()))?;
    match socket.get_mut() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(READ_POLL))?,
        MaybeTlsStream::Rustls(stream) => stream.sock.set_read_timeout(Some(READ_POLL))?,
        _ => {}
    }

    tracing::info!(url = settings.url.as_str(), "realtime socket opened");
    Ok(socket)
}

fn drive_session(
    socket: &mut Socket,
    commands: &Receiver<WorkerCommand>,
    events: &Sender<AppEvent>,
    connected: &AtomicBool,
) -> SessionEnd {
    match run_session(socket, commands, events, connected) {
        Ok(end) => end,
        Err(error) => {
            tracing::warn!(
                code = REALTIME_CONNECTION_LOST,
                error = %redact_text(&error.to_string()),
                "realtime connection lost"
            );
            SessionEnd::Lost
        }
    }
}

fn run_session(
    socket: &mut Socket,
    commands: &Receiver<WorkerCommand>,
    events: &Sender<AppEvent>,
    connected: &AtomicBool,
) -> Result<SessionEnd, SessionError> {
    loop {
        loop {
            match commands.try_recv() {
                Ok(WorkerCommand::Emit(event)) => match socketio::encode(&event) {
                    Ok(frame) => {
                        socket.send(WsMessage::text(frame))?;
                        tracing::debug!(event = event.name(), "realtime event emitted");
                    }
                    Err(error) => tracing::warn!(
                        code = REALTIME_FRAME_REJECTED,
                        event = event.name(),
                        error = %error,
                        "outbound event could not be encoded"
                    ),
                },
                Ok(WorkerCommand::Stop) | Err(TryRecvError::Disconnected) => {
                    return Ok(SessionEnd::Stop)
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        let text = match socket.read() {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => return Err(SessionError::Closed),
            Ok(_) => continue,
            Err(tungstenite::Error::Io(error))
                if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue
            }
            Err(error) => return Err(error.into()),
        };

        let frame = match socketio::decode(text.as_str()) {
            Ok(frame) => frame,
            Err(error) => {
                tracing::warn!(
                    code = REALTIME_FRAME_REJECTED,
                    error = %error,
                    "inbound frame dropped"
                );
                continue;
            }
        };

        match frame {
            Frame::EngineOpen => socket.send(WsMessage::text(socketio::NAMESPACE_CONNECT))?,
            Frame::Ping => socket.send(WsMessage::text(socketio::ENGINE_PONG))?,
            Frame::NamespaceConnected => {
                connected.store(true, Ordering::Release);
                if !publish(events, ConnectivityStatus::Connected) {
                    return Ok(SessionEnd::Stop);
                }
            }
            Frame::Event(event) => {
                if events.send(AppEvent::Realtime(event)).is_err() {
                    return Ok(SessionEnd::Stop);
                }
            }
            Frame::UnhandledEvent(name) => {
                tracing::trace!(event = %name, "realtime event ignored");
            }
            Frame::ConnectError(details) => return Err(SessionError::Refused(details)),
            Frame::EngineClose | Frame::NamespaceDisconnected => {
                return Err(SessionError::Closed)
            }
            Frame::Pong | Frame::Noop => {}
        }
    }
}

fn publish(events: &Sender<AppEvent>, status: ConnectivityStatus) -> bool {
    tracing::debug!(status = status.as_label(), "realtime connectivity changed");
    events.send(AppEvent::ConnectivityChanged(status)).is_ok()
}

/// Sleeps for the reconnect delay. Returns false when the worker should
/// stop instead. Emits queued in the meantime are dropped.
fn wait_before_reconnect(commands: &Receiver<WorkerCommand>, delay: Duration) -> bool {
    let deadline = Instant::now() + delay;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return true;
        }

        match commands.recv_timeout(remaining) {
            Ok(WorkerCommand::Emit(event)) => {
                tracing::debug!(event = event.name(), "emit dropped while disconnected");
            }
            Ok(WorkerCommand::Stop) | Err(RecvTimeoutError::Disconnected) => return false,
            Err(RecvTimeoutError::Timeout) => return true,
        }
    }
}
