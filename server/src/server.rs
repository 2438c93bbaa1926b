//! Connection wiring (§5): the acceptor task, one reader/writer task pair
//! per connection, a fixed dispatcher-task pool, and graceful shutdown.
//! Grounded on the teacher's `server.rs` accept loop and per-connection
//! task split, generalized from a single `TcpListener::accept` + spawn
//! into the login-phase/playing-phase split this spec's command
//! dispatch needs.

use std::net::SocketAddr;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use crate::command::dispatcher;
use crate::command::registry::CommandRegistry;
use crate::config::Config;
use crate::connection::ConnectionManager;
use crate::ids::ConnectionId;
use crate::login::{self, LoginOutcome};
use crate::players::PlayerStore;
use crate::session::Session;
use crate::telnet::TelnetCodec;
use crate::tick;
use crate::world::World;

/// Number of worker tasks draining the shared dispatch queue (§5: "a
/// fixed dispatcher-task pool reading from a global channel").
const DISPATCHER_POOL_SIZE: usize = 4;

type SessionRegistry = DashMap<ConnectionId, Arc<Mutex<Session>>>;

type ConnectionTasks = DashMap<ConnectionId, (JoinHandle<()>, JoinHandle<()>)>;

/// Shared handles every connection task and the dispatcher pool need.
pub struct Shared {
    pub world: Arc<World>,
    pub connections: Arc<ConnectionManager>,
    pub registry: Arc<CommandRegistry>,
    pub players: Arc<dyn PlayerStore>,
    pub sessions: Arc<SessionRegistry>,
    pub connection_tasks: Arc<ConnectionTasks>,
    pub config: Config,
}

/// Raw bytes (telnet negotiation replies, greeting, echo toggles) a
/// connection's writer sends verbatim, bypassing the text/color path.
enum OutboundItem {
    Line(String),
    Raw(Vec<u8>),
}

/// Runs the server until `shutdown` fires: binds the listener, accepts
/// connections, and drives the tick loop and dispatcher pool alongside
/// it. Returns once every spawned task has wound down (§5 cancellation
/// order: acceptor first, then readers/writers observe closed channels).
pub async fn run(shared: Arc<Shared>, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(shared.config.bind).await?;
    log::info!("listening on {}", shared.config.bind);

    let (dispatch_tx, dispatch_rx) = mpsc::unbounded_channel::<ConnectionId>();
    let dispatch_rx = Arc::new(Mutex::new(dispatch_rx));

    let mut dispatcher_tasks = Vec::with_capacity(DISPATCHER_POOL_SIZE);
    for worker_id in 0..DISPATCHER_POOL_SIZE {
        dispatcher_tasks.push(tokio::spawn(dispatcher_worker(
            worker_id,
            shared.clone(),
            dispatch_rx.clone(),
            shutdown.clone(),
        )));
    }

    let tick_task = tokio::spawn(tick::run(shared.world.clone(), shared.connections.clone(), shutdown.clone()));

    let accept_task = tokio::spawn(accept_loop(listener, shared.clone(), dispatch_tx, shutdown.clone()));

    let _ = shutdown.changed().await;
    log::info!("shutdown signal received, closing acceptor");
    let _ = accept_task.await;

    for entry in shared.connection_tasks.iter() {
        let (reader, writer) = entry.value();
        reader.abort();
        writer.abort();
    }

    let _ = tick_task.await;
    for task in dispatcher_tasks {
        let _ = task.await;
    }

    Ok(())
}

async fn accept_loop(listener: TcpListener, shared: Arc<Shared>, dispatch_tx: mpsc::UnboundedSender<ConnectionId>, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => spawn_connection(stream, peer, shared.clone(), dispatch_tx.clone()),
                    Err(e) => log::warn!("accept failed: {e}"),
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

fn spawn_connection(stream: TcpStream, peer: SocketAddr, shared: Arc<Shared>, dispatch_tx: mpsc::UnboundedSender<ConnectionId>) {
    let connection_id = ConnectionId::next();
    if !shared.connections.add_connection(connection_id, peer.ip()) {
        log::info!("rejecting connection from {peer}: admission limit reached");
        return;
    }

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<OutboundItem>();
    let (reader_half, writer_half) = stream.into_split();

    // `Session`/`PlayerCharacter` speak plain `UnboundedSender<String>`
    // (`OutboundSink`); forward each line onto the writer's item channel
    // so both the telnet negotiation bytes and text share one socket writer.
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    let forward_outbound_tx = outbound_tx.clone();
    tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if forward_outbound_tx.send(OutboundItem::Line(line)).is_err() {
                break;
            }
        }
    });

    let session = Arc::new(Mutex::new(Session::new(connection_id, line_tx)));
    shared.sessions.insert(connection_id, session.clone());

    let writer_task = tokio::spawn(writer_loop(writer_half, outbound_rx));
    let reader_task = tokio::spawn(reader_loop(reader_half, connection_id, shared.clone(), session, outbound_tx, dispatch_tx));

    shared.connection_tasks.insert(connection_id, (reader_task, writer_task));
}

async fn writer_loop(mut writer_half: tokio::net::tcp::OwnedWriteHalf, mut outbound_rx: mpsc::UnboundedReceiver<OutboundItem>) {
    let codec = TelnetCodec::new();
    while let Some(item) = outbound_rx.recv().await {
        let bytes = match item {
            OutboundItem::Line(text) => codec.encode_outbound(&format!("{text}\n")).into_bytes(),
            OutboundItem::Raw(bytes) => bytes,
        };
        if writer_half.write_all(&bytes).await.is_err() {
            break;
        }
    }
}

/// Owns the connection's `TelnetCodec` decode state and drives both the
/// login flow and, once `Playing`, the per-line dispatch signal.
async fn reader_loop(
    mut reader_half: tokio::net::tcp::OwnedReadHalf,
    connection_id: ConnectionId,
    shared: Arc<Shared>,
    session: Arc<Mutex<Session>>,
    outbound_tx: mpsc::UnboundedSender<OutboundItem>,
    dispatch_tx: mpsc::UnboundedSender<ConnectionId>,
) {
    let mut codec = TelnetCodec::new();
    let _ = outbound_tx.send(OutboundItem::Raw(TelnetCodec::greeting()));

    {
        let guarded = session.lock().await;
        login::send_banner(&guarded);
    }

    let mut buf = [0u8; 1024];
    loop {
        let read = reader_half.read(&mut buf).await;
        let bytes_read = match read {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };

        let (lines, replies) = codec.feed(&buf[..bytes_read]);
        if !replies.is_empty() {
            let _ = outbound_tx.send(OutboundItem::Raw(replies));
        }

        for line in lines {
            let mut guarded = session.lock().await;
            if guarded.is_playing() {
                guarded.push_input(line);
                drop(guarded);
                let _ = dispatch_tx.send(connection_id);
            } else {
                let outcome = login::process_line(&mut guarded, &line, &shared.world, shared.players.as_ref(), shared.config.starting_room_vnum());
                match outcome {
                    LoginOutcome::Continue => {}
                    LoginOutcome::SetEcho(on) => {
                        let bytes = codec.set_echo(on);
                        let _ = outbound_tx.send(OutboundItem::Raw(bytes));
                    }
                    LoginOutcome::Disconnect => {
                        drop(guarded);
                        teardown(connection_id, &shared);
                        return;
                    }
                }
            }
        }
    }

    teardown(connection_id, &shared);
}

/// Cleans up everything a gone connection owned: connection-manager
/// bookkeeping, the session, the in-world character (if any), and both
/// task handles. Safe to call from within the reader task itself (the
/// self-abort is a no-op since the task is about to return anyway) or
/// from a dispatcher worker reacting to `quit`.
fn teardown(connection_id: ConnectionId, shared: &Arc<Shared>) {
    shared.connections.mark_closed(connection_id);
    shared.connections.remove_connection(connection_id);

    if let Some((_, session)) = shared.sessions.remove(&connection_id) {
        if let Ok(guarded) = session.try_lock() {
            if let Some(character_id) = guarded.character_id() {
                if let Some(handle) = shared.world.characters.get(character_id) {
                    if let Ok(character) = handle.lock() {
                        let room = character.room();
                        drop(character);
                        shared.world.despawn_character(character_id, room);
                    }
                }
            }
        }
    }

    if let Some((_, (reader, writer))) = shared.connection_tasks.remove(&connection_id) {
        reader.abort();
        writer.abort();
    }
}

/// One worker out of the fixed dispatcher pool (§5): pulls a connection
/// id off the shared queue, drains every queued input line for that
/// session's character, and runs each through `dispatcher::dispatch`.
/// The session's own `tokio::sync::Mutex` serializes concurrent
/// dispatch for a single connection (§5 ordering guarantee).
async fn dispatcher_worker(
    _worker_id: usize,
    shared: Arc<Shared>,
    dispatch_rx: Arc<Mutex<mpsc::UnboundedReceiver<ConnectionId>>>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let connection_id = tokio::select! {
            received = async {
                let mut rx = dispatch_rx.lock().await;
                rx.recv().await
            } => match received {
                Some(id) => id,
                None => break,
            },
            _ = shutdown.changed() => break,
        };

        let Some(session) = shared.sessions.get(&connection_id).map(|e| e.value().clone()) else { continue };
        loop {
            let (line, character_id) = {
                let mut guarded = session.lock().await;
                let Some(character_id) = guarded.character_id() else { break };
                let Some(line) = guarded.drain_input() else { break };
                (line, character_id)
            };

            let disconnect = dispatcher::dispatch(&shared.registry, &shared.world, &shared.connections, connection_id, character_id, &line);
            if disconnect {
                teardown(connection_id, &shared);
                break;
            }
        }
    }
}
