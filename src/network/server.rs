use crate::config::ServerConfig;
use crate::error::GameError;
use crate::game::{Reply, Session, SessionState, SessionStats};
use crate::network::protocol::{encode, parse_decision, parse_move};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, Semaphore};
use tracing::{info, info_span, warn, Instrument};

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    serve(listener, config, None).await
}

/// Accept loop. Every connection gets its own task and its own `Session`;
/// at most `max_sessions` of them run at once.
pub async fn serve(
    listener: TcpListener,
    config: ServerConfig,
    ready: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, max_sessions = config.max_sessions, "server listening");
    if let Some(tx) = ready {
        let _ = tx.send(addr);
    }

    let limit = Arc::new(Semaphore::new(config.max_sessions.max(1)));
    let mut session_id: u64 = 0;

    loop {
        // 空きが出るまで次の接続を受け付けない
        let permit = Arc::clone(&limit).acquire_owned().await?;
        let (socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };

        session_id += 1;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(session_id)),
            None => StdRng::from_entropy(),
        };

        let span = info_span!("session", id = session_id, %peer);
        tokio::spawn(
            async move {
                let _permit = permit;
                info!("client connected");
                match handle_connection(socket, rng).await {
                    Ok(stats) => info!(?stats, "session finished"),
                    Err(e) => warn!(error = %e, "session aborted"),
                }
            }
            .instrument(span),
        );
    }
}

async fn handle_connection(mut socket: TcpStream, rng: StdRng) -> anyhow::Result<SessionStats> {
    let (reader, writer) = socket.split();
    run_session(BufReader::new(reader), writer, rng).await
}

/// 受信する1行の上限。これを超えた行は不正入力として扱う
pub const MAX_LINE_LEN: usize = 256;

/// Drives one session over a line stream until the client closes it or
/// the connection drops.
pub async fn run_session<R, W, G>(
    mut reader: R,
    mut writer: W,
    rng: G,
) -> anyhow::Result<SessionStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    G: Rng + Send + 'static,
{
    let (mut session, replies) = step(Session::new(rng), |s| s.start()).await?;
    send_replies(&mut writer, &replies).await?;

    let mut buf = Vec::new();
    while !session.is_closed() {
        let line = match read_line_limited(&mut reader, &mut buf).await? {
            Some(line) => line,
            None => {
                info!(state = ?session.state(), "client hung up");
                return Ok(*session.stats());
            }
        };

        let (next, replies) = match session.state() {
            SessionState::PlayerTurn => {
                let index = parse_move(&line);
                step(session, move |s| s.submit_move(index)).await?
            }
            SessionState::AwaitingRestartDecision => {
                let decision = parse_decision(&line);
                step(session, move |s| s.submit_restart_decision(decision)).await?
            }
            _ => (session, Vec::new()),
        };
        session = next;
        send_replies(&mut writer, &replies).await?;
    }

    writer.shutdown().await?;
    Ok(*session.stats())
}

/// Runs one session transition on the blocking pool, since it may search
/// the whole game tree.
async fn step<G, F>(mut session: Session<G>, f: F) -> anyhow::Result<(Session<G>, Vec<Reply>)>
where
    G: Rng + Send + 'static,
    F: FnOnce(&mut Session<G>) -> Result<Vec<Reply>, GameError> + Send + 'static,
{
    let (session, replies) = tokio::task::spawn_blocking(move || {
        let replies = f(&mut session);
        (session, replies)
    })
    .await?;
    Ok((session, replies?))
}

/// Reads one line of at most `MAX_LINE_LEN` bytes. Bytes that are not UTF-8
/// are replaced, and an oversized line is drained and returned empty, so both
/// reach the session as malformed input. `None` means EOF.
async fn read_line_limited<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = (&mut *reader)
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', buf)
        .await?;
    if n == 0 {
        return Ok(None);
    }

    if n == MAX_LINE_LEN && buf.last() != Some(&b'\n') {
        warn!(limit = MAX_LINE_LEN, "line too long, discarding");
        loop {
            buf.clear();
            let n = (&mut *reader)
                .take(MAX_LINE_LEN as u64)
                .read_until(b'\n', buf)
                .await?;
            if n == 0 || buf.last() == Some(&b'\n') {
                break;
            }
        }
        return Ok(Some(String::new()));
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

async fn send_replies<W>(writer: &mut W, replies: &[Reply]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for reply in replies {
        writer.write_all(encode(reply).as_bytes()).await?;
    }
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use tokio::io::duplex;

    #[tokio::test]
    async fn test_session_over_duplex() {
        let (client, server) = duplex(1024);
        let (server_read, server_write) = tokio::io::split(server);

        let handle = tokio::spawn(async move {
            run_session(BufReader::new(server_read), server_write, StepRng::new(0, 0)).await
        });

        let (client_read, mut client_write) = tokio::io::split(client);
        let mut lines = BufReader::new(client_read).lines();

        assert_eq!(lines.next_line().await.unwrap().unwrap(), "---------");
        client_write.write_all(b"oops\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "---------");
        client_write.write_all(b"4\n").await.unwrap();
        let board = lines.next_line().await.unwrap().unwrap();
        assert_eq!(board.len(), 9);
        assert_eq!(board.chars().nth(4), Some('1'));

        drop(client_write);
        drop(lines);
        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats.games_played, 0);
    }

    #[tokio::test]
    async fn test_close_after_game_writes_nothing_more() {
        let (client, server) = duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let handle = tokio::spawn(async move {
            run_session(BufReader::new(server_read), server_write, StepRng::new(0, 0)).await
        });

        let (client_read, mut client_write) = tokio::io::split(client);
        let mut reader = BufReader::new(client_read);
        let mut line = String::new();

        // play the lowest free cell until the game ends
        loop {
            line.clear();
            reader.read_line(&mut line).await.unwrap();
            let msg = line.trim().to_string();
            if msg.starts_with('#') {
                assert_ne!(msg, "#P");
                break;
            }
            let cell = msg.find('-').unwrap();
            client_write
                .write_all(format!("{cell}\n").as_bytes())
                .await
                .unwrap();
        }

        client_write.write_all(b"maybe\n#CG\n").await.unwrap();
        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats.games_played, 1);

        let mut rest = String::new();
        reader.read_to_string(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_and_oversized_lines_are_malformed_input() {
        let (client, server) = duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let handle = tokio::spawn(async move {
            run_session(BufReader::new(server_read), server_write, StepRng::new(0, 0)).await
        });

        let (client_read, mut client_write) = tokio::io::split(client);
        let mut reader = BufReader::new(client_read);
        let mut line = String::new();

        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "---------\n");

        // 手番中: 盤面の再送
        client_write.write_all(b"\xff\xfe\n").await.unwrap();
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "---------\n");

        let long = format!("{}\n", "4".repeat(MAX_LINE_LEN * 40));
        client_write.write_all(long.as_bytes()).await.unwrap();
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "---------\n");

        loop {
            let msg = line.trim().to_string();
            if msg.starts_with('#') {
                break;
            }
            let cell = msg.find('-').unwrap();
            client_write
                .write_all(format!("{cell}\n").as_bytes())
                .await
                .unwrap();
            line.clear();
            reader.read_line(&mut line).await.unwrap();
        }

        // 再戦確認中: 無視される
        client_write.write_all(b"\xff\xfe\n#CG\n").await.unwrap();
        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats.games_played, 1);

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_computer_opening_on_current_thread_runtime() {
        let (client, server) = duplex(1024);
        let (server_read, server_write) = tokio::io::split(server);
        // a full-width draw hands the first move to the computer
        let rng = StepRng::new(u64::MAX, 0);
        let handle = tokio::spawn(async move {
            run_session(BufReader::new(server_read), server_write, rng).await
        });

        let (client_read, client_write) = tokio::io::split(client);
        let mut lines = BufReader::new(client_read).lines();
        let board = lines.next_line().await.unwrap().unwrap();
        assert_eq!(board, "2--------");

        drop(client_write);
        drop(lines);
        handle.await.unwrap().unwrap();
    }
}
