//! End-to-end tests for the chat relay
//!
//! These tests run `serve` on an ephemeral port and talk to it over real TCP sockets.

use std::net::SocketAddr;
use std::time::Duration;

use chat_relay::message::{self, NAME_COLLISION, PROMPT};
use chat_relay::{serve, Config};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

struct Relay {
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

async fn start_relay(announce_leave: bool) -> Relay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: addr.port(),
        announce_leave,
        ..Config::default()
    };
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(serve(listener, config, shutdown_rx));
    Relay {
        addr,
        shutdown,
        task,
    }
}

async fn read_text(stream: &mut TcpStream, len: usize) -> String {
    let mut buf = vec![0u8; len];
    timeout(IO_TIMEOUT, stream.read_exact(&mut buf))
        .await
        .expect("timed out waiting for relay")
        .unwrap();
    String::from_utf8(buf).unwrap()
}

async fn expect_text(stream: &mut TcpStream, expected: &str) {
    assert_eq!(read_text(stream, expected.len()).await, expected);
}

async fn expect_silence(stream: &mut TcpStream) {
    let mut buf = [0u8; 64];
    let read = timeout(Duration::from_millis(200), stream.read(&mut buf)).await;
    assert!(read.is_err(), "expected no data, got {:?}", read);
}

/// Connect, answer the prompt with `name`
async fn connect_as(addr: SocketAddr, name: &str) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    expect_text(&mut stream, PROMPT).await;
    stream
        .write_all(format!("{}\r\n", name).as_bytes())
        .await
        .unwrap();
    stream
}

/// Join u1, u2, u3 and wait until every join has been announced
async fn three_clients(addr: SocketAddr) -> (TcpStream, TcpStream, TcpStream) {
    let mut u1 = connect_as(addr, "u1").await;
    let mut u2 = connect_as(addr, "u2").await;

    // Whichever of u1/u2 registers second is announced to the other
    let u1_joined = message::join_announcement("u1");
    let u2_joined = message::join_announcement("u2");
    tokio::select! {
        text = read_text(&mut u1, u2_joined.len()) => assert_eq!(text, u2_joined),
        text = read_text(&mut u2, u1_joined.len()) => assert_eq!(text, u1_joined),
    }

    let u3 = connect_as(addr, "u3").await;
    expect_text(&mut u1, &message::join_announcement("u3")).await;
    expect_text(&mut u2, &message::join_announcement("u3")).await;
    (u1, u2, u3)
}

#[tokio::test]
async fn message_reaches_everyone_but_sender() {
    let relay = start_relay(false).await;
    let (mut u1, mut u2, mut u3) = three_clients(relay.addr).await;

    u1.write_all(b"hello\n").await.unwrap();

    expect_text(&mut u2, "\nu1 sent: hello\n").await;
    expect_text(&mut u3, "\nu1 sent: hello\n").await;
    expect_silence(&mut u1).await;
}

#[tokio::test]
async fn taken_name_is_refused_and_closed() {
    let relay = start_relay(false).await;
    let (_u1, mut u2, mut u3) = three_clients(relay.addr).await;

    let mut impostor = connect_as(relay.addr, "u1").await;

    let mut rest = String::new();
    timeout(IO_TIMEOUT, impostor.read_to_string(&mut rest))
        .await
        .expect("timed out waiting for close")
        .unwrap();
    assert_eq!(rest, NAME_COLLISION);

    // The refused client was never announced
    expect_silence(&mut u2).await;
    expect_silence(&mut u3).await;
}

#[tokio::test]
async fn disconnect_is_silent_by_default() {
    let relay = start_relay(false).await;
    let (u1, mut u2, mut u3) = three_clients(relay.addr).await;

    drop(u1);

    expect_silence(&mut u2).await;
    u3.write_all(b"anyone?\n").await.unwrap();
    expect_text(&mut u2, "\nu3 sent: anyone?\n").await;
}

#[tokio::test]
async fn name_is_reusable_after_leave() {
    let relay = start_relay(true).await;
    let (u1, mut u2, mut u3) = three_clients(relay.addr).await;

    drop(u1);
    expect_text(&mut u2, &message::leave_announcement("u1")).await;
    expect_text(&mut u3, &message::leave_announcement("u1")).await;

    let mut again = connect_as(relay.addr, "u1").await;
    expect_text(&mut u2, &message::join_announcement("u1")).await;

    u2.write_all(b"welcome back").await.unwrap();
    expect_text(&mut again, "\nu2 sent: welcome back\n").await;
}

#[tokio::test]
async fn shutdown_closes_sessions_and_returns() {
    let relay = start_relay(false).await;
    let (mut u1, mut u2, mut u3) = three_clients(relay.addr).await;

    relay.shutdown.send(true).unwrap();
    timeout(IO_TIMEOUT, relay.task)
        .await
        .expect("relay did not stop")
        .unwrap();

    for stream in [&mut u1, &mut u2, &mut u3] {
        let mut buf = [0u8; 16];
        let n = timeout(IO_TIMEOUT, stream.read(&mut buf))
            .await
            .expect("timed out waiting for close")
            .unwrap_or(0);
        assert_eq!(n, 0);
    }
}
