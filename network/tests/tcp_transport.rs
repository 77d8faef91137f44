// SPDX-License-Identifier: MIT OR Apache-2.0

//! TCP transport against a loopback AI stub

use std::net::SocketAddr;
use std::time::Duration;

use abalone_core::{BoardState, ConnectionState, Limits};
use abalone_network::protocol::{decode_line, encode_line};
use abalone_network::{AiBridge, BridgeError, BridgeTimeouts, MoveRequest, MoveResponse, TcpTransport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use uuid::Uuid;

mod common;
use common::{first_legal_action, init_logging};

/// Serve `answers` requests, each preceded by a reply to an unknown id,
/// then hang up.
async fn spawn_stub(answers: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        for _ in 0..answers {
            let Some(line) = lines.next_line().await.unwrap() else {
                return;
            };
            let request: MoveRequest = decode_line(&line).unwrap();
            let action = first_legal_action(&request);

            let stray = MoveResponse {
                request_id: Uuid::new_v4(),
                action: action.clone(),
            };
            let answer = MoveResponse {
                request_id: request.request_id,
                action,
            };
            write.write_all(encode_line(&stray).unwrap().as_bytes()).await.unwrap();
            write.write_all(encode_line(&answer).unwrap().as_bytes()).await.unwrap();
        }
        // Wait for the client's next line (or EOF), then drop the connection
        let _ = lines.next_line().await;
    });
    addr
}

#[tokio::test]
async fn request_round_trip_over_tcp() {
    init_logging();
    let addr = spawn_stub(2).await;
    let mut bridge = AiBridge::new(Box::new(TcpTransport::new(addr.to_string())), BridgeTimeouts::default());
    assert_eq!(bridge.connect().await, ConnectionState::Connected);

    let board = BoardState::default();
    for turn in [1, 2] {
        let action = bridge.request_move(board, turn, &Limits::default()).await.unwrap();
        assert_eq!(action.turn, turn);
        assert_eq!(action.state, board);
        assert!(bridge.translate(&action, &board).is_ok());
    }

    bridge.close().await;
    assert_eq!(bridge.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn server_hang_up_is_a_connection_loss() {
    init_logging();
    let addr = spawn_stub(0).await;
    let mut bridge = AiBridge::new(Box::new(TcpTransport::new(addr.to_string())), BridgeTimeouts::default());
    assert_eq!(bridge.connect().await, ConnectionState::Connected);

    let err = bridge
        .request_move(BoardState::default(), 1, &Limits::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Closed | BridgeError::Io(_)), "{err}");
    assert!(err.is_connection_loss());

    bridge.report(&err);
    assert_eq!(bridge.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn nothing_listening_means_disconnected() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut bridge = AiBridge::new(Box::new(TcpTransport::new(addr.to_string())), BridgeTimeouts::default());
    assert_eq!(bridge.connect().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn answer_split_across_a_timeout_is_not_lost() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        // Half of the first answer, then nothing until the client asks again
        let first: MoveRequest = decode_line(&lines.next_line().await.unwrap().unwrap()).unwrap();
        let late = encode_line(&MoveResponse {
            request_id: first.request_id,
            action: first_legal_action(&first),
        })
        .unwrap();
        let (head, tail) = late.split_at(late.len() / 2);
        write.write_all(head.as_bytes()).await.unwrap();

        let second: MoveRequest = decode_line(&lines.next_line().await.unwrap().unwrap()).unwrap();
        let answer = encode_line(&MoveResponse {
            request_id: second.request_id,
            action: first_legal_action(&second),
        })
        .unwrap();
        write.write_all(tail.as_bytes()).await.unwrap();
        write.write_all(answer.as_bytes()).await.unwrap();
        let _ = lines.next_line().await;
    });

    let timeouts = BridgeTimeouts {
        connect: Duration::from_secs(1),
        request: Duration::from_millis(200),
    };
    let mut bridge = AiBridge::new(Box::new(TcpTransport::new(addr.to_string())), timeouts);
    assert_eq!(bridge.connect().await, ConnectionState::Connected);

    let board = BoardState::default();
    let first = bridge.request_move(board, 1, &Limits::default()).await;
    assert!(matches!(first, Err(BridgeError::Timeout(_))), "{first:?}");

    let second = bridge.request_move(board, 1, &Limits::default()).await.unwrap();
    assert_eq!(second.turn, 1);
    assert_eq!(second.state, board);
}
