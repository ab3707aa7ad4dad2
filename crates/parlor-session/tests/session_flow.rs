//! Session scenarios driven through in-memory channels.
//!
//! No transport is involved: each "client" is an `mpsc` receiver, and
//! every message caused by a request is already queued when `handle`
//! returns, so `try_recv` is enough to observe it.

use std::sync::Arc;
use std::time::Duration;

use parlor_protocol::{ClientMessage, PlayerId, PlayerInfo, RoomCode, ServerMessage};
use parlor_room::RegistryConfig;
use parlor_session::{Lobby, Session, SessionError, SessionState};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

type Inbox = mpsc::UnboundedReceiver<ServerMessage>;

fn lobby() -> Arc<Lobby> {
    Arc::new(Lobby::new(RegistryConfig::default()))
}

async fn connect(lobby: &Arc<Lobby>) -> (Session, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (lobby.connect(tx).await, rx)
}

fn create(name: &str, color: &str) -> ClientMessage {
    ClientMessage::CreateRoom {
        name: name.into(),
        color: color.into(),
    }
}

fn join(code: &RoomCode, name: &str, color: &str) -> ClientMessage {
    ClientMessage::JoinRoom {
        room_code: code.clone(),
        name: name.into(),
        color: color.into(),
    }
}

/// Everything queued for a client so far.
fn drain(inbox: &mut Inbox) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = inbox.try_recv() {
        out.push(msg);
    }
    out
}

fn info(id: &PlayerId, name: &str, color: &str) -> PlayerInfo {
    PlayerInfo {
        id: id.clone(),
        name: name.into(),
        color: color.into(),
    }
}

fn players_update(players: Vec<PlayerInfo>) -> ServerMessage {
    ServerMessage::PlayersUpdate { players }
}

/// Creates a room as "Ann" and returns its code, discarding Ann's inbox.
async fn open_room(session: &mut Session, inbox: &mut Inbox) -> RoomCode {
    session.handle(create("Ann", "red")).await.unwrap();
    drain(inbox);
    session.room_code().cloned().expect("creator is in the room")
}

// =========================================================================
// Create / join
// =========================================================================

#[tokio::test]
async fn test_create_room_acks_and_broadcasts_creator() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;

    a.handle(create("Ann", "red")).await.unwrap();

    let code = a.room_code().cloned().unwrap();
    assert!(code.is_well_formed());
    assert_eq!(
        drain(&mut a_rx),
        vec![
            ServerMessage::RoomJoined { room_code: code.clone() },
            players_update(vec![info(a.player_id(), "Ann", "red")]),
        ]
    );
    assert!(lobby.room_exists(&code).await);
}

#[tokio::test]
async fn test_join_room_broadcasts_roster_in_join_order() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let (mut b, mut b_rx) = connect(&lobby).await;
    let code = open_room(&mut a, &mut a_rx).await;

    b.handle(join(&code, "Bo", "blue")).await.unwrap();

    let roster = vec![
        info(a.player_id(), "Ann", "red"),
        info(b.player_id(), "Bo", "blue"),
    ];
    assert_eq!(
        drain(&mut b_rx),
        vec![
            ServerMessage::RoomJoined { room_code: code.clone() },
            players_update(roster.clone()),
        ]
    );
    assert_eq!(drain(&mut a_rx), vec![players_update(roster)]);
    assert_eq!(b.state(), &SessionState::InRoom(code));
}

#[tokio::test]
async fn test_join_missing_room_sends_single_error() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let (mut b, mut b_rx) = connect(&lobby).await;
    let code = open_room(&mut a, &mut a_rx).await;
    let missing = if code.as_str() == "9999" {
        RoomCode::new("0000")
    } else {
        RoomCode::new("9999")
    };

    let result = b.handle(join(&missing, "Bo", "blue")).await;

    assert!(matches!(result, Err(SessionError::RoomNotFound(_))));
    assert_eq!(drain(&mut b_rx), vec![ServerMessage::error("Room not found")]);
    assert!(drain(&mut a_rx).is_empty());
    assert_eq!(b.state(), &SessionState::Unjoined);
    assert_eq!(lobby.room_count().await, 1);
    assert_eq!(lobby.members(&code).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_message_is_ignored() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;

    a.handle(ClientMessage::Unknown).await.unwrap();

    assert!(drain(&mut a_rx).is_empty());
    assert_eq!(a.state(), &SessionState::Unjoined);
    assert_eq!(lobby.room_count().await, 0);
}

#[tokio::test]
async fn test_create_room_when_codes_exhausted_reports_server_full() {
    let lobby = Arc::new(Lobby::new(RegistryConfig { max_code_attempts: 0 }));
    let (mut a, mut a_rx) = connect(&lobby).await;

    let result = a.handle(create("Ann", "red")).await;

    assert!(matches!(result, Err(SessionError::ServerFull(_))));
    assert_eq!(drain(&mut a_rx), vec![ServerMessage::error("Server full")]);
    assert_eq!(a.state(), &SessionState::Unjoined);
}

#[tokio::test]
async fn test_reject_sends_error_without_state_change() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let code = open_room(&mut a, &mut a_rx).await;

    a.reject("Invalid message").await.unwrap();

    assert_eq!(drain(&mut a_rx), vec![ServerMessage::error("Invalid message")]);
    assert_eq!(a.state(), &SessionState::InRoom(code));
}

// =========================================================================
// Disconnect
// =========================================================================

#[tokio::test]
async fn test_disconnect_scenario_from_two_to_none() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let (mut b, mut b_rx) = connect(&lobby).await;
    let code = open_room(&mut a, &mut a_rx).await;
    b.handle(join(&code, "Bo", "blue")).await.unwrap();
    drain(&mut b_rx);

    a.close().await;

    assert_eq!(
        drain(&mut b_rx),
        vec![players_update(vec![info(b.player_id(), "Bo", "blue")])]
    );
    assert!(lobby.room_exists(&code).await);

    b.close().await;
    assert!(!lobby.room_exists(&code).await);

    let (mut c, mut c_rx) = connect(&lobby).await;
    let result = c.handle(join(&code, "Cy", "green")).await;
    assert!(matches!(result, Err(SessionError::RoomNotFound(_))));
    assert_eq!(drain(&mut c_rx), vec![ServerMessage::error("Room not found")]);
}

#[tokio::test]
async fn test_disconnect_sends_exactly_one_update_per_remaining_member() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let (mut b, mut b_rx) = connect(&lobby).await;
    let (mut c, mut c_rx) = connect(&lobby).await;
    let code = open_room(&mut a, &mut a_rx).await;
    b.handle(join(&code, "Bo", "blue")).await.unwrap();
    c.handle(join(&code, "Cy", "green")).await.unwrap();
    drain(&mut a_rx);
    drain(&mut b_rx);
    drain(&mut c_rx);

    b.close().await;

    let expected = players_update(vec![
        info(a.player_id(), "Ann", "red"),
        info(c.player_id(), "Cy", "green"),
    ]);
    assert_eq!(drain(&mut a_rx), vec![expected.clone()]);
    assert_eq!(drain(&mut c_rx), vec![expected]);
    assert_eq!(lobby.members(&code).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_close_unjoined_session_only_unregisters() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    assert_eq!(lobby.connection_count().await, 1);

    a.close().await;
    a.close().await;

    assert_eq!(a.state(), &SessionState::Closed);
    assert_eq!(lobby.connection_count().await, 0);
    assert_eq!(lobby.room_count().await, 0);
    // The hub held the only sender.
    assert!(a_rx.recv().await.is_none());
}

#[tokio::test]
async fn test_handle_after_close_is_rejected() {
    let lobby = lobby();
    let (mut a, _a_rx) = connect(&lobby).await;
    a.close().await;

    let result = a.handle(create("Ann", "red")).await;
    assert!(matches!(result, Err(SessionError::Closed(_))));
    assert_eq!(lobby.room_count().await, 0);
}

#[tokio::test]
async fn test_dropped_session_is_cleaned_up() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let (mut b, mut b_rx) = connect(&lobby).await;
    let code = open_room(&mut a, &mut a_rx).await;
    b.handle(join(&code, "Bo", "blue")).await.unwrap();
    drain(&mut b_rx);
    let b_id = b.player_id().clone();

    drop(b);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let roster = lobby.members(&code).await.unwrap();
    assert!(roster.iter().all(|p| p.id != b_id));
    assert_eq!(lobby.connection_count().await, 1);
    // Ann saw Bo join, then leave.
    let seen = drain(&mut a_rx);
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[1],
        players_update(vec![info(a.player_id(), "Ann", "red")])
    );
}

// =========================================================================
// Room switching
// =========================================================================

#[tokio::test]
async fn test_create_while_in_room_leaves_previous_room() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let (mut b, mut b_rx) = connect(&lobby).await;
    let first = open_room(&mut a, &mut a_rx).await;
    b.handle(join(&first, "Bo", "blue")).await.unwrap();
    drain(&mut a_rx);
    drain(&mut b_rx);

    a.handle(create("Ann", "red")).await.unwrap();
    let second = a.room_code().cloned().unwrap();

    assert_ne!(first, second);
    assert_eq!(
        drain(&mut b_rx),
        vec![players_update(vec![info(b.player_id(), "Bo", "blue")])]
    );
    assert_eq!(
        drain(&mut a_rx),
        vec![
            ServerMessage::RoomJoined { room_code: second.clone() },
            players_update(vec![info(a.player_id(), "Ann", "red")]),
        ]
    );
    assert_eq!(lobby.room_count().await, 2);
}

#[tokio::test]
async fn test_join_other_room_deletes_emptied_room() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let (mut b, mut b_rx) = connect(&lobby).await;
    let a_room = open_room(&mut a, &mut a_rx).await;
    b.handle(create("Bo", "blue")).await.unwrap();
    let b_room = b.room_code().cloned().unwrap();
    drain(&mut b_rx);

    b.handle(join(&a_room, "Bo", "blue")).await.unwrap();

    assert!(!lobby.room_exists(&b_room).await);
    assert_eq!(lobby.members(&a_room).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejoin_current_room_does_not_duplicate() {
    let lobby = lobby();
    let (mut a, mut a_rx) = connect(&lobby).await;
    let code = open_room(&mut a, &mut a_rx).await;

    a.handle(join(&code, "Ann", "red")).await.unwrap();

    assert_eq!(lobby.members(&code).await.unwrap().len(), 1);
    assert_eq!(
        drain(&mut a_rx),
        vec![
            ServerMessage::RoomJoined { room_code: code },
            players_update(vec![info(a.player_id(), "Ann", "red")]),
        ]
    );
}

// =========================================================================
// Identity and concurrency
// =========================================================================

#[tokio::test]
async fn test_each_connection_gets_distinct_identity() {
    let lobby = lobby();
    let mut sessions = Vec::new();
    for _ in 0..50 {
        sessions.push(connect(&lobby).await);
    }

    let mut ids: Vec<_> = sessions.iter().map(|(s, _)| s.player_id().clone()).collect();
    ids.sort_by(|x, y| x.as_str().cmp(y.as_str()));
    ids.dedup();
    assert_eq!(ids.len(), 50);
    assert!(ids.iter().all(|id| id.as_str().len() == 8));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_converge_on_full_roster() {
    const JOINERS: usize = 24;

    let lobby = lobby();
    let (mut host, mut host_rx) = connect(&lobby).await;
    let code = open_room(&mut host, &mut host_rx).await;

    let mut tasks = Vec::new();
    for i in 0..JOINERS {
        let lobby = Arc::clone(&lobby);
        let code = code.clone();
        tasks.push(tokio::spawn(async move {
            let (mut session, inbox) = connect(&lobby).await;
            session
                .handle(join(&code, &format!("p{i}"), "grey"))
                .await
                .unwrap();
            (session, inbox)
        }));
    }

    let mut joined = Vec::new();
    for task in tasks {
        joined.push(task.await.unwrap());
    }

    let roster = lobby.members(&code).await.unwrap();
    assert_eq!(roster.len(), JOINERS + 1);

    // Broadcasts are serialized, so the last update anyone saw is the
    // full roster, identical for all members.
    for (_, inbox) in joined.iter_mut() {
        let last = drain(inbox).pop().expect("member received updates");
        assert_eq!(last, players_update(roster.clone()));
    }
    assert_eq!(drain(&mut host_rx).pop().unwrap(), players_update(roster));
}
