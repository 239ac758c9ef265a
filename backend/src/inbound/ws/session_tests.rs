//! WebSocket session tests against a real listener.

use std::time::Duration;

use crate::domain::ports::GadgetCommand;
use crate::domain::{GadgetDraft, GadgetName, OwnerGroup, UserId};
use crate::inbound::ws;
use crate::test_support::TestHarness;
use actix_web::{App, HttpServer, dev::ServerHandle, web};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message as ClientMessage};
use futures_util::{SinkExt, StreamExt};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

struct Running {
    harness: TestHarness,
    url: String,
    _server: ServerHandle,
}

#[fixture]
async fn running() -> Running {
    let harness = TestHarness::new();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let ws_state = harness.ws_state();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(ws_state.clone()))
            .service(ws::gadget_events)
    })
    .workers(1)
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    Running {
        harness,
        url: format!("http://{addr}/ws/gadgets/"),
        _server: handle,
    }
}

async fn connect(running: &Running, owner: UserId) -> Socket {
    let token = running.harness.access_token(owner);
    let (_resp, socket) = awc::Client::default()
        .ws(format!("{}?token={token}", running.url))
        .connect()
        .await
        .expect("websocket connect");
    socket
}

async fn next_json(socket: &mut Socket) -> Value {
    let read = async {
        loop {
            let frame = socket.next().await.expect("response frame").expect("frame");
            match frame {
                Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json frame"),
                Frame::Ping(_) | Frame::Pong(_) => continue,
                other => panic!("expected text frame, got {other:?}"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(2), read)
        .await
        .expect("frame within timeout")
}

async fn wait_for_members(running: &Running, owner: UserId, expected: usize) {
    let group = OwnerGroup::for_owner(owner);
    for _ in 0..100 {
        if running.harness.registry().member_count(&group) == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("group never reached {expected} members");
}

#[rstest]
#[actix_rt::test]
async fn ping_gets_exactly_one_pong(#[future] running: Running) {
    let running = running.await;
    let mut socket = connect(&running, running.harness.alice()).await;

    socket
        .send(ClientMessage::Text(json!({"type": "ping"}).to_string().into()))
        .await
        .expect("send ping");
    let pong = next_json(&mut socket).await;
    assert_eq!(pong, json!({"type": "pong"}));

    // A second ping proves nothing else was queued in between.
    socket
        .send(ClientMessage::Text(json!({"type": "ping"}).to_string().into()))
        .await
        .expect("send ping");
    assert_eq!(next_json(&mut socket).await, json!({"type": "pong"}));
}

#[rstest]
#[actix_rt::test]
async fn other_text_is_ignored(#[future] running: Running) {
    let running = running.await;
    let mut socket = connect(&running, running.harness.alice()).await;

    for text in [r#"{"type":"hello"}"#, "not json", "[1,2,3]"] {
        socket
            .send(ClientMessage::Text(text.into()))
            .await
            .expect("send text");
    }
    socket
        .send(ClientMessage::Text(r#"{"type":"ping"}"#.into()))
        .await
        .expect("send ping");

    assert_eq!(next_json(&mut socket).await, json!({"type": "pong"}));
}

#[rstest]
#[actix_rt::test]
async fn protocol_ping_is_answered(#[future] running: Running) {
    let running = running.await;
    let mut socket = connect(&running, running.harness.alice()).await;

    socket
        .send(ClientMessage::Ping("hb".into()))
        .await
        .expect("send ping");

    let frame = tokio::time::timeout(Duration::from_secs(2), socket.next())
        .await
        .expect("frame within timeout")
        .expect("frame")
        .expect("decoded");
    assert!(matches!(frame, Frame::Pong(ref payload) if &payload[..] == b"hb"));
}

#[rstest]
#[actix_rt::test]
async fn owner_events_are_pushed_as_frames(#[future] running: Running) {
    let running = running.await;
    let alice = running.harness.alice();
    let mut socket = connect(&running, alice).await;
    let service = running.harness.gadget_service();

    let draft = GadgetDraft::new(GadgetName::new("Smart Watch Pro").expect("name"), None);
    let created = service.create(alice, draft).await.expect("create");

    let frame = next_json(&mut socket).await;
    assert_eq!(frame["action"], "created");
    assert_eq!(frame["gadget_id"], created.id().get());
    assert_eq!(frame["gadget"]["name"], "Smart Watch Pro");
}

#[rstest]
#[actix_rt::test]
async fn client_close_leaves_the_group(#[future] running: Running) {
    let running = running.await;
    let alice = running.harness.alice();
    let mut socket = connect(&running, alice).await;
    wait_for_members(&running, alice, 1).await;

    socket
        .send(ClientMessage::Close(None))
        .await
        .expect("send close");

    wait_for_members(&running, alice, 0).await;
    assert_eq!(running.harness.registry().group_count(), 0);
}

#[rstest]
#[case::expired(true)]
#[case::missing(false)]
#[actix_rt::test]
async fn bad_token_is_refused_without_joining(
    #[future] running: Running,
    #[case] send_expired: bool,
) {
    let running = running.await;
    let url = if send_expired {
        let token = running
            .harness
            .expired_access_token(running.harness.alice());
        format!("{}?token={token}", running.url)
    } else {
        running.url.clone()
    };

    let Err(error) = awc::Client::default().ws(url).connect().await else {
        panic!("upgrade should be refused");
    };

    assert!(
        matches!(
            error,
            awc::error::WsClientError::InvalidResponseStatus(status)
                if status == actix_web::http::StatusCode::FORBIDDEN
        ),
        "unexpected error: {error:?}"
    );
    assert_eq!(running.harness.registry().group_count(), 0);
}
