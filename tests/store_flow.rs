//! End-to-end flows through the public store API, the way the web layer
//! drives it.

use roomchat::{
    format::format_message_content,
    store::{ChatStore, LoginError, Message, RoomError, RoomId, SendError, DEFAULT_ROOMS},
};

fn store() -> ChatStore {
    ChatStore::with_rooms(DEFAULT_ROOMS).unwrap().with_journal()
}

#[test]
fn two_users_chat_in_a_new_room() {
    let mut store = store();
    let alice = store.login("Alice").unwrap();
    let bob = store.login("bob").unwrap();

    let room = store.create_room("Rust Nerds").unwrap();
    assert_eq!(room, RoomId::from("rust-nerds"));
    store.join_room(alice, &room).unwrap();
    store.join_room(bob, &room).unwrap();
    store.send_message(alice, "hello").unwrap();
    store.send_message(bob, "**hi** alice").unwrap();

    let log = store.messages(&room).unwrap();
    let contents: Vec<_> = log.iter().map(Message::content).collect();
    assert_eq!(
        contents,
        [
            "Alice joined the room",
            "bob joined the room",
            "hello",
            "**hi** alice",
        ]
    );
    assert!(matches!(&log[0], Message::System { .. }));
    assert_eq!(log[2].author(), Some("Alice"));

    // formatting happens only when displayed
    assert_eq!(format_message_content(log[3].content()), "<strong>hi</strong> alice");

    let summary = store.summaries().into_iter().find(|s| s.id == room).unwrap();
    assert_eq!(summary.members, 2);
    assert_eq!(summary.name, "Rust Nerds");
}

#[test]
fn username_is_reusable_after_logout() {
    let mut store = store();
    let first = store.login("Carol").unwrap();
    assert_eq!(store.login("CAROL"), Err(LoginError::Taken));

    store.logout(first);
    let second = store.login("CAROL").unwrap();
    assert_ne!(first, second);
    assert_eq!(store.session(second).unwrap().username(), "CAROL");
}

#[test]
fn seeded_room_names_cannot_be_recreated() {
    let mut store = store();
    assert_eq!(
        store.create_room("tech talk"),
        Err(RoomError::AlreadyExists(RoomId::from("tech-talk")))
    );
    assert_eq!(store.rooms().count(), 3);
}

#[test]
fn moving_between_rooms_updates_both_logs() {
    let mut store = store();
    let dave = store.login("dave").unwrap();
    let general = RoomId::from("general");
    let random = RoomId::from("random");

    store.join_room(dave, &general).unwrap();
    store.drain_appended();
    store.join_room(dave, &random).unwrap();

    let appended = store.drain_appended();
    assert_eq!(appended.len(), 2);
    assert_eq!(appended[0].room, general);
    assert_eq!(appended[0].message.content(), "dave left the room");
    assert_eq!(appended[1].room, random);
    assert_eq!(appended[1].message.content(), "dave joined the room");

    assert!(!store.room(&general).unwrap().has_member("dave"));
    assert_eq!(store.current_room(dave).unwrap().id(), &random);
}

#[test]
fn logout_posts_leave_message_to_current_room() {
    let mut store = store();
    let erin = store.login("erin").unwrap();
    let general = RoomId::from("general");
    store.join_room(erin, &general).unwrap();
    store.drain_appended();

    store.logout(erin);
    let appended = store.drain_appended();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].message.content(), "erin left the room");
    assert_eq!(store.send_message(erin, "still here?"), Err(SendError::UnknownSession));

    // second logout does nothing
    store.logout(erin);
    assert!(store.drain_appended().is_empty());
}

#[test]
fn message_log_serializes_with_type_tags() {
    let mut store = store();
    let frank = store.login("frank").unwrap();
    let general = RoomId::from("general");
    store.join_room(frank, &general).unwrap();
    store.send_message(frank, "hey").unwrap();

    let json = serde_json::to_value(store.messages(&general).unwrap()).unwrap();
    assert_eq!(json[0]["type"], "system");
    assert_eq!(json[1]["type"], "user");
    assert_eq!(json[1]["author"], "frank");
    assert_eq!(json[1]["content"], "hey");
    assert!(json[1]["timestamp"].is_string());
}
