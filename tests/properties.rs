use proptest::prelude::*;
use roomchat::{
    format::{escape, format_message_content},
    store::{ChatStore, LoginError, RoomError, RoomId},
};

proptest! {
    #[test]
    fn login_succeeds_once_per_name_ignoring_case(name in "[a-zA-Z]{3,12}") {
        let mut store = ChatStore::new();
        prop_assert!(store.login(&name).is_ok());
        prop_assert_eq!(store.login(&name.to_uppercase()), Err(LoginError::Taken));
        prop_assert_eq!(store.login(&name.to_lowercase()), Err(LoginError::Taken));
    }

    #[test]
    fn short_names_are_rejected(name in "[a-z]{1,2}") {
        let mut store = ChatStore::new();
        prop_assert_eq!(store.login(&name), Err(LoginError::TooShort));
        prop_assert!(!store.is_active(&name));
    }

    #[test]
    fn room_ids_have_no_whitespace_or_capitals(name in "[A-Za-z ]{1,20}[A-Za-z]") {
        let id = RoomId::from_name(&name);
        prop_assert!(!id.as_str().chars().any(char::is_whitespace));
        prop_assert!(!id.as_str().chars().any(char::is_uppercase));
    }

    #[test]
    fn second_create_with_same_id_fails(name in "[A-Za-z][A-Za-z ]{0,15}") {
        let mut store = ChatStore::new();
        let id = store.create_room(&name).unwrap();
        prop_assert_eq!(
            store.create_room(&name.to_uppercase()),
            Err(RoomError::AlreadyExists(id))
        );
    }

    #[test]
    fn stored_content_is_the_trimmed_input(content in "[ -~]{0,40}[!-~]") {
        let mut store = ChatStore::with_rooms(["General"]).unwrap();
        let id = store.login("tester").unwrap();
        let general = RoomId::from("general");
        store.join_room(id, &general).unwrap();
        store.send_message(id, &content).unwrap();
        let last = store.messages(&general).unwrap().last().unwrap();
        prop_assert_eq!(last.content(), content.trim());
    }

    #[test]
    fn text_without_markup_is_only_escaped(text in "[a-zA-Z0-9 .,!?<>&\n]{0,60}") {
        prop_assert_eq!(format_message_content(&text), escape(&text));
    }

    #[test]
    fn formatter_never_panics(text in "\\PC{0,80}") {
        let _ = format_message_content(&text);
    }
}
