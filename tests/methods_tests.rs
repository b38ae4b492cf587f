//! Wire tests for the endpoint methods: each one posts to its Bot API method
//! with the parameters it was given and nothing that was left unset.

mod common;

use common::*;
use mockito::Matcher;
use serde_json::json;
use tgbot_rs::{
    AnswerCallbackQuery, AnswerInlineQuery, AnswerShippingQuery, ChatAction, EditMessageText,
    ForwardMessage, GetUpdates, LabeledPrice, ParseMode, SendInvoice, SendLocation, SendMessage,
    SetGameScore,
};

fn form(pairs: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        pairs
            .iter()
            .map(|(name, value)| Matcher::UrlEncoded((*name).to_string(), (*value).to_string()))
            .collect(),
    )
}

#[tokio::test]
async fn test_send_message_with_options() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage").as_str())
        .match_body(form(&[
            ("chat_id", "@news"),
            ("text", "*bold*"),
            ("parse_mode", "Markdown"),
            ("disable_notification", "true"),
        ]))
        .with_body(ok_body(json!({"message_id": 5})))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut params = SendMessage::new("@news", "*bold*");
    params.parse_mode = Some(ParseMode::Markdown);
    params.disable_notification = Some(true);
    let message = client.send_message(params).await.unwrap();

    assert_eq!(message["message_id"], 5);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unset_parameters_are_not_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage").as_str())
        .match_body(Matcher::Regex("^(chat_id=1&text=hi|text=hi&chat_id=1)$".to_string()))
        .with_body(ok_body(json!({"message_id": 6})))
        .create_async()
        .await;

    let client = client_for(&server.url());
    client.send_message(SendMessage::new(1, "hi")).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_updates_long_polling() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("getUpdates").as_str())
        .match_body(form(&[
            ("offset", "100"),
            ("timeout", "30"),
            ("allowed_updates", r#"["message","callback_query"]"#),
        ]))
        .with_body(ok_body(json!([{"update_id": 100}])))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let updates = client
        .get_updates(GetUpdates {
            offset: Some(100),
            timeout: Some(30),
            allowed_updates: Some(vec!["message".to_string(), "callback_query".to_string()]),
            ..GetUpdates::default()
        })
        .await
        .unwrap();

    assert_eq!(updates[0]["update_id"], 100);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_methods() {
    let mut server = mockito::Server::new_async().await;
    let client = client_for(&server.url());

    let cases: [(&str, Vec<(&str, &str)>); 4] = [
        ("getChat", vec![("chat_id", "-1001")]),
        ("leaveChat", vec![("chat_id", "-1001")]),
        ("getChatMember", vec![("chat_id", "-1001"), ("user_id", "77")]),
        ("kickChatMember", vec![("chat_id", "-1001"), ("user_id", "77")]),
    ];
    let mut mocks = Vec::new();
    for (method, fields) in &cases {
        mocks.push(
            server
                .mock("POST", method_path(method).as_str())
                .match_body(form(fields))
                .with_body(ok_body(json!(true)))
                .expect(1)
                .create_async()
                .await,
        );
    }

    client.get_chat(-1001).await.unwrap();
    client.leave_chat(-1001).await.unwrap();
    client.get_chat_member(-1001, 77).await.unwrap();
    client.kick_chat_member(-1001, 77).await.unwrap();

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_send_chat_action() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendChatAction").as_str())
        .match_body(form(&[("chat_id", "9"), ("action", "upload_document")]))
        .with_body(ok_body(json!(true)))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let result = client
        .send_chat_action(9, ChatAction::UploadDocument)
        .await
        .unwrap();

    assert_eq!(result, json!(true));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_forward_and_location() {
    let mut server = mockito::Server::new_async().await;
    let forward = server
        .mock("POST", method_path("forwardMessage").as_str())
        .match_body(form(&[("chat_id", "1"), ("from_chat_id", "2"), ("message_id", "3")]))
        .with_body(ok_body(json!({"message_id": 4})))
        .create_async()
        .await;
    let location = server
        .mock("POST", method_path("sendLocation").as_str())
        .match_body(form(&[("latitude", "52.52"), ("longitude", "13.405")]))
        .with_body(ok_body(json!({"message_id": 5})))
        .create_async()
        .await;

    let client = client_for(&server.url());
    client
        .forward_message(ForwardMessage::new(1, 2, 3))
        .await
        .unwrap();
    client
        .send_location(SendLocation::new(1, 52.52, 13.405))
        .await
        .unwrap();

    forward.assert_async().await;
    location.assert_async().await;
}

#[tokio::test]
async fn test_callback_and_inline_answers() {
    let mut server = mockito::Server::new_async().await;
    let callback = server
        .mock("POST", method_path("answerCallbackQuery").as_str())
        .match_body(form(&[("callback_query_id", "cb-1"), ("show_alert", "true")]))
        .with_body(ok_body(json!(true)))
        .create_async()
        .await;
    let inline = server
        .mock("POST", method_path("answerInlineQuery").as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("inline_query_id".to_string(), "iq-1".to_string()),
            Matcher::Regex("results=%5B%7B".to_string()),
        ]))
        .with_body(ok_body(json!(true)))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut answer = AnswerCallbackQuery::new("cb-1");
    answer.show_alert = Some(true);
    client.answer_callback_query(answer).await.unwrap();

    let results = json!([{
        "type": "article",
        "id": "1",
        "title": "Hi",
        "input_message_content": {"message_text": "Hi"}
    }]);
    client
        .answer_inline_query(AnswerInlineQuery::new("iq-1", results))
        .await
        .unwrap();

    callback.assert_async().await;
    inline.assert_async().await;
}

#[tokio::test]
async fn test_edit_inline_message_returns_true() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("editMessageText").as_str())
        .match_body(form(&[("text", "updated"), ("inline_message_id", "AAQ")]))
        .with_body(ok_body(json!(true)))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let result = client
        .edit_message_text(EditMessageText::new("updated").inline("AAQ"))
        .await
        .unwrap();

    assert_eq!(result, json!(true));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_payment_methods_encode_lists_as_json() {
    let mut server = mockito::Server::new_async().await;
    let invoice = server
        .mock("POST", method_path("sendInvoice").as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("currency".to_string(), "EUR".to_string()),
            Matcher::UrlEncoded("payload".to_string(), "order-1".to_string()),
            Matcher::Regex("prices=%5B%7B".to_string()),
        ]))
        .with_body(ok_body(json!({"message_id": 8})))
        .create_async()
        .await;
    let shipping = server
        .mock("POST", method_path("answerShippingQuery").as_str())
        .match_body(form(&[
            ("shipping_query_id", "sq-1"),
            ("ok", "false"),
            ("error_message", "We do not ship there"),
        ]))
        .with_body(ok_body(json!(true)))
        .create_async()
        .await;

    let client = client_for(&server.url());
    client
        .send_invoice(SendInvoice::new(
            1,
            "Coffee",
            "A cup",
            "order-1",
            "provider-token",
            "coffee",
            "EUR",
            vec![LabeledPrice::new("Cup", 250)],
        ))
        .await
        .unwrap();

    let mut answer = AnswerShippingQuery::new("sq-1", false);
    answer.error_message = Some("We do not ship there".to_string());
    client.answer_shipping_query(answer).await.unwrap();

    invoice.assert_async().await;
    shipping.assert_async().await;
}

#[tokio::test]
async fn test_set_game_score() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("setGameScore").as_str())
        .match_body(form(&[("user_id", "77"), ("score", "1500"), ("force", "true")]))
        .with_body(ok_body(json!(true)))
        .create_async()
        .await;

    let client = client_for(&server.url());
    let mut params = SetGameScore::new(77, 1500);
    params.force = Some(true);
    client.set_game_score(params).await.unwrap();

    mock.assert_async().await;
}
