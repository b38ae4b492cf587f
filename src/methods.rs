//! One method on [`Client`] per Bot API method.
//!
//! Every method returns the raw `result` of the response envelope. Callers
//! deserialize it into whatever types they model.

use crate::client::Client;
use crate::errors::BotError;
use crate::http::common::Method;
use crate::http::files::{FileKind, ResolvedFile};
use crate::params::{
    AnswerCallbackQuery, AnswerInlineQuery, AnswerPreCheckoutQuery, AnswerShippingQuery,
    ChatAction, ChatId, EditMessageCaption, EditMessageReplyMarkup, EditMessageText,
    ForwardMessage, GetGameHighScores, GetUpdates, GetUserProfilePhotos, SendAudio, SendContact,
    SendDocument, SendGame, SendInvoice, SendLocation, SendMessage, SendPhoto, SendSticker,
    SendVenue, SendVideo, SendVideoNote, SendVoice, SetGameScore, SetWebhook,
};
use crate::payload::{Payload, generate_payload};
use serde::Serialize;
use serde_json::{Value, json};

/// Builds the payload of a call from its parameter struct.
fn payload_of<T: Serialize>(params: &T, exclude: &[&str]) -> Result<Payload, BotError> {
    Ok(generate_payload(serde_json::to_value(params)?, exclude))
}

impl Client {
    // --- Updates and webhooks ---

    /// Returns basic information about the bot.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_me(&self) -> Result<Value, BotError> {
        self.request(Method::GetMe, None, None).await
    }

    /// Polls for incoming updates.
    ///
    /// With long polling, the client's `timeout` must be longer than `params.timeout`.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_updates(&self, params: GetUpdates) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::GetUpdates, Some(payload), None).await
    }

    /// Registers a webhook, uploading the certificate when one is given.
    ///
    /// # Errors
    ///
    /// See [`Client::request`]. Reading the certificate can fail with [`BotError::Io`].
    pub async fn set_webhook(&self, params: SetWebhook) -> Result<Value, BotError> {
        let mut payload = payload_of(&params, &["certificate"])?;
        let files = match params.certificate {
            Some(certificate) => match certificate.resolve("certificate").await? {
                ResolvedFile::Reference(id) => {
                    payload.insert("certificate", id);
                    None
                }
                ResolvedFile::Upload(part) => Some(vec![part]),
            },
            None => None,
        };
        self.request(Method::SetWebhook, Some(payload), files).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete_webhook(&self) -> Result<Value, BotError> {
        self.request(Method::DeleteWebhook, Some(Payload::new()), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_webhook_info(&self) -> Result<Value, BotError> {
        self.request(Method::GetWebhookInfo, Some(Payload::new()), None)
            .await
    }

    // --- Messages ---

    /// Sends a text message.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn send_message(&self, params: SendMessage) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::SendMessage, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn forward_message(&self, params: ForwardMessage) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::ForwardMessage, Some(payload), None)
            .await
    }

    // --- Media ---

    /// Sends a photo by `file_id` or upload.
    ///
    /// # Errors
    ///
    /// See [`Client::send_file`].
    pub async fn send_photo(&self, params: SendPhoto) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[FileKind::Photo.field_name()])?;
        self.send_file(FileKind::Photo, params.photo, payload).await
    }

    /// # Errors
    ///
    /// See [`Client::send_file`].
    pub async fn send_audio(&self, params: SendAudio) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[FileKind::Audio.field_name()])?;
        self.send_file(FileKind::Audio, params.audio, payload).await
    }

    /// # Errors
    ///
    /// See [`Client::send_file`].
    pub async fn send_document(&self, params: SendDocument) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[FileKind::Document.field_name()])?;
        self.send_file(FileKind::Document, params.document, payload)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::send_file`].
    pub async fn send_sticker(&self, params: SendSticker) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[FileKind::Sticker.field_name()])?;
        self.send_file(FileKind::Sticker, params.sticker, payload)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::send_file`].
    pub async fn send_video(&self, params: SendVideo) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[FileKind::Video.field_name()])?;
        self.send_file(FileKind::Video, params.video, payload).await
    }

    /// # Errors
    ///
    /// See [`Client::send_file`].
    pub async fn send_voice(&self, params: SendVoice) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[FileKind::Voice.field_name()])?;
        self.send_file(FileKind::Voice, params.voice, payload).await
    }

    /// # Errors
    ///
    /// See [`Client::send_file`].
    pub async fn send_video_note(&self, params: SendVideoNote) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[FileKind::VideoNote.field_name()])?;
        self.send_file(FileKind::VideoNote, params.video_note, payload)
            .await
    }

    // --- Locations and contacts ---

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn send_location(&self, params: SendLocation) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::SendLocation, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn send_venue(&self, params: SendVenue) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::SendVenue, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn send_contact(&self, params: SendContact) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::SendContact, Some(payload), None).await
    }

    /// Shows a status such as "typing..." in the chat for a few seconds.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn send_chat_action(
        &self,
        chat_id: impl Into<ChatId>,
        action: ChatAction,
    ) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id, "action": action}), &[])?;
        self.request(Method::SendChatAction, Some(payload), None)
            .await
    }

    // --- Users and chats ---

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_user_profile_photos(
        &self,
        params: GetUserProfilePhotos,
    ) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::GetUserProfilePhotos, Some(payload), None)
            .await
    }

    /// Looks up a file by id. The result's `file_path` feeds [`Client::download_file`].
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_file(&self, file_id: &str) -> Result<Value, BotError> {
        let payload = payload_of(&json!({"file_id": file_id}), &[])?;
        self.request(Method::GetFile, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn kick_chat_member(
        &self,
        chat_id: impl Into<ChatId>,
        user_id: i64,
    ) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id, "user_id": user_id}), &[])?;
        self.request(Method::KickChatMember, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn unban_chat_member(
        &self,
        chat_id: impl Into<ChatId>,
        user_id: i64,
    ) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id, "user_id": user_id}), &[])?;
        self.request(Method::UnbanChatMember, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn leave_chat(&self, chat_id: impl Into<ChatId>) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id}), &[])?;
        self.request(Method::LeaveChat, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_chat(&self, chat_id: impl Into<ChatId>) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id}), &[])?;
        self.request(Method::GetChat, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_chat_administrators(
        &self,
        chat_id: impl Into<ChatId>,
    ) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id}), &[])?;
        self.request(Method::GetChatAdministrators, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_chat_members_count(
        &self,
        chat_id: impl Into<ChatId>,
    ) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id}), &[])?;
        self.request(Method::GetChatMembersCount, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_chat_member(
        &self,
        chat_id: impl Into<ChatId>,
        user_id: i64,
    ) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(&json!({"chat_id": chat_id, "user_id": user_id}), &[])?;
        self.request(Method::GetChatMember, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn answer_callback_query(
        &self,
        params: AnswerCallbackQuery,
    ) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::AnswerCallbackQuery, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn answer_inline_query(&self, params: AnswerInlineQuery) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::AnswerInlineQuery, Some(payload), None)
            .await
    }

    // --- Editing ---
    //
    // Edits of inline messages return `true`; edits of chat messages return
    // the edited message.

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn edit_message_text(&self, params: EditMessageText) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::EditMessageText, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn edit_message_caption(
        &self,
        params: EditMessageCaption,
    ) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::EditMessageCaption, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn edit_message_reply_markup(
        &self,
        params: EditMessageReplyMarkup,
    ) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::EditMessageReplyMarkup, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete_message(
        &self,
        chat_id: impl Into<ChatId>,
        message_id: i64,
    ) -> Result<Value, BotError> {
        let chat_id: ChatId = chat_id.into();
        let payload = payload_of(
            &json!({"chat_id": chat_id, "message_id": message_id}),
            &[],
        )?;
        self.request(Method::DeleteMessage, Some(payload), None)
            .await
    }

    // --- Payments ---

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn send_invoice(&self, params: SendInvoice) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::SendInvoice, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn answer_shipping_query(
        &self,
        params: AnswerShippingQuery,
    ) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::AnswerShippingQuery, Some(payload), None)
            .await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn answer_pre_checkout_query(
        &self,
        params: AnswerPreCheckoutQuery,
    ) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::AnswerPreCheckoutQuery, Some(payload), None)
            .await
    }

    // --- Games ---

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn send_game(&self, params: SendGame) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::SendGame, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn set_game_score(&self, params: SetGameScore) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::SetGameScore, Some(payload), None).await
    }

    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get_game_high_scores(
        &self,
        params: GetGameHighScores,
    ) -> Result<Value, BotError> {
        let payload = payload_of(&params, &[])?;
        self.request(Method::GetGameHighScores, Some(payload), None)
            .await
    }
}
