use crate::token::Token;

// --- URL Construction ---

/// Public Bot API host. Override with `ClientBuilder::api_url` for a local Bot API server.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot API methods this client knows how to call.
///
/// `as_str` gives the exact method name used in the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetMe,
    GetUpdates,
    SetWebhook,
    DeleteWebhook,
    GetWebhookInfo,
    SendMessage,
    ForwardMessage,
    SendPhoto,
    SendAudio,
    SendDocument,
    SendSticker,
    SendVideo,
    SendVoice,
    SendVideoNote,
    SendLocation,
    SendVenue,
    SendContact,
    SendChatAction,
    GetUserProfilePhotos,
    GetFile,
    KickChatMember,
    UnbanChatMember,
    LeaveChat,
    GetChat,
    GetChatAdministrators,
    GetChatMembersCount,
    GetChatMember,
    AnswerCallbackQuery,
    AnswerInlineQuery,
    EditMessageText,
    EditMessageCaption,
    EditMessageReplyMarkup,
    DeleteMessage,
    SendInvoice,
    AnswerShippingQuery,
    AnswerPreCheckoutQuery,
    SendGame,
    SetGameScore,
    GetGameHighScores,
}

impl Method {
    /// Wire name of the method, as it appears after `/bot<token>/`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetMe => "getMe",
            Self::GetUpdates => "getUpdates",
            Self::SetWebhook => "setWebhook",
            Self::DeleteWebhook => "deleteWebhook",
            Self::GetWebhookInfo => "getWebhookInfo",
            Self::SendMessage => "sendMessage",
            Self::ForwardMessage => "forwardMessage",
            Self::SendPhoto => "sendPhoto",
            Self::SendAudio => "sendAudio",
            Self::SendDocument => "sendDocument",
            Self::SendSticker => "sendSticker",
            Self::SendVideo => "sendVideo",
            Self::SendVoice => "sendVoice",
            Self::SendVideoNote => "sendVideoNote",
            Self::SendLocation => "sendLocation",
            Self::SendVenue => "sendVenue",
            Self::SendContact => "sendContact",
            Self::SendChatAction => "sendChatAction",
            Self::GetUserProfilePhotos => "getUserProfilePhotos",
            Self::GetFile => "getFile",
            Self::KickChatMember => "kickChatMember",
            Self::UnbanChatMember => "unbanChatMember",
            Self::LeaveChat => "leaveChat",
            Self::GetChat => "getChat",
            Self::GetChatAdministrators => "getChatAdministrators",
            Self::GetChatMembersCount => "getChatMembersCount",
            Self::GetChatMember => "getChatMember",
            Self::AnswerCallbackQuery => "answerCallbackQuery",
            Self::AnswerInlineQuery => "answerInlineQuery",
            Self::EditMessageText => "editMessageText",
            Self::EditMessageCaption => "editMessageCaption",
            Self::EditMessageReplyMarkup => "editMessageReplyMarkup",
            Self::DeleteMessage => "deleteMessage",
            Self::SendInvoice => "sendInvoice",
            Self::AnswerShippingQuery => "answerShippingQuery",
            Self::AnswerPreCheckoutQuery => "answerPreCheckoutQuery",
            Self::SendGame => "sendGame",
            Self::SetGameScore => "setGameScore",
            Self::GetGameHighScores => "getGameHighScores",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<api_url>/bot<token>/<Method>`
#[must_use]
pub fn construct_method_url(api_url: &str, token: &Token, method: Method) -> String {
    format!(
        "{}/bot{}/{}",
        api_url.trim_end_matches('/'),
        token.expose(),
        method.as_str()
    )
}

/// `<api_url>/file/bot<token>/<file_path>`
///
/// `file_path` is the value returned by `getFile`; a leading `/` is tolerated.
#[must_use]
pub fn construct_file_url(api_url: &str, token: &Token, file_path: &str) -> String {
    format!(
        "{}/file/bot{}/{}",
        api_url.trim_end_matches('/'),
        token.expose(),
        file_path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Token {
        Token::new("123456:secret-part").unwrap()
    }

    #[test]
    fn test_method_url() {
        let url = construct_method_url(DEFAULT_API_URL, &token(), Method::SendMessage);
        assert_eq!(url, "https://api.telegram.org/bot123456:secret-part/sendMessage");
    }

    #[test]
    fn test_method_url_trailing_slash_base() {
        let url = construct_method_url("http://127.0.0.1:8081/", &token(), Method::GetMe);
        assert_eq!(url, "http://127.0.0.1:8081/bot123456:secret-part/getMe");
    }

    #[test]
    fn test_file_url() {
        let url = construct_file_url(DEFAULT_API_URL, &token(), "photos/file_1.jpg");
        assert_eq!(
            url,
            "https://api.telegram.org/file/bot123456:secret-part/photos/file_1.jpg"
        );
    }

    #[test]
    fn test_file_url_leading_slash_path() {
        let url = construct_file_url(DEFAULT_API_URL, &token(), "/documents/a.pdf");
        assert!(url.ends_with("/bot123456:secret-part/documents/a.pdf"));
    }

    #[test]
    fn test_method_names_are_camel_case() {
        let methods = [
            (Method::GetMe, "getMe"),
            (Method::SendVideoNote, "sendVideoNote"),
            (Method::GetChatMembersCount, "getChatMembersCount"),
            (Method::AnswerPreCheckoutQuery, "answerPreCheckoutQuery"),
            (Method::EditMessageReplyMarkup, "editMessageReplyMarkup"),
        ];
        for (method, name) in methods {
            assert_eq!(method.as_str(), name);
            assert_eq!(method.to_string(), name);
        }
    }
}
