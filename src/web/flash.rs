use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "flash";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One-shot notification shown on the next rendered page. The payload rides
/// in a signed cookie and is cleared as soon as it is read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// Appends a message to the pending flash cookie.
pub fn push_flash(
    jar: SignedCookieJar,
    level: FlashLevel,
    message: impl Into<String>,
) -> SignedCookieJar {
    let mut messages = pending_messages(&jar);
    messages.push(Flash {
        level,
        message: message.into(),
    });

    let payload = serde_json::to_string(&messages).unwrap_or_default();
    let mut cookie = Cookie::new(FLASH_COOKIE, payload);
    cookie.set_path("/");
    cookie.set_http_only(true);
    jar.add(cookie)
}

/// Drains the pending messages, removing the cookie so they render once.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Vec<Flash>) {
    let messages = pending_messages(&jar);
    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), messages)
}

fn pending_messages(jar: &SignedCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    fn test_jar() -> SignedCookieJar {
        let key = Key::derive_from(b"feedback-app-secret-key-change-in-production");
        SignedCookieJar::new(key)
    }

    #[test]
    fn messages_round_trip_and_drain() {
        let jar = test_jar();
        let jar = push_flash(jar, FlashLevel::Success, "Form created successfully.");
        let jar = push_flash(jar, FlashLevel::Error, "Form not found.");

        let (jar, messages) = take_flash(jar);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, FlashLevel::Success);
        assert_eq!(messages[0].message, "Form created successfully.");
        assert_eq!(messages[1].level, FlashLevel::Error);

        let (_, drained) = take_flash(jar);
        assert!(drained.is_empty());
    }

    #[test]
    fn empty_jar_yields_no_messages() {
        let (_, messages) = take_flash(test_jar());
        assert!(messages.is_empty());
    }
}
