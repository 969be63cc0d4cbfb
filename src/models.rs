use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated identity and access credential obtained after login
///
/// Created on a successful login response and threaded explicitly through the
/// data facade; there is no ambient global. [`Session::invalidate`] is the
/// single defined invalidation point, used by `DataProvider::disconnect`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub connected: bool,
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    /// Create a connected session from a successful login response
    #[must_use]
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            connected: true,
            authenticated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected && !self.access_token.is_empty()
    }

    /// Invalidate the session after an explicit disconnect
    pub fn invalidate(&mut self) {
        self.connected = false;
        self.access_token.clear();
    }
}

/// Own profile as returned by the `me` resource
///
/// `display_pic_src` is not part of the remote response; the facade derives it
/// from the profile id after a successful fetch.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_pic_src: Option<String>,
}

/// A friend entry from the contacts listing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A photo album owned by the user
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// A single photo inside an album
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Photo {
    pub id: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// A liked page or interest entry
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LikedItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Category of liked items exposed by the facade
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeCategory {
    Music,
    Movies,
    Books,
    Games,
    Television,
    Interests,
}

impl LikeCategory {
    /// Resource segment under `me/` for this category
    #[must_use]
    pub fn as_path(self) -> &'static str {
        match self {
            LikeCategory::Music => "music",
            LikeCategory::Movies => "movies",
            LikeCategory::Books => "books",
            LikeCategory::Games => "games",
            LikeCategory::Television => "television",
            LikeCategory::Interests => "interests",
        }
    }
}

/// One-page listing envelope used by the remote API (`{ "data": [...] }`)
///
/// A response without a `data` field deserializes to an empty page; no
/// pagination beyond what the remote returns in one page is handled.
#[derive(Deserialize, Clone, Debug)]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new("100234", "EAAGtoken");
        assert!(session.is_connected());

        session.invalidate();
        assert!(!session.is_connected());
        assert!(session.access_token.is_empty());
        // Identity is retained after invalidation
        assert_eq!(session.user_id, "100234");
    }

    #[test]
    fn test_session_without_token_is_not_connected() {
        let mut session = Session::new("100234", "");
        session.connected = true;
        assert!(!session.is_connected());
    }

    #[test]
    fn test_paged_envelope_tolerates_missing_data() {
        let page: Paged<Contact> = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(page.data.is_empty());

        let page: Paged<Contact> = serde_json::from_value(serde_json::json!({
            "data": [{"id": "1", "name": "Ada"}, {"id": "2"}]
        }))
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].name, None);
    }

    #[test]
    fn test_like_category_paths() {
        assert_eq!(LikeCategory::Music.as_path(), "music");
        assert_eq!(LikeCategory::Television.as_path(), "television");
        assert_eq!(LikeCategory::Interests.as_path(), "interests");
    }
}
