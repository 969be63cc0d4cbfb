//! Data access facade over the remote boundary
//!
//! One method per remote resource. Each operation is a single round trip
//! delivering the raw or lightly reshaped response; response shapes are not
//! validated beyond checking the presence of expected fields.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::api::{ApiVerb, GraphApi, HttpGraphClient};
use crate::error::ProviderError;
use crate::models::{Album, Contact, LikeCategory, LikedItem, Paged, Photo, Session, UserProfile};
use crate::settings::FaceplateSettings;

/// Asynchronous post-filter predicate over the contacts listing
#[async_trait]
pub trait ContactFilter: Send + Sync {
    async fn filter(&self, contacts: Vec<Contact>) -> Vec<Contact>;
}

/// Facade over the remote data API, bound to one authenticated session
pub struct DataProvider {
    session: Session,
    api: Arc<dyn GraphApi>,
    graph_endpoint: String,
}

impl DataProvider {
    /// Bind a facade to a connected session and a remote boundary
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConnected`] if the session is not
    /// connected.
    pub fn new(
        session: Session,
        api: Arc<dyn GraphApi>,
        graph_endpoint: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        if !session.is_connected() {
            return Err(ProviderError::NotConnected);
        }
        Ok(Self {
            session,
            api,
            graph_endpoint: graph_endpoint.into(),
        })
    }

    /// Bind a facade backed by the HTTP client from settings
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not connected.
    pub fn from_settings(
        settings: &FaceplateSettings,
        session: Session,
    ) -> Result<Self, ProviderError> {
        let endpoint = settings.provider.graph_endpoint.clone();
        Self::new(
            session,
            Arc::new(HttpGraphClient::new(endpoint.clone())),
            endpoint,
        )
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Own profile with a derived picture URL appended
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the response lacks a
    /// profile shape.
    pub async fn user_details(&self) -> Result<UserProfile, ProviderError> {
        let value = self.request(ApiVerb::Get, "me", &[]).await?;
        let mut profile: UserProfile = serde_json::from_value(value)
            .map_err(|e| ProviderError::Decode(format!("Profile response: {e}")))?;
        profile.display_pic_src = Some(format!(
            "{}/{}/picture",
            self.graph_endpoint.trim_end_matches('/'),
            profile.id
        ));
        Ok(profile)
    }

    /// Source URL of the cover photo, or `None` when the profile has none
    ///
    /// Absence of the `cover.source` field is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the round trip itself fails.
    pub async fn cover_photo(&self) -> Result<Option<String>, ProviderError> {
        let value = self
            .request(ApiVerb::Get, "me", &[("fields", "cover")])
            .await?;
        Ok(value
            .get("cover")
            .and_then(|cover| cover.get("source"))
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    /// Arbitrary object lookup by identifier, delivered unreshaped
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails.
    pub async fn object(&self, id: &str) -> Result<Value, ProviderError> {
        self.request(ApiVerb::Get, id, &[]).await
    }

    /// Albums owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the listing does not
    /// decode.
    pub async fn albums(&self) -> Result<Vec<Album>, ProviderError> {
        self.paged(ApiVerb::Get, "me/albums", &[]).await
    }

    /// Photos inside an album, bounded by `limit`
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the listing does not
    /// decode.
    pub async fn album_photos(
        &self,
        album_id: &str,
        limit: u32,
    ) -> Result<Vec<Photo>, ProviderError> {
        let limit = limit.to_string();
        self.paged(
            ApiVerb::Get,
            &format!("{album_id}/photos"),
            &[("limit", limit.as_str())],
        )
        .await
    }

    /// Liked items for one category
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the listing does not
    /// decode.
    pub async fn liked(&self, category: LikeCategory) -> Result<Vec<LikedItem>, ProviderError> {
        self.paged(ApiVerb::Get, &format!("me/{}", category.as_path()), &[])
            .await
    }

    /// Friends list, one page
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the listing does not
    /// decode.
    pub async fn contacts(&self) -> Result<Vec<Contact>, ProviderError> {
        self.paged(ApiVerb::Get, "me/friends", &[]).await
    }

    /// Friends list post-filtered by a caller-supplied async predicate
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the listing does not
    /// decode.
    pub async fn contacts_filtered(
        &self,
        filter: &dyn ContactFilter,
    ) -> Result<Vec<Contact>, ProviderError> {
        let contacts = self.contacts().await?;
        Ok(filter.filter(contacts).await)
    }

    /// Friends shared with another user
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails or the listing does not
    /// decode.
    pub async fn mutual_friends(&self, user_id: &str) -> Result<Vec<Contact>, ProviderError> {
        self.paged(ApiVerb::Get, &format!("me/mutualfriends/{user_id}"), &[])
            .await
    }

    /// Revoke the granted permissions and invalidate the session
    ///
    /// # Errors
    ///
    /// Returns an error if the round trip fails; the session is only
    /// invalidated after the remote call succeeds.
    pub async fn disconnect(&mut self) -> Result<(), ProviderError> {
        self.request(ApiVerb::Delete, "me/permissions", &[]).await?;
        self.session.invalidate();
        Ok(())
    }

    /// One authenticated round trip
    async fn request(
        &self,
        verb: ApiVerb,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, ProviderError> {
        if !self.session.is_connected() {
            return Err(ProviderError::NotConnected);
        }
        let mut authed: Vec<(&str, &str)> =
            vec![("access_token", self.session.access_token.as_str())];
        authed.extend_from_slice(params);
        self.api.request(verb, path, &authed).await
    }

    /// Fetch a one-page listing and unwrap its `data` envelope
    async fn paged<T: DeserializeOwned>(
        &self,
        verb: ApiVerb,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, ProviderError> {
        let value = self.request(verb, path, params).await?;
        let page: Paged<T> = serde_json::from_value(value)
            .map_err(|e| ProviderError::Decode(format!("Listing from {path}: {e}")))?;
        Ok(page.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock::MockGraphApi;
    use crate::testing::TestFixtures;
    use serde_json::json;

    fn provider_with(mock: MockGraphApi) -> DataProvider {
        DataProvider::new(
            TestFixtures::session(),
            Arc::new(mock),
            "https://graph.facebook.com",
        )
        .unwrap()
    }

    #[test]
    fn test_from_settings_wires_the_http_client() {
        let settings = TestFixtures::settings();

        let provider = DataProvider::from_settings(&settings, TestFixtures::session()).unwrap();
        assert_eq!(provider.graph_endpoint, settings.provider.graph_endpoint);

        let mut session = TestFixtures::session();
        session.invalidate();
        let result = DataProvider::from_settings(&settings, session);
        assert!(matches!(result, Err(ProviderError::NotConnected)));
    }

    #[test]
    fn test_new_rejects_disconnected_session() {
        let mut session = TestFixtures::session();
        session.invalidate();
        let result = DataProvider::new(
            session,
            Arc::new(MockGraphApi::new()),
            "https://graph.facebook.com",
        );
        assert!(matches!(result, Err(ProviderError::NotConnected)));
    }

    #[tokio::test]
    async fn test_user_details_appends_derived_picture_url() {
        let mock = MockGraphApi::new()
            .with_response("me", json!({"id": "100234", "name": "Ada Lovelace"}));
        let provider = provider_with(mock);

        let profile = provider.user_details().await.unwrap();
        assert_eq!(profile.id, "100234");
        assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(
            profile.display_pic_src.as_deref(),
            Some("https://graph.facebook.com/100234/picture")
        );
    }

    #[tokio::test]
    async fn test_cover_photo_present() {
        let mock = MockGraphApi::new().with_response(
            "me",
            json!({"id": "100234", "cover": {"source": "https://cdn.test/cover.jpg"}}),
        );
        let provider = provider_with(mock);

        let cover = provider.cover_photo().await.unwrap();
        assert_eq!(cover.as_deref(), Some("https://cdn.test/cover.jpg"));
    }

    #[tokio::test]
    async fn test_cover_photo_absent_yields_none_not_error() {
        let mock = MockGraphApi::new().with_response("me", json!({"id": "100234"}));
        let provider = provider_with(mock);
        assert_eq!(provider.cover_photo().await.unwrap(), None);

        // A cover object without a source field behaves the same
        let mock = MockGraphApi::new()
            .with_response("me", json!({"id": "100234", "cover": {"offset_y": 40}}));
        let provider = provider_with(mock);
        assert_eq!(provider.cover_photo().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_album_photos_passes_limit_parameter() {
        let mock = MockGraphApi::new().with_response(
            "album9/photos",
            json!({"data": [{"id": "p1", "source": "https://cdn.test/p1.jpg"}]}),
        );
        let handle = mock.clone();
        let provider = provider_with(mock);

        let photos = provider.album_photos("album9", 25).await.unwrap();
        assert_eq!(photos.len(), 1);

        let calls = handle.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "album9/photos");
        assert!(calls[0].params.iter().any(|(k, v)| k == "limit" && v == "25"));
        assert!(calls[0].params.iter().any(|(k, _)| k == "access_token"));
    }

    #[tokio::test]
    async fn test_liked_categories_hit_their_paths() {
        let mock = MockGraphApi::new()
            .with_response("me/music", json!({"data": [{"id": "m1", "name": "Band"}]}))
            .with_response("me/books", json!({"data": []}));
        let provider = provider_with(mock);

        let music = provider.liked(LikeCategory::Music).await.unwrap();
        assert_eq!(music.len(), 1);
        let books = provider.liked(LikeCategory::Books).await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn test_contacts_filtered_applies_predicate() {
        struct KeepNamed;
        #[async_trait]
        impl ContactFilter for KeepNamed {
            async fn filter(&self, contacts: Vec<Contact>) -> Vec<Contact> {
                contacts.into_iter().filter(|c| c.name.is_some()).collect()
            }
        }

        let mock = MockGraphApi::new().with_response(
            "me/friends",
            json!({"data": [{"id": "1", "name": "Ada"}, {"id": "2"}]}),
        );
        let provider = provider_with(mock);

        let contacts = provider.contacts_filtered(&KeepNamed).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, "1");
    }

    #[tokio::test]
    async fn test_mutual_friends_path() {
        let mock = MockGraphApi::new().with_response(
            "me/mutualfriends/777",
            json!({"data": [{"id": "9", "name": "Shared"}]}),
        );
        let provider = provider_with(mock);

        let mutual = provider.mutual_friends("777").await.unwrap();
        assert_eq!(mutual[0].id, "9");
    }

    #[tokio::test]
    async fn test_disconnect_invalidates_session() {
        let mock = MockGraphApi::new().with_response("me/permissions", json!({"success": true}));
        let mut provider = provider_with(mock);

        provider.disconnect().await.unwrap();
        assert!(!provider.session().is_connected());

        // Further calls are rejected locally
        let err = provider.contacts().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConnected));
    }

    #[tokio::test]
    async fn test_remote_failure_is_an_explicit_error() {
        let mock = MockGraphApi::new().failing_with(500, "backend sad");
        let provider = provider_with(mock);

        let err = provider.contacts().await.unwrap_err();
        assert!(matches!(err, ProviderError::RemoteStatus(500, _)));
    }
}
