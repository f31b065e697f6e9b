//! Reminders REST API client.
//!
//! The API owns the contact methods; this client only forwards requests and
//! passes fields through. Non-2xx responses become [`ClientError::Http`] with the
//! body's message.

use store::config::RemindersConfig;
use store::{ClientError, ContactMethod, ContactMethodRequest, ContactMethodsApi};

use crate::error::{check_status, ApiError};

#[derive(Clone, Debug)]
pub struct RemindersClient {
    http: reqwest::Client,
    base_url: String,
}

impl PartialEq for RemindersClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
    }
}

impl RemindersClient {
    pub fn new(config: &RemindersConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/contact-methods", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/contact-methods/{}", self.base_url, id)
    }
}

impl ContactMethodsApi for RemindersClient {
    async fn list(&self) -> Result<Vec<ContactMethod>, ClientError> {
        let response = self
            .http
            .get(self.collection_url())
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;
        // Some deployments answer `null` for an empty collection.
        let methods: Option<Vec<ContactMethod>> =
            response.json().await.map_err(ApiError::from)?;
        Ok(methods.unwrap_or_default())
    }

    async fn create(&self, request: &ContactMethodRequest) -> Result<ContactMethod, ClientError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(request)
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;
        Ok(response.json().await.map_err(ApiError::from)?)
    }

    async fn update(
        &self,
        id: i64,
        request: &ContactMethodRequest,
    ) -> Result<ContactMethod, ClientError> {
        let response = self
            .http
            .patch(self.item_url(id))
            .json(request)
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;
        Ok(response.json().await.map_err(ApiError::from)?)
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(ApiError::from)?;
        check_status(response).await?;
        Ok(())
    }
}
