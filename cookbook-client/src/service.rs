use async_trait::async_trait;
use cookbook::basic_models::{Ingredient, Tag, User};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::errors::TransportError;
use crate::payload::Payload;

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// The recipe server, as seen by the authoring form.
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Every ingredient that can be picked for an ingredient line.
    async fn ingredients(&self) -> TransportResult<Vec<Ingredient>>;
    /// Every tag that can be picked.
    async fn tags(&self) -> TransportResult<Vec<Tag>>;
    /// The user behind the current session, or `None` if nobody is logged in.
    async fn current_user(&self) -> TransportResult<Option<User>>;
    /// Create a recipe. Returns once the server has confirmed it.
    async fn create_recipe(&self, payload: Payload) -> TransportResult<()>;
}

/// Talks to the recipe server over HTTP.
#[derive(Clone)]
pub struct HttpRecipeService {
    client: Client,
    config: Config,
    token: Option<String>,
}

impl HttpRecipeService {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
            token: None,
        }
    }

    /// Like `new`, but picks up a bearer token from `COOKBOOK_TOKEN` if one is set.
    pub fn new_from_env(config: Config) -> Self {
        if dotenvy::dotenv().is_err() {
            tracing::debug!("No .env file found");
        }
        let mut service = Self::new(config);
        service.token = dotenvy::var("COOKBOOK_TOKEN").ok();
        service
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Attach whatever credentials we have.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match &self.config.session_cookie {
            Some(cookie) => request.header(
                header::COOKIE,
                format!("{}={}", cookie.name, cookie.value),
            ),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        let url = self.config.url(path);
        tracing::debug!("GET {}", url);
        let resp = self.authorize(self.client.get(&url)).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

/// Turn anything but a 200 into an error carrying the response body.
async fn check_status(resp: reqwest::Response) -> TransportResult<reqwest::Response> {
    let status = resp.status();
    if status == StatusCode::OK {
        Ok(resp)
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(TransportError::Status { status, body })
    }
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn ingredients(&self) -> TransportResult<Vec<Ingredient>> {
        self.get_json(&self.config.endpoints.ingredients).await
    }

    async fn tags(&self) -> TransportResult<Vec<Tag>> {
        self.get_json(&self.config.endpoints.tags).await
    }

    async fn current_user(&self) -> TransportResult<Option<User>> {
        match self.get_json::<User>(&self.config.endpoints.current_user).await {
            Ok(user) => Ok(Some(user)),
            Err(TransportError::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn create_recipe(&self, payload: Payload) -> TransportResult<()> {
        let url = self.config.url(&self.config.endpoints.create_recipe);
        tracing::debug!("POST {} with {} images", url, payload.binary_parts.len());
        let form = payload.into_form()?;
        let resp = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// An in-memory stand-in for the recipe server.
#[cfg(test)]
pub(crate) mod mock {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    pub struct MockService {
        pub tags: Option<Vec<Tag>>,
        pub ingredients: Option<Vec<Ingredient>>,
        pub user: Option<User>,
        /// Status the create call answers with
        pub create_status: StatusCode,
        pub create_delay: Option<Duration>,
        pub created: Mutex<Vec<Payload>>,
    }

    impl Default for MockService {
        fn default() -> Self {
            Self {
                tags: Some(vec![]),
                ingredients: Some(vec![]),
                user: None,
                create_status: StatusCode::OK,
                create_delay: None,
                created: Mutex::new(vec![]),
            }
        }
    }

    fn unavailable() -> TransportError {
        TransportError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "down".into(),
        }
    }

    impl MockService {
        pub fn created_count(&self) -> usize {
            self.created.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecipeService for MockService {
        async fn ingredients(&self) -> TransportResult<Vec<Ingredient>> {
            self.ingredients.clone().ok_or_else(unavailable)
        }

        async fn tags(&self) -> TransportResult<Vec<Tag>> {
            self.tags.clone().ok_or_else(unavailable)
        }

        async fn current_user(&self) -> TransportResult<Option<User>> {
            Ok(self.user.clone())
        }

        async fn create_recipe(&self, payload: Payload) -> TransportResult<()> {
            if let Some(delay) = self.create_delay {
                tokio::time::sleep(delay).await;
            }
            self.created.lock().unwrap().push(payload);
            if self.create_status == StatusCode::OK {
                Ok(())
            } else {
                Err(TransportError::Status {
                    status: self.create_status,
                    body: "rejected".into(),
                })
            }
        }
    }
}
