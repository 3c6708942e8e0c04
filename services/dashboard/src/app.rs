//! Composition root: builds the clients, the session store and the browser
//! from one resolved configuration.

use std::sync::Arc;

use anyhow::{bail, Context};
use atlas_client::{AtlasSource, AuthApi, MapApi};
use tracing::info;

use crate::browse::Browser;
use crate::config::AtlasConfig;
use crate::fetcher::Fetcher;
use crate::session::{guard, Access, Route, Session, SessionStore};

pub struct App {
    pub config: AtlasConfig,
    pub map_api: Arc<MapApi>,
    pub auth_api: AuthApi,
    pub sessions: SessionStore,
}

impl App {
    pub fn new(config: AtlasConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let map_api = MapApi::new(&config.client).context("Failed to create map API client")?;
        let auth_api = AuthApi::new(&config.client).context("Failed to create backend client")?;
        let sessions = SessionStore::new(config.session_file.clone());
        info!(
            map_url = %config.client.map_url,
            backend_url = %config.client.backend_url,
            "Dashboard configured"
        );
        Ok(Self {
            config,
            map_api: Arc::new(map_api),
            auth_api,
            sessions,
        })
    }

    /// Check that `route` may be used, restoring the stored session if any.
    ///
    /// Returns the session for protected routes.
    pub async fn enter(&self, route: Route) -> anyhow::Result<Option<Session>> {
        let session = self.sessions.restore(&self.auth_api).await?;
        match guard(route, session.as_ref()) {
            Access::Allow => Ok(session),
            Access::RequireLogin => bail!("Veuillez vous connecter (atlas login)"),
            Access::AlreadyLoggedIn => {
                let name = session
                    .map(|s| s.user.display_name())
                    .unwrap_or_default();
                bail!("Déjà connecté en tant que {} (atlas logout pour changer)", name)
            }
        }
    }

    /// Backend client carrying the session token.
    pub fn auth_api_for(&self, session: &Session) -> AuthApi {
        self.auth_api.clone().with_token(session.token.clone())
    }

    pub fn source(&self) -> Arc<dyn AtlasSource> {
        self.map_api.clone()
    }

    pub fn browser(&self) -> Browser {
        Browser::new(
            &self.config.root_name,
            Fetcher::new(self.source()),
            self.config.theme,
        )
    }
}
