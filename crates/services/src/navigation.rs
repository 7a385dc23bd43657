//! Section memory: where a visitor was, where to send them back after a
//! login redirect, and the theme preference.

use std::sync::Arc;

use log::{debug, warn};

use aware_core::model::{LoginProvider, Section, Theme};
use storage::repository::StorageError;

use crate::api::AwarenessApi;
use crate::store::SessionStore;

/// Section to open on startup, with the profile owner when relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub section: Section,
    pub username: Option<String>,
}

impl Route {
    #[must_use]
    pub fn new(section: Section) -> Self {
        Self {
            section,
            username: None,
        }
    }

    #[must_use]
    pub fn url_path(&self) -> String {
        self.section.url_path(self.username.as_deref())
    }
}

#[derive(Clone)]
pub struct Navigation {
    api: Arc<dyn AwarenessApi>,
    store: SessionStore,
}

impl Navigation {
    #[must_use]
    pub fn new(api: Arc<dyn AwarenessApi>, store: SessionStore) -> Self {
        Self { api, store }
    }

    /// Decide the first section to show.
    ///
    /// A logout request clears user state and lands on home. Otherwise the
    /// last visited section wins over `requested`; a remembered profile needs
    /// a signed-in user and falls back to home without one. Any pending
    /// return-after-login section is consumed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local store cannot be read or written.
    pub async fn startup(&self, requested: Route, logout: bool) -> Result<Route, StorageError> {
        let mut route = requested;
        if logout {
            self.store.clear().await?;
            route = Route::new(Section::Home);
        } else if let Some(last) = self
            .store
            .last_section()
            .await?
            .filter(|section| section.is_restorable())
        {
            route = Route::new(last);
            if last == Section::Profile {
                route = match self.signed_in_username().await {
                    Some(username) => Route {
                        section: Section::Profile,
                        username: Some(username),
                    },
                    None => Route::new(Section::Home),
                };
            }
        }
        self.store.clear_return_section().await?;
        self.store.set_current_section(route.section).await?;
        debug!("startup section {}", route.section);
        Ok(route)
    }

    /// Record an explicit visit to `section`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local store cannot be written.
    pub async fn visit(&self, section: Section) -> Result<(), StorageError> {
        self.store.set_last_section(section).await?;
        self.store.set_current_section(section).await
    }

    /// Remember the current section and return the provider's login path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local store cannot be read or written.
    pub async fn login_path(&self, provider: LoginProvider) -> Result<String, StorageError> {
        let section = self.store.current_section().await?.unwrap_or(Section::Home);
        self.store.set_return_section(section).await?;
        Ok(provider.login_path(section))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the local store cannot be read.
    pub async fn theme(&self) -> Result<Theme, StorageError> {
        self.store.theme().await
    }

    /// Flip between dark and light and persist the choice.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local store cannot be read or written.
    pub async fn toggle_theme(&self) -> Result<Theme, StorageError> {
        let theme = self.store.theme().await?.toggled();
        self.store.set_theme(theme).await?;
        Ok(theme)
    }

    /// Username of the signed-in visitor, if any.
    pub async fn signed_in_username(&self) -> Option<String> {
        match self.api.user_status().await {
            Ok(status) => status.username().map(str::to_string),
            Err(err) => {
                warn!("user status unavailable: {err}");
                None
            }
        }
    }
}
