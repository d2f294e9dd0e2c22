//! Authorization precondition run before every fetch attempt.
//!
//! Spotify views share one [`Session`], passed explicitly to every fetcher
//! and producer. Refreshing swaps the whole token, so any number of fetchers
//! may refresh at once. GitLab views use a static token and pass [`NoAuth`].

use payloads::AccessToken;
use std::cell::RefCell;
use std::future::Future;

use crate::{AuthError, FetchError};

/// The external OAuth flow: returns a valid (possibly refreshed) token.
pub trait Authorizer {
    fn authorize(
        &self,
    ) -> impl Future<Output = Result<AccessToken, AuthError>>;
}

/// Precondition checked by [`crate::Fetcher::run`] before the producer runs.
pub trait Guard {
    fn ensure_authorized(
        &self,
    ) -> impl Future<Output = Result<(), FetchError>>;
}

/// No precondition.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Guard for NoAuth {
    async fn ensure_authorized(&self) -> Result<(), FetchError> {
        Ok(())
    }
}

pub struct Session<A> {
    authorizer: A,
    token: RefCell<Option<AccessToken>>,
}

impl<A: Authorizer> Session<A> {
    pub fn new(authorizer: A) -> Self {
        Self {
            authorizer,
            token: RefCell::new(None),
        }
    }

    /// Run the authorization flow and store the resulting token.
    ///
    /// Called on every key change of every fetcher, even when the stored
    /// token is still fresh; the authorizer decides whether a refresh is due.
    pub async fn authorize(&self) -> Result<AccessToken, AuthError> {
        let token = match self.authorizer.authorize().await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("authorization error: {e}");
                return Err(e);
            }
        };
        if token.is_empty() {
            return Err(AuthError::InvalidAccessToken);
        }
        self.token.replace(Some(token.clone()));
        Ok(token)
    }

    /// The last token obtained, if any.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.token.borrow().clone()
    }

    /// Token for a producer call that runs after the guard succeeded.
    pub fn require_token(&self) -> Result<AccessToken, AuthError> {
        self.access_token().ok_or(AuthError::InvalidAccessToken)
    }
}

impl<A: Authorizer> Guard for Session<A> {
    async fn ensure_authorized(&self) -> Result<(), FetchError> {
        self.authorize().await?;
        Ok(())
    }
}

impl<G: Guard> Guard for std::rc::Rc<G> {
    fn ensure_authorized(
        &self,
    ) -> impl Future<Output = Result<(), FetchError>> {
        (**self).ensure_authorized()
    }
}

impl<A: Authorizer> Authorizer for std::rc::Rc<A> {
    fn authorize(
        &self,
    ) -> impl Future<Output = Result<AccessToken, AuthError>> {
        (**self).authorize()
    }
}
