//! Auth session state.
//!
//! Authentication itself belongs to an external provider. The site only
//! tracks who is signed in. [`SessionController`] owns that state: it
//! subscribes to provider changes when started, then reads the current
//! session, and unsubscribes on shutdown or drop.
//!
//! ```text
//! start()
//!   ├─ provider.subscribe(cb)   ← state follows every auth event
//!   └─ provider.current_session()
//! shutdown() / drop
//!   └─ subscription released
//! ```

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Provider user ID.
    pub id: String,
    /// Email address, if known.
    pub email: Option<String>,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session owner.
    pub user: User,
    /// Opaque access token.
    pub access_token: String,
}

/// Provider-side auth state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthEvent {
    /// A user signed in.
    SignedIn,
    /// The user signed out.
    SignedOut,
    /// The access token was refreshed.
    TokenRefreshed,
    /// The user record changed.
    UserUpdated,
}

/// Subscriber callback. Receives the event and the session after it.
pub type AuthCallback = Box<dyn FnMut(AuthEvent, Option<&Session>) + Send>;

/// Live provider subscription. Unsubscribes when dropped.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps the provider's cancel action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Unsubscribes now. Further calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// True until unsubscribed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// External authentication service.
pub trait AuthProvider: Send + Sync {
    /// Session at this moment, if any.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the provider cannot answer.
    fn current_session(&self) -> AuthResult<Option<Session>>;

    /// Registers `callback` for every later auth event.
    fn subscribe(&self, callback: AuthCallback) -> Subscription;

    /// Ends the current session.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the provider rejects the request.
    fn sign_out(&self) -> AuthResult<()>;
}

/// Session state as seen by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Signed-in user, if any.
    pub user: Option<User>,
    /// Last event received from the provider.
    pub last_event: Option<AuthEvent>,
}

impl SessionState {
    /// True if someone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Owner of the session state and the provider subscription.
pub struct SessionController {
    provider: Arc<dyn AuthProvider>,
    state: Arc<RwLock<SessionState>>,
    subscription: Option<Subscription>,
}

impl SessionController {
    /// Creates a stopped controller.
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(RwLock::new(SessionState::default())),
            subscription: None,
        }
    }

    /// Subscribes to the provider, then reads the current session.
    ///
    /// Starting twice does nothing. The subscription stays in place even if
    /// the initial read fails, so later events still arrive.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the current session cannot be read.
    pub fn start(&mut self) -> AuthResult<()> {
        if self.subscription.is_some() {
            return Ok(());
        }

        let state = Arc::clone(&self.state);
        self.subscription = Some(self.provider.subscribe(Box::new(move |event, session| {
            let user = session.map(|s| s.user.clone());
            info!(?event, signed_in = user.is_some(), "auth state changed");
            let mut state = state.write();
            state.user = user;
            state.last_event = Some(event);
        })));

        match self.provider.current_session() {
            Ok(session) => {
                let user = session.map(|s| s.user);
                info!(signed_in = user.is_some(), "session restored");
                self.state.write().user = user;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "could not read current session");
                Err(err)
            }
        }
    }

    /// Releases the provider subscription. State is kept as last seen.
    pub fn shutdown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
            debug!("session subscription released");
        }
    }

    /// True between `start` and `shutdown`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Signs out through the provider.
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    pub fn sign_out(&self) -> AuthResult<()> {
        self.provider.sign_out()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// True if someone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &*self.state.read())
            .field("running", &self.is_running())
            .finish()
    }
}

// =============================================================================
// In-memory provider
// =============================================================================

#[derive(Default)]
struct ProviderInner {
    session: Option<Session>,
    subscribers: Vec<(u64, Arc<Mutex<AuthCallback>>)>,
    next_id: u64,
    unavailable: bool,
}

/// Provider that keeps everything in memory. For tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryAuthProvider {
    inner: Arc<Mutex<ProviderInner>>,
}

impl InMemoryAuthProvider {
    /// Provider with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with an existing session.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        let provider = Self::new();
        provider.inner.lock().session = Some(session);
        provider
    }

    /// Starts a session and notifies subscribers.
    pub fn sign_in(&self, session: Session) {
        self.inner.lock().session = Some(session);
        self.emit(AuthEvent::SignedIn);
    }

    /// Replaces the access token and notifies subscribers.
    pub fn refresh_token(&self, access_token: impl Into<String>) {
        let refreshed = {
            let mut inner = self.inner.lock();
            match inner.session.as_mut() {
                Some(session) => {
                    session.access_token = access_token.into();
                    true
                }
                None => false,
            }
        };
        if refreshed {
            self.emit(AuthEvent::TokenRefreshed);
        }
    }

    /// Makes every later call fail with [`AuthError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Runs subscribers with the provider unlocked.
    fn emit(&self, event: AuthEvent) {
        let (session, subscribers) = {
            let inner = self.inner.lock();
            let subscribers: Vec<_> = inner
                .subscribers
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect();
            (inner.session.clone(), subscribers)
        };
        for callback in subscribers {
            (callback.lock())(event, session.as_ref());
        }
    }
}

impl AuthProvider for InMemoryAuthProvider {
    fn current_session(&self) -> AuthResult<Option<Session>> {
        let inner = self.inner.lock();
        if inner.unavailable {
            return Err(AuthError::Unavailable);
        }
        Ok(inner.session.clone())
    }

    fn subscribe(&self, callback: AuthCallback) -> Subscription {
        let id = {
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.subscribers.push((id, Arc::new(Mutex::new(callback))));
            id
        };

        let weak: Weak<Mutex<ProviderInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().subscribers.retain(|(sid, _)| *sid != id);
            }
        })
    }

    fn sign_out(&self) -> AuthResult<()> {
        {
            let mut inner = self.inner.lock();
            if inner.unavailable {
                return Err(AuthError::Unavailable);
            }
            inner.session = None;
        }
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("InMemoryAuthProvider")
            .field("signed_in", &inner.session.is_some())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}
