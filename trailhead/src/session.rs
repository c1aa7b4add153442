//! Identity session: the process-scoped holder of the current signed-in
//! identity. Constructed once at startup and handed to every component that
//! makes authorization decisions; nothing reads identity from ambient state.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{PlatformError, ValidationError, ValidationIssue, ValidationResult},
    id::new_entity_id,
    upload::BlobStore,
    validators::is_valid_email,
};

/// The opaque authenticated-user identity issued by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Name shown next to authored content: display name, else email, else
    /// a generic fallback.
    pub fn display_handle(&self) -> String {
        if let Some(name) = self.display_name.as_deref()
            && !name.trim().is_empty()
        {
            return name.to_string();
        }
        if !self.email.trim().is_empty() {
            return self.email.clone();
        }
        "Anonymous".to_string()
    }
}

/// Contract of the external identity provider. `update_profile` replaces both
/// profile fields; pass `None` to clear one.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, PlatformError>;

    async fn login(&mut self, email: &str, password: &str) -> Result<Identity, PlatformError>;

    async fn logout(&mut self) -> Result<(), PlatformError>;

    async fn update_profile(
        &mut self,
        uid: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<Identity, PlatformError>;
}

/// Local checks applied before any provider call is made.
pub fn validate_registration(email: &str, password: &str, confirm_password: &str) -> ValidationResult<()> {
    let mut issues = Vec::new();
    if !is_valid_email(email.trim()) {
        issues.push(ValidationIssue::new(
            "email",
            "validation.email",
            "value must be a valid email address",
        ));
    }
    if password.is_empty() {
        issues.push(ValidationIssue::new(
            "password",
            "validation.required",
            "password is required",
        ));
    } else if password != confirm_password {
        issues.push(ValidationIssue::new(
            "confirm_password",
            "validation.mismatch",
            "passwords do not match",
        ));
    }

    if issues.is_empty() { Ok(()) } else { Err(ValidationError::new(issues)) }
}

type Subscriber = Box<dyn Fn(Option<&Identity>) + Send + Sync>;

/// Token returned by [`Session::subscribe`]; pass back to unsubscribe.
pub type SubscriberId = u64;

#[derive(Default)]
struct SessionInner {
    current: RwLock<Option<Identity>>,
    subscribers: Mutex<HashMap<SubscriberId, Subscriber>>,
    next_subscriber: AtomicU64,
}

/// Cheaply cloneable handle to the single session object. Subscribers are
/// notified on sign-in, sign-out, and profile refresh. Callbacks run while
/// the subscriber table is locked and must not re-enter the session.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Identity> {
        self.inner.current.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.current.read().expect("session lock poisoned").is_some()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriberId
    where
        F: Fn(Option<&Identity>) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .expect("session lock poisoned")
            .insert(id, Box::new(callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.subscribers.lock().expect("session lock poisoned").remove(&id);
    }

    /// Entry point for provider-pushed auth events (sign-in, sign-out,
    /// refresh): replaces the current identity and notifies subscribers. The
    /// session's own operations route through here as well.
    pub fn accept_auth_change(&self, identity: Option<Identity>) {
        *self.inner.current.write().expect("session lock poisoned") = identity.clone();
        let subscribers = self.inner.subscribers.lock().expect("session lock poisoned");
        for subscriber in subscribers.values() {
            subscriber(identity.as_ref());
        }
    }

    pub async fn register<P>(
        &self,
        provider: &mut P,
        email: &str,
        password: &str,
        confirm_password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, PlatformError>
    where
        P: IdentityProvider,
    {
        validate_registration(email, password, confirm_password)?;
        let identity = provider.register(email.trim(), password, display_name).await?;
        self.accept_auth_change(Some(identity.clone()));
        Ok(identity)
    }

    pub async fn sign_in<P>(&self, provider: &mut P, email: &str, password: &str) -> Result<Identity, PlatformError>
    where
        P: IdentityProvider,
    {
        let identity = provider.login(email.trim(), password).await?;
        self.accept_auth_change(Some(identity.clone()));
        Ok(identity)
    }

    pub async fn sign_out<P>(&self, provider: &mut P) -> Result<(), PlatformError>
    where
        P: IdentityProvider,
    {
        provider.logout().await?;
        self.accept_auth_change(None);
        Ok(())
    }

    /// Replaces the profile fields and re-publishes the refreshed identity.
    pub async fn change_profile<P>(
        &self,
        provider: &mut P,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<Identity, PlatformError>
    where
        P: IdentityProvider,
    {
        let current = self.current().ok_or(PlatformError::Unauthenticated)?;
        let identity = provider.update_profile(&current.uid, display_name, photo_url).await?;
        self.accept_auth_change(Some(identity.clone()));
        Ok(identity)
    }

    /// Uploads an avatar and points the profile photo at the returned URL.
    /// Upload failure aborts the flow; the profile is left untouched.
    pub async fn change_avatar<P, B>(
        &self,
        provider: &mut P,
        blobs: &mut B,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<String, PlatformError>
    where
        P: IdentityProvider,
        B: BlobStore,
    {
        let current = self.current().ok_or(PlatformError::Unauthenticated)?;
        let url = blobs
            .upload(bytes, &format!("avatars/{}/{}", current.uid, file_name))
            .await?;
        let identity = provider
            .update_profile(&current.uid, current.display_name.as_deref(), Some(&url))
            .await?;
        self.accept_auth_change(Some(identity));
        Ok(url)
    }

    /// Drops the identity and every subscriber. Used when the owning process
    /// shuts the session down for good.
    pub fn teardown(&self) {
        *self.inner.current.write().expect("session lock poisoned") = None;
        self.inner.subscribers.lock().expect("session lock poisoned").clear();
    }
}

/// In-memory identity provider used by tests and demos.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: HashMap<String, MemoryAccount>,
}

struct MemoryAccount {
    password: String,
    identity: Identity,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    async fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, PlatformError> {
        if self.accounts.contains_key(email) {
            return Err(ValidationError::single(
                "email",
                "auth.email_taken",
                "an account with this email already exists",
            )
            .into());
        }
        let identity = Identity {
            uid: new_entity_id(),
            email: email.to_string(),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            photo_url: None,
            created_at: Utc::now(),
        };
        self.accounts.insert(
            email.to_string(),
            MemoryAccount {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        Ok(identity)
    }

    async fn login(&mut self, email: &str, password: &str) -> Result<Identity, PlatformError> {
        match self.accounts.get(email) {
            Some(account) if account.password == password => Ok(account.identity.clone()),
            _ => Err(PlatformError::InvalidCredentials),
        }
    }

    async fn logout(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    async fn update_profile(
        &mut self,
        uid: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<Identity, PlatformError> {
        let account = self
            .accounts
            .values_mut()
            .find(|account| account.identity.uid == uid)
            .ok_or_else(|| PlatformError::not_found(uid))?;
        account.identity.display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        account.identity.photo_url = photo_url.map(str::to_string);
        Ok(account.identity.clone())
    }
}
