//! Ownership guard and route gates. Two deliberately separate layers: the
//! route gate only answers "is anyone signed in", the ownership guard answers
//! "is this identity the author". The guard is re-checked at every edit and
//! delete action site, because a route gate alone admits any signed-in user.

use crate::{errors::PlatformError, session::{Identity, Session}};

/// Authorized iff an identity is present and it is the resource's author.
pub fn can_modify(identity: Option<&Identity>, resource_author_id: &str) -> bool {
    identity.is_some_and(|identity| identity.uid == resource_author_id)
}

/// [`can_modify`] as a gate: distinguishes "not signed in" from "signed in
/// but not the author" so callers can redirect or refuse accordingly.
pub fn require_owner(
    identity: Option<&Identity>,
    resource_author_id: &str,
    resource_id: &str,
) -> Result<(), PlatformError> {
    let Some(identity) = identity else {
        return Err(PlatformError::Unauthenticated);
    };
    if identity.uid != resource_author_id {
        return Err(PlatformError::Forbidden {
            resource_id: resource_id.to_string(),
        });
    }
    Ok(())
}

/// Coarse per-route admission rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGate {
    Open,
    RequiresAuth,
    GuestOnly,
}

impl RouteGate {
    pub fn admits(&self, session: &Session) -> bool {
        match self {
            RouteGate::Open => true,
            RouteGate::RequiresAuth => session.is_authenticated(),
            RouteGate::GuestOnly => !session.is_authenticated(),
        }
    }
}
