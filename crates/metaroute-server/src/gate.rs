//! The permission gate for mutating routes.
//!
//! The gate works on a resolution the caller already made, so the kind a
//! capability is checked against is the kind the handler then writes to.

use metaroute_registry::{required_capability, CapabilityRequirement, ExposedKind, KindResolution};
use metaroute_types::{Action, ObjectId, RouteIdentity};
use tracing::{debug, warn};

use crate::auth::{AuthProvider, Identity};
use crate::error::{ApiError, ServerResult};
use crate::handler::resolved_kind;

/// Decide whether `identity` may perform `action` on `object_id`, an object
/// of the kind `resolution` names.
///
/// Fails closed: an unresolved base or a kind without a capability for the
/// action denies without consulting the auth provider.
pub async fn authorize(
    auth: &dyn AuthProvider,
    identity: &Identity,
    action: Action,
    resolution: &KindResolution,
    object_id: ObjectId,
) -> ServerResult<bool> {
    match required_capability(resolution, action) {
        CapabilityRequirement::Required { capability, .. } => {
            let allowed = auth.current_actor_can(identity, &capability, object_id).await?;
            debug!(actor = %identity.name, %action, capability = %capability, allowed, "capability check");
            Ok(allowed)
        }
        CapabilityRequirement::Denied(reason) => {
            debug!(actor = %identity.name, %action, %reason, "no capability grants action");
            Ok(false)
        }
    }
}

/// Gate a mutating request and hand back the kind it may act on.
///
/// A base that did not resolve to exactly one kind is a
/// `rest_cannot_determine_object_type` error; a denial is `rest_forbidden`.
pub async fn require(
    auth: &dyn AuthProvider,
    identity: &Identity,
    action: Action,
    resolution: KindResolution,
    route: &RouteIdentity,
) -> Result<ExposedKind, ApiError> {
    if resolution.is_unknown() {
        return resolved_kind(&route.collection_base, resolution);
    }
    let allowed = authorize(auth, identity, action, &resolution, route.object_id)
        .await
        .map_err(|e| {
            warn!(actor = %identity.name, error = %e, "authorization check failed");
            ApiError::Forbidden {
                anonymous: identity.is_anonymous,
            }
        })?;
    if !allowed {
        warn!(
            actor = %identity.name,
            %action,
            base = %route.collection_base,
            object_id = %route.object_id,
            "permission denied"
        );
        return Err(ApiError::Forbidden {
            anonymous: identity.is_anonymous,
        });
    }
    resolved_kind(&route.collection_base, resolution)
}
