//! Bearer token authentication hoop.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use storefront_app::auth::{Actor, AuthServiceError};
use tracing::error;

use crate::{extensions::*, state::State};

/// Resolve the bearer token to an [`Actor`] and
/// store it in the depot; answer 401 otherwise.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let authenticated = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => authenticate(Arc::clone(state), extract_bearer_token(req)).await,
        Err(status) => Err(status),
    };

    match authenticated {
        Ok(actor) => {
            depot.insert_actor(actor);
            ctrl.call_next(req, depot, res).await;
        }
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();
        }
    }
}

async fn authenticate(state: Arc<State>, token: Option<&str>) -> Result<Actor, StatusError> {
    let token = token.ok_or_else(|| {
        StatusError::unauthorized().brief("Missing or invalid Authorization header")
    })?;

    state
        .app
        .auth
        .authenticate_bearer(token)
        .await
        .map_err(|error| match error {
            AuthServiceError::NotFound => StatusError::unauthorized().brief("Invalid API token"),
            AuthServiceError::Sql(_) | AuthServiceError::Token(_) => {
                error!(%error, "bearer token lookup failed");

                StatusError::internal_server_error()
            }
        })
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
