//! Request extractors.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query},
    http::{header, request::Parts},
};
use docportal_common::AppError;
use docportal_core::{CallerIdentity, Lang, RequestContext};
use docportal_db::entities::user;
use serde::Deserialize;

/// JSON body extractor whose rejections use the application error body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// Caller context extractor.
///
/// Never rejects: anonymous callers get a context with no identity and
/// the services decide what they may do.
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .extensions
            .get::<user::Model>()
            .map(CallerIdentity::from);

        Ok(Self(RequestContext {
            lang: detect_lang(parts),
            caller,
        }))
    }
}

/// `?lang=` wins over `Accept-Language`; English otherwise.
fn detect_lang(parts: &Parts) -> Lang {
    if let Ok(Query(LangQuery { lang: Some(tag) })) = Query::<LangQuery>::try_from_uri(&parts.uri) {
        return Lang::from_tag(&tag);
    }

    parts
        .headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(Lang::from_tag)
        .unwrap_or_default()
}
