//! Caller context passed into every service operation.

use docportal_common::{AppError, AppResult};
use docportal_db::entities::user::{self, Role};
use serde::{Deserialize, Serialize};

/// Display language chosen by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Tl,
}

impl Lang {
    /// Parse a language tag such as `tl`, `fil-PH` or `en-US`.
    ///
    /// Tagalog/Filipino tags map to [`Lang::Tl`]; anything else is English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_', ';', ','])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "tl" | "fil" => Self::Tl,
            _ => Self::En,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tl => "tl",
        }
    }
}

/// The authenticated account behind a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub user_id: String,
    pub role: Role,
}

impl From<&user::Model> for CallerIdentity {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role,
        }
    }
}

/// Who is calling and how results should be presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub lang: Lang,
    pub caller: Option<CallerIdentity>,
}

impl RequestContext {
    /// Context for an unauthenticated caller.
    #[must_use]
    pub const fn anonymous(lang: Lang) -> Self {
        Self { lang, caller: None }
    }

    /// Context for an authenticated caller.
    #[must_use]
    pub const fn authenticated(lang: Lang, caller: CallerIdentity) -> Self {
        Self {
            lang,
            caller: Some(caller),
        }
    }

    /// Require any signed-in caller.
    pub fn require_caller(&self) -> AppResult<&CallerIdentity> {
        self.caller.as_ref().ok_or(AppError::Unauthorized)
    }

    /// Require a signed-in resident.
    pub fn require_user(&self) -> AppResult<&CallerIdentity> {
        let caller = self.require_caller()?;
        if caller.role == Role::User {
            Ok(caller)
        } else {
            Err(AppError::Forbidden("resident account required".to_string()))
        }
    }

    /// Require a signed-in administrator.
    ///
    /// Every mutating operation on the request and archive stores goes
    /// through this guard.
    pub fn require_admin(&self) -> AppResult<&CallerIdentity> {
        let caller = self.require_caller()?;
        if caller.role == Role::Admin {
            Ok(caller)
        } else {
            Err(AppError::Forbidden("administrator access required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> RequestContext {
        RequestContext::authenticated(
            Lang::En,
            CallerIdentity {
                user_id: "u1".to_string(),
                role,
            },
        )
    }

    #[test]
    fn test_lang_from_tag() {
        assert_eq!(Lang::from_tag("tl"), Lang::Tl);
        assert_eq!(Lang::from_tag("fil-PH,en;q=0.8"), Lang::Tl);
        assert_eq!(Lang::from_tag("TL"), Lang::Tl);
        assert_eq!(Lang::from_tag("en-US"), Lang::En);
        assert_eq!(Lang::from_tag(""), Lang::En);
    }

    #[test]
    fn test_guards() {
        let anon = RequestContext::anonymous(Lang::En);
        assert!(matches!(anon.require_caller(), Err(AppError::Unauthorized)));
        assert!(matches!(anon.require_admin(), Err(AppError::Unauthorized)));

        let user = ctx(Role::User);
        assert!(user.require_user().is_ok());
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden(_))));

        let admin = ctx(Role::Admin);
        assert!(admin.require_admin().is_ok());
        assert!(matches!(admin.require_user(), Err(AppError::Forbidden(_))));
    }
}
