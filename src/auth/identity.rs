//! Caller identity for API requests.
//!
//! Credential checks happen upstream. The app only needs to know who is
//! calling and with which role; an [`IdentityProvider`] registered as app
//! data answers that, falling back to [`HeaderIdentity`] when none is set.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use std::str::FromStr;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Secretary,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Secretary => "secretary",
            Role::Member => "member",
        }
    }

    /// Admins and secretaries create meetings, manage agendas and record votes.
    pub fn can_manage_meetings(&self) -> bool {
        matches!(self, Role::Admin | Role::Secretary)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "secretary" => Ok(Role::Secretary),
            "member" => Ok(Role::Member),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub user_id: i64,
    pub display_name: String,
    pub role: Role,
}

impl Caller {
    /// Gate for agenda, vote, status and meeting mutations.
    pub fn require_manager(&self, action: &str) -> Result<(), AppError> {
        if self.role.can_manage_meetings() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "{action} requires the admin or secretary role"
            )))
        }
    }

    pub fn require_admin(&self, action: &str) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!("{action} requires the admin role")))
        }
    }
}

pub trait IdentityProvider: Send + Sync {
    fn identify(&self, req: &HttpRequest) -> Result<Caller, AppError>;
}

/// Trusts identity headers set by the gateway in front of the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderIdentity;

impl IdentityProvider for HeaderIdentity {
    fn identify(&self, req: &HttpRequest) -> Result<Caller, AppError> {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthenticated("missing user id".to_string()))?
            .parse::<i64>()
            .map_err(|_| AppError::Unauthenticated("malformed user id".to_string()))?;
        let role = match header(USER_ROLE_HEADER) {
            Some(raw) => raw.parse::<Role>().map_err(AppError::Unauthenticated)?,
            None => Role::Member,
        };
        let display_name = header(USER_NAME_HEADER)
            .map(String::from)
            .unwrap_or_else(|| format!("user {user_id}"));

        Ok(Caller { user_id, display_name, role })
    }
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<dyn IdentityProvider>>() {
            Some(provider) => provider.identify(req),
            None => HeaderIdentity.identify(req),
        };
        ready(result)
    }
}
