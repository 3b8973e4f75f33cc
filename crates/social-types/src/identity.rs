use serde::{Deserialize, Serialize};

/// Session claim set carried in the signed `token` cookie.
///
/// Shared by the login controller (issuance) and the identity middleware
/// (verification). `role` is kept as the raw column value so whatever the
/// users table holds is what gets signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// Who a request is running as, resolved once from the session cookie and
/// never re-checked against the database during the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    User(Principal),
    Admin(Principal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub email: String,
}

impl Identity {
    pub fn from_claims(claims: &Claims) -> Self {
        let principal = Principal {
            id: claims.id,
            email: claims.email.clone(),
        };
        if claims.role == "admin" {
            Self::Admin(principal)
        } else {
            Self::User(principal)
        }
    }

    pub fn principal(&self) -> &Principal {
        match self {
            Self::User(p) | Self::Admin(p) => p,
        }
    }

    pub fn id(&self) -> i64 {
        self.principal().id
    }

    pub fn email(&self) -> &str {
        &self.principal().email
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    pub fn role_name(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Admin(_) => "admin",
        }
    }
}
