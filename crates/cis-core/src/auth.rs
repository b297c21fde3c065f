//! Request authenticators.
//!
//! CIS services accept a small, closed set of credential schemes. Credentials are
//! held as [`SecretString`] so they never appear in `Debug` output or logs.

use crate::error::{Error, Result};
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;

/// Authentication scheme names as used in external configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// No authentication
    NoAuth,
    /// HTTP basic authentication
    Basic,
    /// Static bearer token
    BearerToken,
}

impl AuthType {
    /// Returns the configuration name of the scheme.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoAuth => "noauth",
            Self::Basic => "basic",
            Self::BearerToken => "bearertoken",
        }
    }
}

impl FromStr for AuthType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "noauth" => Ok(Self::NoAuth),
            "basic" => Ok(Self::Basic),
            "bearertoken" => Ok(Self::BearerToken),
            other => Err(Error::Authentication(format!(
                "unrecognized authentication type: {other}"
            ))),
        }
    }
}

/// Credentials attached to every outgoing request.
#[derive(Debug)]
pub enum Authenticator {
    /// Send requests without credentials.
    NoAuth,
    /// HTTP basic authentication.
    Basic {
        /// User name
        username: String,
        /// Password
        password: SecretString,
    },
    /// `Authorization: Bearer` with a caller-managed token.
    BearerToken {
        /// Access token
        token: SecretString,
    },
}

impl Authenticator {
    /// Create a basic authenticator.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Create a bearer token authenticator.
    #[must_use]
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken {
            token: SecretString::from(token.into()),
        }
    }

    /// Returns the scheme of this authenticator.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        match self {
            Self::NoAuth => AuthType::NoAuth,
            Self::Basic { .. } => AuthType::Basic,
            Self::BearerToken { .. } => AuthType::BearerToken,
        }
    }

    /// Check that the credentials are complete.
    ///
    /// # Errors
    ///
    /// Returns an authentication error for empty or malformed credentials.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::NoAuth => Ok(()),
            Self::Basic { username, password } => {
                if username.is_empty() || password.expose_secret().is_empty() {
                    return Err(Error::Authentication(
                        "basic authentication requires a username and password".to_string(),
                    ));
                }
                if has_surrounding_quotes(username) || has_surrounding_quotes(password.expose_secret())
                {
                    return Err(Error::Authentication(
                        "basic authentication credentials must not be quoted".to_string(),
                    ));
                }
                Ok(())
            }
            Self::BearerToken { token } => {
                if token.expose_secret().is_empty() {
                    return Err(Error::Authentication(
                        "bearer token authentication requires a token".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Attach credentials to a request.
    #[must_use]
    pub fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::NoAuth => request,
            Self::Basic { username, password } => {
                request.basic_auth(username, Some(password.expose_secret()))
            }
            Self::BearerToken { token } => request.bearer_auth(token.expose_secret()),
        }
    }
}

fn has_surrounding_quotes(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('{') && value.ends_with('}')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_type_parse_is_case_insensitive() {
        assert_eq!("NOAuth".parse::<AuthType>().unwrap(), AuthType::NoAuth);
        assert_eq!("Basic".parse::<AuthType>().unwrap(), AuthType::Basic);
        assert_eq!(
            "bearerToken".parse::<AuthType>().unwrap(),
            AuthType::BearerToken
        );
    }

    #[test]
    fn auth_type_rejects_unknown_scheme() {
        let err = "someOtherAuth".parse::<AuthType>().unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn basic_requires_credentials() {
        assert!(Authenticator::basic("", "").validate().is_err());
        assert!(Authenticator::basic("user", "").validate().is_err());
        assert!(Authenticator::basic("user", "pass").validate().is_ok());
    }

    #[test]
    fn basic_rejects_quoted_credentials() {
        assert!(Authenticator::basic("\"user\"", "pass").validate().is_err());
        assert!(Authenticator::basic("user", "{pass}").validate().is_err());
    }

    #[test]
    fn bearer_requires_token() {
        assert!(Authenticator::bearer_token("").validate().is_err());
        assert!(Authenticator::bearer_token("abc").validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let auth = Authenticator::bearer_token("super-secret-token");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn noauth_leaves_request_untouched() {
        let client = reqwest::Client::new();
        let request = Authenticator::NoAuth
            .authenticate(client.get("http://localhost/"))
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn bearer_sets_authorization_header() {
        let client = reqwest::Client::new();
        let request = Authenticator::bearer_token("abc")
            .authenticate(client.get("http://localhost/"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer abc"
        );
    }
}
