//! Authentication state passed explicitly to history recording.

/// Who is submitting analyses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    SignedIn {
        user_id: String,
        /// Bearer token for the remote history store, if it needs one.
        token: Option<String>,
    },
}

impl AuthState {
    /// Signed-in state when a non-blank user id is available, anonymous otherwise.
    pub fn from_parts(user_id: Option<String>, token: Option<String>) -> Self {
        match user_id {
            Some(id) if !id.trim().is_empty() => AuthState::SignedIn {
                user_id: id.trim().to_string(),
                token: token.filter(|t| !t.is_empty()),
            },
            _ => AuthState::Anonymous,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn { .. })
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            AuthState::SignedIn { user_id, .. } => Some(user_id),
            AuthState::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::SignedIn { token, .. } => token.as_deref(),
            AuthState::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(AuthState::from_parts(None, Some("t".into())), AuthState::Anonymous);
        assert_eq!(AuthState::from_parts(Some("  ".into()), None), AuthState::Anonymous);

        let auth = AuthState::from_parts(Some(" uid-1 ".into()), Some(String::new()));
        assert!(auth.is_signed_in());
        assert_eq!(auth.user_id(), Some("uid-1"));
        assert_eq!(auth.token(), None);
    }
}
