use super::{Session, SessionProvider};

/// Session provider backed by credentials known at startup
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    session: Option<Session>,
}

impl StaticSession {
    /// Builds a provider from optional config values
    ///
    /// Without a session id there is no session. TMDB resolves the account from
    /// the session, so a missing account id falls back to a placeholder.
    pub fn new(session_id: Option<String>, account_id: Option<String>) -> Self {
        let session = session_id.map(|session_id| Session {
            session_id,
            account_id: account_id.unwrap_or_else(|| "0".to_string()),
        });

        Self { session }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionProvider for StaticSession {
    fn current_session(&self) -> Option<Session> {
        self.session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_session_id_means_anonymous() {
        let provider = StaticSession::new(None, Some("42".to_string()));
        assert_eq!(provider.current_session(), None);
    }

    #[test]
    fn test_session_with_default_account() {
        let provider = StaticSession::new(Some("abc".to_string()), None);
        let session = provider.current_session().unwrap();
        assert_eq!(session.session_id, "abc");
        assert_eq!(session.account_id, "0");
    }
}
