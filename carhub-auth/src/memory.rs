// In-memory auth service.

use std::collections::HashMap;

use bcrypt::{hash, verify};
use parking_lot::RwLock;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::options::AuthOptions;
use crate::registration::Registration;
use crate::session::{AuthService, SessionState, SessionUser};

#[derive(Clone, Debug)]
struct Account {
    uid: String,
    name: String,
    email: String,
    password_hash: String,
}

impl Account {
    fn session_user(&self) -> SessionUser {
        SessionUser {
            uid: self.uid.clone(),
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
        }
    }
}

/// Email/password accounts kept in memory, with a live session feed.
pub struct MemoryAuth {
    options: AuthOptions,
    accounts: RwLock<HashMap<String, Account>>,
    session: watch::Sender<SessionState>,
}

impl MemoryAuth {
    /// Starts in the `loading` state; call [`MemoryAuth::finish_loading`]
    /// (or sign in) to resolve it.
    pub fn new(options: AuthOptions) -> AuthResult<Self> {
        options.validate().map_err(AuthError::Configuration)?;
        let (session, _) = watch::channel(SessionState::loading());
        Ok(Self {
            options,
            accounts: RwLock::new(HashMap::new()),
            session,
        })
    }

    /// Resolve the initial session as signed out if nothing else did.
    pub fn finish_loading(&self) {
        self.session.send_if_modified(|state| {
            if state.loading {
                state.loading = false;
                true
            } else {
                false
            }
        });
    }

    /// Create an account and sign it in.
    pub fn register(&self, name: &str, email: &str, password: &str) -> AuthResult<SessionUser> {
        let Registration { name, email, password } =
            Registration::new(name, email, password).checked(self.options.min_password_len)?;

        let password_hash = hash(&password, self.options.hash_cost)?;

        let account = {
            let mut accounts = self.accounts.write();
            if accounts.contains_key(&email) {
                return Err(AuthError::EmailInUse(email));
            }
            let account = Account {
                uid: Uuid::new_v4().to_string(),
                name,
                email: email.clone(),
                password_hash,
            };
            accounts.insert(email, account.clone());
            account
        };

        let user = account.session_user();
        tracing::info!(uid = %user.uid, "account registered");
        self.session.send_replace(SessionState::signed_in(user.clone()));
        Ok(user)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> AuthResult<SessionUser> {
        let email = normalize_email(email);
        let account = self.accounts.read().get(&email).cloned();

        let Some(account) = account else {
            tracing::debug!("sign-in for unknown email");
            return Err(AuthError::InvalidLogin(self.options.error_message.clone()));
        };

        if !verify(password.trim(), &account.password_hash)? {
            tracing::debug!(uid = %account.uid, "sign-in with wrong password");
            return Err(AuthError::InvalidLogin(self.options.error_message.clone()));
        }

        let user = account.session_user();
        tracing::info!(uid = %user.uid, "signed in");
        self.session.send_replace(SessionState::signed_in(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&self) {
        let previous = self.session.send_replace(SessionState::signed_out());
        if let Some(user) = previous.user {
            tracing::info!(uid = %user.uid, "signed out");
        }
    }
}

impl AuthService for MemoryAuth {
    fn on_session_change(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> MemoryAuth {
        MemoryAuth::new(AuthOptions::default().with_hash_cost(4)).unwrap()
    }

    #[test]
    fn register_signs_the_new_account_in() {
        let auth = auth();
        let rx = auth.on_session_change();
        assert!(rx.borrow().loading);

        let user = auth.register("Maria", "Maria@Example.com", "secret1").unwrap();
        assert_eq!(user.email.as_deref(), Some("maria@example.com"));
        assert_eq!(user.name.as_deref(), Some("Maria"));

        let state = auth.current();
        assert!(state.signed());
        assert!(!state.loading);
        assert_eq!(state.uid(), Some(user.uid.as_str()));
    }

    #[test]
    fn duplicate_email_is_refused() {
        let auth = auth();
        auth.register("A", "a@example.com", "secret1").unwrap();
        let err = auth.register("B", " A@example.com ", "secret2").unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse(_)));
    }

    fn invalid_fields(result: AuthResult<SessionUser>) -> Vec<String> {
        match result {
            Err(AuthError::InvalidRegistration(err)) => {
                err.fields().into_iter().map(str::to_string).collect()
            }
            other => panic!("expected InvalidRegistration, got {other:?}"),
        }
    }

    #[test]
    fn registration_fields_are_validated() {
        let auth = auth();
        assert_eq!(invalid_fields(auth.register(" ", "a@example.com", "secret1")), vec!["name"]);
        assert_eq!(invalid_fields(auth.register("A", "not-an-email", "secret1")), vec!["email"]);
        assert_eq!(invalid_fields(auth.register("A", "a@b.c@d", "secret1")), vec!["email"]);
        assert_eq!(invalid_fields(auth.register("B", "x@y.", "secret1")), vec!["email"]);
        assert_eq!(invalid_fields(auth.register("A", "a@example.com", "123")), vec!["password"]);
        assert_eq!(invalid_fields(auth.register("A", "a@example.com", "     a")), vec!["password"]);
        assert_eq!(auth.current(), SessionState::loading());
    }

    #[test]
    fn passwords_are_stored_trimmed() {
        let auth = auth();
        auth.register("A", "a@example.com", " secret1 ").unwrap();
        auth.sign_out();

        assert!(auth.sign_in("a@example.com", "secret1").is_ok());
        assert!(auth.sign_in("a@example.com", "  secret1").is_ok());
    }

    #[test]
    fn sign_in_checks_the_password_and_hides_which_part_failed() {
        let auth = auth();
        let registered = auth.register("A", "a@example.com", "secret1").unwrap();
        auth.sign_out();
        assert!(!auth.current().signed());

        let wrong_password = auth.sign_in("a@example.com", "nope-nope").unwrap_err();
        let unknown_email = auth.sign_in("b@example.com", "secret1").unwrap_err();
        assert_eq!(wrong_password.to_string(), "Invalid login");
        assert_eq!(unknown_email.to_string(), "Invalid login");

        let user = auth.sign_in("a@example.com", "secret1").unwrap();
        assert_eq!(user.uid, registered.uid);
        assert_eq!(auth.current().uid(), Some(registered.uid.as_str()));
    }

    #[test]
    fn finish_loading_resolves_to_signed_out_once() {
        let auth = auth();
        auth.finish_loading();
        assert_eq!(auth.current(), SessionState::signed_out());

        auth.register("A", "a@example.com", "secret1").unwrap();
        auth.finish_loading();
        assert!(auth.current().signed());
    }

    #[test]
    fn invalid_options_are_rejected_up_front() {
        let err = MemoryAuth::new(AuthOptions::default().with_hash_cost(2)).err().unwrap();
        assert!(matches!(err, AuthError::Configuration(_)));
    }
}
