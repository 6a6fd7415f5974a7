//! Account use-cases: registration, login sessions, profile editing.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use domains::{
    Account, AccountRepo, AppError, PasswordHasher, Result, Session, SessionCodec, SessionRepo,
    ValidationErrors,
};

use crate::validate;

/// Sign-up form input.
#[derive(Debug, Clone, Default)]
pub struct RegisterAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile-edit form input. `avatar_id` is set only when a new image was
/// uploaded in the same request.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<i32>,
    pub bio: String,
    pub x_link: String,
    pub linkedin_link: String,
    pub github_link: String,
    pub website_link: String,
    pub avatar_id: Option<String>,
}

pub struct AccountService {
    accounts: Arc<dyn AccountRepo>,
    sessions: Arc<dyn SessionRepo>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<dyn SessionCodec>,
    session_ttl: Duration,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepo>,
        sessions: Arc<dyn SessionRepo>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<dyn SessionCodec>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            accounts,
            sessions,
            hasher,
            codec,
            session_ttl,
        }
    }

    /// Creates a new account from the sign-up form.
    ///
    /// A username collision is reported as a field error whether it is caught
    /// by the pre-check or by the unique constraint underneath.
    pub async fn register(&self, input: RegisterAccount) -> Result<Account> {
        let mut errors = ValidationErrors::new();

        if !validate::is_valid_username(&input.username) {
            errors.push(
                "username",
                "must be 3-30 characters: letters, digits, '_', '.' or '-'",
            );
        }
        if !validate::is_valid_email(&input.email) {
            errors.push("email", "enter a valid email address");
        }
        if input.password.len() < 8 {
            errors.push("password", "must be at least 8 characters");
        } else if input.password.eq_ignore_ascii_case(&input.username) {
            errors.push("password", "must not equal the username");
        }
        if input.password != input.password_confirm {
            errors.push("password_confirm", "passwords do not match");
        }

        if errors.is_empty() && self.accounts.by_username(&input.username).await?.is_some() {
            errors.push("username", "this username is already taken");
        }
        errors.into_result()?;

        let account = Account {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            password_hash: self.hasher.hash(&input.password)?,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            age: None,
            bio: None,
            avatar_id: None,
            x_link: None,
            linkedin_link: None,
            github_link: None,
            website_link: None,
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
        };

        match self.accounts.insert(account).await {
            Ok(created) => {
                tracing::info!(username = %created.username, "account registered");
                Ok(created)
            }
            // Lost the race against a concurrent sign-up with the same name.
            Err(AppError::Conflict(_)) => Err(AppError::Validation(ValidationErrors::single(
                "username",
                "this username is already taken",
            ))),
            Err(other) => Err(other),
        }
    }

    /// Verifies credentials and opens a server-side session.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(Account, Session)> {
        let failure = || {
            AppError::Validation(ValidationErrors::single(
                "form",
                "please enter a correct username and password",
            ))
        };

        let Some(account) = self.accounts.by_username(username).await? else {
            tracing::warn!(username, "login failed: unknown username");
            return Err(failure());
        };
        if !self.hasher.verify(password, &account.password_hash) {
            tracing::warn!(username, "login failed: bad password");
            return Err(failure());
        }
        if !account.is_active {
            return Err(failure());
        }

        let now = Utc::now();
        let session = self
            .sessions
            .insert(Session {
                token: self.codec.issue(),
                account_id: account.id,
                created_at: now,
                expires_at: now + self.session_ttl,
            })
            .await?;

        tracing::info!(username = %account.username, "login");
        Ok((account, session))
    }

    /// Closes the session referenced by the cookie token.
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.delete(token).await
    }

    /// Resolves a session token to its account. Expired sessions are deleted
    /// on sight; inactive accounts resolve to None.
    pub async fn current(&self, token: &str) -> Result<Option<Account>> {
        let Some(session) = self.sessions.by_token(token).await? else {
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            self.sessions.delete(token).await?;
            return Ok(None);
        }
        Ok(self
            .accounts
            .by_id(session.account_id)
            .await?
            .filter(|a| a.is_active))
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Account> {
        self.accounts
            .by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("account", id))
    }

    /// Applies profile mutations to the caller's own account. Identity and
    /// the password hash are never touched here.
    pub async fn edit_profile(&self, account_id: Uuid, input: ProfileUpdate) -> Result<Account> {
        let mut account = self.get_profile(account_id).await?;

        let mut errors = ValidationErrors::new();
        if !validate::is_valid_email(&input.email) {
            errors.push("email", "enter a valid email address");
        }
        if let Some(age) = input.age {
            if !(0..=150).contains(&age) {
                errors.push("age", "enter a plausible age");
            }
        }
        for (field, value) in [
            ("x_link", &input.x_link),
            ("linkedin_link", &input.linkedin_link),
            ("github_link", &input.github_link),
            ("website_link", &input.website_link),
        ] {
            if !value.trim().is_empty() && !validate::is_valid_link(value.trim()) {
                errors.push(field, "must be an absolute http(s) URL");
            }
        }
        errors.into_result()?;

        account.first_name = input.first_name.trim().to_string();
        account.last_name = input.last_name.trim().to_string();
        account.email = input.email.trim().to_string();
        account.age = input.age;
        account.bio = validate::none_if_blank(input.bio);
        account.x_link = validate::none_if_blank(input.x_link);
        account.linkedin_link = validate::none_if_blank(input.linkedin_link);
        account.github_link = validate::none_if_blank(input.github_link);
        account.website_link = validate::none_if_blank(input.website_link);
        if let Some(avatar_id) = input.avatar_id {
            account.avatar_id = Some(avatar_id);
        }

        self.accounts.update(account).await
    }

    /// The cookie codec, for handlers that set or clear the session cookie.
    pub fn codec(&self) -> &dyn SessionCodec {
        self.codec.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        MockAccountRepo, MockPasswordHasher, MockSessionCodec, MockSessionRepo,
    };
    use mockall::predicate::eq;

    fn fixture_account(username: &str) -> Account {
        Account {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$stub".into(),
            first_name: String::new(),
            last_name: String::new(),
            age: None,
            bio: None,
            avatar_id: None,
            x_link: None,
            linkedin_link: None,
            github_link: None,
            website_link: None,
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
        }
    }

    fn service(
        accounts: MockAccountRepo,
        sessions: MockSessionRepo,
        hasher: MockPasswordHasher,
        codec: MockSessionCodec,
    ) -> AccountService {
        AccountService::new(
            Arc::new(accounts),
            Arc::new(sessions),
            Arc::new(hasher),
            Arc::new(codec),
            Duration::hours(1),
        )
    }

    #[tokio::test]
    async fn register_hashes_and_inserts() {
        let mut accounts = MockAccountRepo::new();
        accounts
            .expect_by_username()
            .with(eq("wren"))
            .returning(|_| Ok(None));
        accounts
            .expect_insert()
            .withf(|a| a.username == "wren" && a.password_hash == "hashed" && !a.is_staff)
            .returning(|a| Ok(a));

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .with(eq("correct horse"))
            .returning(|_| Ok("hashed".into()));

        let svc = service(
            accounts,
            MockSessionRepo::new(),
            hasher,
            MockSessionCodec::new(),
        );
        let created = svc
            .register(RegisterAccount {
                username: "wren".into(),
                email: "wren@example.com".into(),
                password: "correct horse".into(),
                password_confirm: "correct horse".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.username, "wren");
        assert_eq!(created.password_hash, "hashed");
    }

    #[tokio::test]
    async fn register_rejects_short_password_and_mismatch() {
        let svc = service(
            MockAccountRepo::new(),
            MockSessionRepo::new(),
            MockPasswordHasher::new(),
            MockSessionCodec::new(),
        );
        let err = svc
            .register(RegisterAccount {
                username: "wren".into(),
                email: "wren@example.com".into(),
                password: "short".into(),
                password_confirm: "different".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        match err {
            AppError::Validation(v) => {
                assert!(!v.for_field("password").is_empty());
                assert!(!v.for_field("password_confirm").is_empty());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_maps_conflict_to_field_error() {
        let mut accounts = MockAccountRepo::new();
        accounts.expect_by_username().returning(|_| Ok(None));
        accounts
            .expect_insert()
            .returning(|_| Err(AppError::Conflict("accounts_username_key".into())));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|_| Ok("hashed".into()));

        let svc = service(
            accounts,
            MockSessionRepo::new(),
            hasher,
            MockSessionCodec::new(),
        );
        let err = svc
            .register(RegisterAccount {
                username: "wren".into(),
                email: "wren@example.com".into(),
                password: "correct horse".into(),
                password_confirm: "correct horse".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        match err {
            AppError::Validation(v) => assert!(!v.for_field("username").is_empty()),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn authenticate_opens_session() {
        let account = fixture_account("wren");
        let account_id = account.id;

        let mut accounts = MockAccountRepo::new();
        accounts
            .expect_by_username()
            .with(eq("wren"))
            .return_once(move |_| Ok(Some(account)));

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|_, _| true);

        let mut codec = MockSessionCodec::new();
        codec.expect_issue().returning(|| "token-1".into());

        let mut sessions = MockSessionRepo::new();
        sessions
            .expect_insert()
            .withf(move |s| s.token == "token-1" && s.account_id == account_id)
            .returning(|s| Ok(s));

        let svc = service(accounts, sessions, hasher, codec);
        let (acct, session) = svc.authenticate("wren", "correct horse").await.unwrap();
        assert_eq!(acct.id, account_id);
        assert_eq!(session.token, "token-1");
        assert!(session.expires_at > session.created_at);
    }

    #[tokio::test]
    async fn authenticate_rejects_bad_password_generically() {
        let account = fixture_account("wren");
        let mut accounts = MockAccountRepo::new();
        accounts
            .expect_by_username()
            .return_once(move |_| Ok(Some(account)));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(|_, _| false);

        let svc = service(
            accounts,
            MockSessionRepo::new(),
            hasher,
            MockSessionCodec::new(),
        );
        let err = svc.authenticate("wren", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn current_deletes_expired_sessions() {
        let mut sessions = MockSessionRepo::new();
        let stale = Session {
            token: "stale".into(),
            account_id: Uuid::now_v7(),
            created_at: Utc::now() - Duration::hours(3),
            expires_at: Utc::now() - Duration::hours(1),
        };
        sessions
            .expect_by_token()
            .with(eq("stale"))
            .return_once(move |_| Ok(Some(stale)));
        sessions
            .expect_delete()
            .with(eq("stale"))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(
            MockAccountRepo::new(),
            sessions,
            MockPasswordHasher::new(),
            MockSessionCodec::new(),
        );
        assert!(svc.current("stale").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn edit_profile_normalizes_blank_links() {
        let account = fixture_account("wren");
        let id = account.id;

        let mut accounts = MockAccountRepo::new();
        accounts
            .expect_by_id()
            .with(eq(id))
            .return_once(move |_| Ok(Some(account)));
        accounts
            .expect_update()
            .withf(|a| {
                a.bio.as_deref() == Some("hello")
                    && a.x_link.is_none()
                    && a.github_link.as_deref() == Some("https://github.com/wren")
            })
            .returning(|a| Ok(a));

        let svc = service(
            accounts,
            MockSessionRepo::new(),
            MockPasswordHasher::new(),
            MockSessionCodec::new(),
        );
        svc.edit_profile(
            id,
            ProfileUpdate {
                email: "wren@example.com".into(),
                bio: " hello ".into(),
                x_link: "   ".into(),
                github_link: "https://github.com/wren".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn edit_profile_rejects_relative_links() {
        let account = fixture_account("wren");
        let id = account.id;
        let mut accounts = MockAccountRepo::new();
        accounts
            .expect_by_id()
            .return_once(move |_| Ok(Some(account)));

        let svc = service(
            accounts,
            MockSessionRepo::new(),
            MockPasswordHasher::new(),
            MockSessionCodec::new(),
        );
        let err = svc
            .edit_profile(
                id,
                ProfileUpdate {
                    email: "wren@example.com".into(),
                    website_link: "wren.dev".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        match err {
            AppError::Validation(v) => assert!(!v.for_field("website_link").is_empty()),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
