//! User accounts, linked external accounts and roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::HashtagId;

/// Maximum accepted length of an external user identifier.
pub const USER_ID_MAX: usize = 128;

/// Validation errors for [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdValidationError {
    /// Identifier was blank.
    #[error("user id must not be empty")]
    Empty,
    /// Identifier contained whitespace.
    #[error("user id must not contain whitespace")]
    ContainsWhitespace,
    /// Identifier exceeded [`USER_ID_MAX`].
    #[error("user id must be at most {max} characters")]
    TooLong { max: usize },
}

/// External user identifier (the poster public key on the upstream network).
///
/// The same identifier keys users, ban records and the poster of a post, so
/// banned-user exclusion compares it directly against
/// [`Post::poster_public_key`](super::Post::poster_public_key).
///
/// # Examples
/// ```
/// use reelfeed::domain::UserId;
///
/// let id = UserId::new("BC1YLexample").expect("valid id");
/// assert_eq!(id.as_ref(), "BC1YLexample");
/// assert!(UserId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserIdValidationError`] for blank, whitespace-bearing or
    /// overlong input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdValidationError> {
        Self::try_from(id.as_ref().to_owned())
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(UserIdValidationError::ContainsWhitespace);
        }
        if value.chars().count() > USER_ID_MAX {
            return Err(UserIdValidationError::TooLong { max: USER_ID_MAX });
        }
        Ok(Self(value))
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account.
    User,
    /// Moderator allowed to ban and lift bans.
    Admin,
}

impl Role {
    /// Stable storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Raised when an account name is outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(r#"Account name "{name}" is not allowed. Only "youtube" and "vimeo" are accepted."#)]
pub struct UnsupportedAccountError {
    /// The rejected name.
    pub name: String,
}

/// External video platform a user may link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountName {
    /// YouTube channel.
    Youtube,
    /// Vimeo account.
    Vimeo,
}

impl AccountName {
    /// Stable storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
        }
    }
}

impl FromStr for AccountName {
    type Err = UnsupportedAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Self::Youtube),
            "vimeo" => Ok(Self::Vimeo),
            other => Err(UnsupportedAccountError {
                name: other.to_owned(),
            }),
        }
    }
}

/// A linked external account and whether it has been synchronised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub name: AccountName,
    pub is_synced: bool,
}

/// Requested change to one linked account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountUpdate {
    pub name: AccountName,
    /// `None` leaves an existing flag untouched and defaults new accounts to
    /// unsynced.
    pub is_synced: Option<bool>,
}

/// A registered user.
///
/// ## Invariants
/// - account names are unique within `accounts`.
/// - `preferences` is ordered; the first entry is the strongest preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub accounts: Vec<Account>,
    pub access_token: Option<String>,
    pub preferences: Vec<HashtagId>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A freshly registered user: one unsynced YouTube account, no token,
    /// the `user` role and no preferences.
    #[must_use]
    pub fn register(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            accounts: vec![Account {
                name: AccountName::Youtube,
                is_synced: false,
            }],
            access_token: None,
            preferences: Vec::new(),
            roles: vec![Role::User],
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Merge account updates: existing accounts get their sync flag
    /// replaced when one is supplied, unknown ones are appended.
    pub fn apply_account_updates(&mut self, updates: &[AccountUpdate]) {
        for update in updates {
            match self
                .accounts
                .iter_mut()
                .find(|account| account.name == update.name)
            {
                Some(existing) => {
                    if let Some(is_synced) = update.is_synced {
                        existing.is_synced = is_synced;
                    }
                }
                None => self.accounts.push(Account {
                    name: update.name,
                    is_synced: update.is_synced.unwrap_or(false),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for user identifiers and account merging.

    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case::empty("", UserIdValidationError::Empty)]
    #[case::blank("   ", UserIdValidationError::Empty)]
    #[case::whitespace("a b", UserIdValidationError::ContainsWhitespace)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserIdValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn user_id_rejects_overlong_input() {
        let raw = "x".repeat(USER_ID_MAX + 1);
        assert_eq!(
            UserId::new(raw),
            Err(UserIdValidationError::TooLong { max: USER_ID_MAX })
        );
    }

    #[rstest]
    fn register_applies_defaults() {
        let user = User::register(UserId::new("U1").expect("id"), now());
        assert_eq!(
            user.accounts,
            vec![Account {
                name: AccountName::Youtube,
                is_synced: false
            }]
        );
        assert_eq!(user.roles, vec![Role::User]);
        assert!(user.access_token.is_none());
        assert!(!user.is_admin());
    }

    #[rstest]
    fn account_updates_merge_and_append() {
        let mut user = User::register(UserId::new("U1").expect("id"), now());
        user.apply_account_updates(&[
            AccountUpdate {
                name: AccountName::Youtube,
                is_synced: Some(true),
            },
            AccountUpdate {
                name: AccountName::Vimeo,
                is_synced: None,
            },
        ]);

        assert_eq!(
            user.accounts,
            vec![
                Account {
                    name: AccountName::Youtube,
                    is_synced: true
                },
                Account {
                    name: AccountName::Vimeo,
                    is_synced: false
                },
            ]
        );
    }

    #[rstest]
    fn account_name_enforces_allow_list() {
        let err = "tiktok".parse::<AccountName>().expect_err("not allowed");
        assert_eq!(err.name, "tiktok");
        assert_eq!("vimeo".parse::<AccountName>(), Ok(AccountName::Vimeo));
    }
}
