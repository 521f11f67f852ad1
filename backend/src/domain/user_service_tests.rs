//! Coverage for registration, account merging and preference updates.

use super::*;
use crate::domain::ports::{MockHashtagRepository, MockUserRepository};
use crate::domain::{AccountName, AccountUpdate, ErrorCode, Role};
use crate::test_support::clock::MutableClock;
use crate::test_support::fixtures::epoch;
use rstest::rstest;

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn hashtag(name: &str) -> Hashtag {
    Hashtag {
        id: HashtagId::generate(),
        name: name.to_owned(),
        post_count: 1,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

fn service(users: MockUserRepository, hashtags: MockHashtagRepository) -> UserService {
    UserService::new(
        Arc::new(users),
        Arc::new(hashtags),
        Arc::new(MutableClock::fixed()),
    )
}

fn existing(user: User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(user.clone())));
    users
}

#[rstest]
#[tokio::test]
async fn registration_uses_defaults() {
    let mut users = MockUserRepository::new();
    users.expect_create().times(1).returning(|_| Ok(()));

    let user = service(users, MockHashtagRepository::new())
        .create_user(uid("U1"))
        .await
        .expect("create");

    assert_eq!(user.roles, vec![Role::User]);
    assert_eq!(user.accounts.len(), 1);
    assert_eq!(user.accounts[0].name, AccountName::Youtube);
    assert!(!user.accounts[0].is_synced);
    assert!(user.access_token.is_none());
    assert!(user.preferences.is_empty());
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_conflicts() {
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .returning(|user| Err(UserPersistenceError::duplicate(user.user_id.to_string())));

    let err = service(users, MockHashtagRepository::new())
        .create_user(uid("U1"))
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), USER_EXISTS_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn unknown_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let err = service(users, MockHashtagRepository::new())
        .get_user(&uid("GHOST"))
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_merges_accounts_and_clears_token() {
    let mut user = User::register(uid("U1"), epoch());
    user.access_token = Some("secret".into());
    let mut users = existing(user);
    users
        .expect_update()
        .times(1)
        .withf(|user| user.access_token.is_none() && user.accounts.len() == 2)
        .returning(|_| Ok(()));

    let profile = service(users, MockHashtagRepository::new())
        .update_user(UpdateUserRequest {
            user_id: uid("U1"),
            accounts: Some(vec![
                AccountUpdate {
                    name: AccountName::Youtube,
                    is_synced: Some(true),
                },
                AccountUpdate {
                    name: AccountName::Vimeo,
                    is_synced: None,
                },
            ]),
            access_token: Some(None),
        })
        .await
        .expect("update");

    assert!(profile.user.accounts[0].is_synced);
    assert_eq!(profile.user.accounts[1].name, AccountName::Vimeo);
    assert!(!profile.user.accounts[1].is_synced);
}

#[rstest]
#[tokio::test]
async fn preference_update_drops_invalid_and_unknown_ids() {
    let travel = hashtag("travel");
    let food = hashtag("food");
    let known = vec![travel.clone(), food.clone()];
    let mut hashtags = MockHashtagRepository::new();
    hashtags
        .expect_find_by_ids()
        .returning(move |ids| {
            Ok(known
                .iter()
                .filter(|tag| ids.contains(&tag.id))
                .cloned()
                .collect())
        });
    let mut users = existing(User::register(uid("U1"), epoch()));
    let expected = vec![food.id, travel.id];
    users
        .expect_update()
        .times(1)
        .withf(move |user| user.preferences == expected)
        .returning(|_| Ok(()));

    let profile = service(users, hashtags)
        .update_preferences(
            &uid("U1"),
            vec![
                food.id.to_string(),
                "not-a-uuid".into(),
                HashtagId::generate().to_string(),
                travel.id.to_string(),
            ],
        )
        .await
        .expect("update preferences");

    let names: Vec<&str> = profile.preferences.iter().map(|tag| tag.name.as_str()).collect();
    assert_eq!(names, vec!["food", "travel"]);
}

#[rstest]
#[tokio::test]
async fn store_failure_hides_cause() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|_| Err(UserPersistenceError::connection("refused")));

    let err = service(users, MockHashtagRepository::new())
        .preferences(&uid("U1"))
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(!err.message().contains("refused"));
}
