//! Validation order and persistence behaviour of the ban registry.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockBannedUserRepository, MockUserRepository};
use crate::domain::{Role, User};
use crate::test_support::clock::MutableClock;
use chrono::{DateTime, TimeDelta, Utc};
use rstest::{fixture, rstest};

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn user(raw: &str, admin: bool, now: DateTime<Utc>) -> User {
    let mut user = User::register(uid(raw), now);
    if admin {
        user.roles.push(Role::Admin);
    }
    user
}

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::fixed())
}

/// Users repository knowing `U1` (regular) and `ADMIN1` (admin), plus `U2`
/// as a non-admin moderator candidate.
fn users(now: DateTime<Utc>) -> MockUserRepository {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(move |id| {
        Ok(match id.as_ref() {
            "U1" => Some(user("U1", false, now)),
            "U2" => Some(user("U2", false, now)),
            "ADMIN1" => Some(user("ADMIN1", true, now)),
            _ => None,
        })
    });
    repo
}

fn request(
    user_id: &str,
    banned_by: &str,
    ban_type: BanType,
    ends: Option<DateTime<Utc>>,
) -> CreateBanRequest {
    CreateBanRequest {
        user_id: uid(user_id),
        banned_by: uid(banned_by),
        ban_type,
        ban_ends_at: ends,
        reason: "spam".into(),
    }
}

fn service(
    bans: MockBannedUserRepository,
    users: MockUserRepository,
    clock: Arc<MutableClock>,
) -> BanService {
    BanService::new(Arc::new(bans), Arc::new(users), clock)
}

#[rstest]
#[tokio::test]
async fn self_ban_is_rejected_before_any_lookup(clock: Arc<MutableClock>) {
    let mut bans = MockBannedUserRepository::new();
    bans.expect_insert().never();
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().never();

    let err = service(bans, users, clock)
        .create_ban(request("ADMIN1", "ADMIN1", BanType::Permanent, None))
        .await
        .expect_err("self ban");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), SELF_BAN_MESSAGE);
}

#[rstest]
#[case::unknown_target("GHOST", "ADMIN1", INVALID_USERS_MESSAGE)]
#[case::unknown_moderator("U1", "GHOST", INVALID_USERS_MESSAGE)]
#[case::not_admin("U1", "U2", UNAUTHORISED_MESSAGE)]
#[tokio::test]
async fn admin_validation_failures_are_unprocessable(
    clock: Arc<MutableClock>,
    #[case] target: &str,
    #[case] moderator: &str,
    #[case] message: &str,
) {
    let now = clock.utc();
    let mut bans = MockBannedUserRepository::new();
    bans.expect_insert().never();

    let err = service(bans, users(now), clock)
        .create_ban(request(target, moderator, BanType::Permanent, None))
        .await
        .expect_err("admin validation");

    assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
    assert_eq!(err.message(), message);
}

#[rstest]
#[case::missing(None)]
#[case::past(Some(-60))]
#[case::now(Some(0))]
#[tokio::test]
async fn temporary_ban_needs_future_end(clock: Arc<MutableClock>, #[case] offset: Option<i64>) {
    let now = clock.utc();
    let ends = offset.map(|seconds| now + TimeDelta::seconds(seconds));
    let mut bans = MockBannedUserRepository::new();
    bans.expect_insert().never();

    let err = service(bans, users(now), clock)
        .create_ban(request("U1", "ADMIN1", BanType::Temporary, ends))
        .await
        .expect_err("ban end");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), BAN_END_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn valid_ban_is_persisted_with_clock_timestamps(clock: Arc<MutableClock>) {
    let now = clock.utc();
    let ends = now + TimeDelta::hours(1);
    let mut bans = MockBannedUserRepository::new();
    bans.expect_insert()
        .times(1)
        .withf(move |ban| ban.created_at == now && ban.lifted_at.is_none())
        .returning(|_| Ok(()));

    let ban = service(bans, users(now), clock)
        .create_ban(request("U1", "ADMIN1", BanType::Temporary, Some(ends)))
        .await
        .expect("ban");

    assert_eq!(ban.user_id, uid("U1"));
    assert_eq!(ban.ban_ends_at, Some(ends));
    assert!(ban.is_active_at(now));
}

#[rstest]
#[tokio::test]
async fn lifting_without_active_ban_fails(clock: Arc<MutableClock>) {
    let mut bans = MockBannedUserRepository::new();
    bans.expect_find_active_for().returning(|_, _| Ok(Vec::new()));
    bans.expect_lift().never();

    let err = service(bans, MockUserRepository::new(), clock)
        .lift_ban(LiftBanRequest {
            user_id: uid("U1"),
            banned_by: uid("ADMIN1"),
        })
        .await
        .expect_err("not banned");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), NOT_BANNED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn lifting_by_non_admin_is_unprocessable(clock: Arc<MutableClock>) {
    let now = clock.utc();
    let active = BannedUser {
        id: BanId::generate(),
        user_id: uid("U1"),
        reason: "spam".into(),
        banned_by: uid("ADMIN1"),
        ban_type: BanType::Permanent,
        ban_ends_at: None,
        lifted_at: None,
        created_at: now,
        updated_at: now,
    };
    let mut bans = MockBannedUserRepository::new();
    bans.expect_find_active_for()
        .returning(move |_, _| Ok(vec![active.clone()]));
    bans.expect_lift().never();

    let err = service(bans, users(now), clock)
        .lift_ban(LiftBanRequest {
            user_id: uid("U1"),
            banned_by: uid("U2"),
        })
        .await
        .expect_err("unauthorised");

    assert_eq!(err.code(), ErrorCode::UnprocessableEntity);
}

#[rstest]
#[tokio::test]
async fn lifting_passes_every_active_id(clock: Arc<MutableClock>) {
    let now = clock.utc();
    let first = BanId::generate();
    let second = BanId::generate();
    let active: Vec<BannedUser> = [first, second]
        .into_iter()
        .map(|id| BannedUser {
            id,
            user_id: uid("U1"),
            reason: "spam".into(),
            banned_by: uid("ADMIN1"),
            ban_type: BanType::Permanent,
            ban_ends_at: None,
            lifted_at: None,
            created_at: now,
            updated_at: now,
        })
        .collect();
    let mut bans = MockBannedUserRepository::new();
    bans.expect_find_active_for()
        .returning(move |_, _| Ok(active.clone()));
    bans.expect_lift()
        .times(1)
        .withf(move |ids, at| ids.to_vec() == vec![first, second] && *at == now)
        .returning(|ids, _| Ok(ids.len() as u64));

    service(bans, users(now), clock)
        .lift_ban(LiftBanRequest {
            user_id: uid("U1"),
            banned_by: uid("ADMIN1"),
        })
        .await
        .expect("lift");
}

#[rstest]
#[tokio::test]
async fn banned_ids_are_deduplicated(clock: Arc<MutableClock>) {
    let now = clock.utc();
    let ban = |user_id: &str| BannedUser {
        id: BanId::generate(),
        user_id: uid(user_id),
        reason: "spam".into(),
        banned_by: uid("ADMIN1"),
        ban_type: BanType::Permanent,
        ban_ends_at: None,
        lifted_at: None,
        created_at: now,
        updated_at: now,
    };
    let active = vec![ban("U2"), ban("U1"), ban("U2")];
    let mut bans = MockBannedUserRepository::new();
    bans.expect_find_active()
        .returning(move |_| Ok(active.clone()));

    let ids = service(bans, MockUserRepository::new(), clock)
        .currently_banned_user_ids()
        .await
        .expect("ids");

    assert_eq!(ids, vec!["U1".to_owned(), "U2".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn store_failures_are_internal(clock: Arc<MutableClock>) {
    let mut bans = MockBannedUserRepository::new();
    bans.expect_history()
        .returning(|_| Err(BannedUserRepositoryError::connection("refused")));

    let err = service(bans, MockUserRepository::new(), clock)
        .ban_history(&uid("U1"))
        .await
        .expect_err("store failure");

    assert_eq!(err.code(), ErrorCode::InternalError);
}
