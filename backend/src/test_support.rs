//! Test utilities for the reelfeed crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

pub mod clock {
    //! Controllable clock for time-dependent services.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Clock whose current instant is set and advanced by the test.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// A clock fixed at 2026-01-01T12:00:00Z.
        pub fn fixed() -> Self {
            match Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single() {
                Some(now) => Self::new(now),
                None => panic!("fixed clock instant must be valid"),
            }
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod fixtures {
    //! Entity builders with deterministic values.

    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::{Post, PostId};

    /// Base instant for fixture timestamps.
    pub fn epoch() -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single() {
            Some(epoch) => epoch,
            None => panic!("fixture epoch must be valid"),
        }
    }

    /// Post created `minute` minutes after [`epoch`], so ordering by creation
    /// time is predictable.
    pub fn post(hash: &str, poster: &str, minute: u32) -> Post {
        Post {
            id: PostId::generate(),
            post_hash: hash.to_owned(),
            body: format!("body of {hash}"),
            comment_count: 0,
            like_count: 0,
            gift_count: 0,
            hashtags: Vec::new(),
            moment: false,
            poster_public_key: poster.to_owned(),
            username: Some(format!("{poster}-name")),
            video_url: format!("https://video.example/{hash}.mp4"),
            screenshot: None,
            created_at: epoch() + chrono::TimeDelta::minutes(i64::from(minute)),
        }
    }
}
