//! In-memory adapters for every driven store and the feed cache.
//!
//! Used when no database or Redis URL is configured, and by tests. State
//! lives behind a `std::sync::Mutex`; guards are never held across `.await`.

mod bans;
mod feed_cache;
mod hashtags;
mod playlists;
mod posts;
mod users;
mod videos;

use std::sync::{Mutex, MutexGuard};

pub use bans::MemoryBanStore;
pub use feed_cache::MemoryFeedCache;
pub use hashtags::MemoryHashtagStore;
pub use playlists::MemoryPlaylistStore;
pub use posts::MemoryPostStore;
pub use users::MemoryUserStore;
pub use videos::MemoryVideoStore;

/// Lock `mutex`, mapping poisoning through `on_poison`.
fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    on_poison: impl FnOnce(&'static str) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex.lock().map_err(|_| on_poison("in-memory store lock poisoned"))
}
