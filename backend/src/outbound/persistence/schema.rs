//! Diesel table definitions matching `backend/migrations`.
//!
//! Keep in sync with the migrations; `diesel print-schema` regenerates them
//! from a live database.

diesel::table! {
    /// Ingested video posts. `post_hash` carries a unique constraint.
    posts (id) {
        id -> Uuid,
        post_hash -> Text,
        body -> Text,
        comment_count -> Int8,
        like_count -> Int8,
        gift_count -> Int8,
        hashtags -> Array<Text>,
        moment -> Bool,
        poster_public_key -> Text,
        username -> Nullable<Text>,
        video_url -> Text,
        screenshot -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered users keyed by their external id.
    users (user_id) {
        user_id -> Text,
        /// JSON array of `{name, isSynced}` objects.
        accounts -> Jsonb,
        access_token -> Nullable<Text>,
        preferences -> Array<Uuid>,
        roles -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    hashtags (id) {
        id -> Uuid,
        name -> Text,
        post_count -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ban records. Rows are never deleted; lifting stamps `lifted_at`.
    banned_users (id) {
        id -> Uuid,
        user_id -> Text,
        reason -> Text,
        banned_by -> Text,
        ban_type -> Text,
        ban_ends_at -> Nullable<Timestamptz>,
        lifted_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    playlists (id) {
        id -> Uuid,
        name -> Text,
        owner_id -> Text,
        post_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Inspected video records. `url` carries a unique constraint.
    videos (id) {
        id -> Uuid,
        url -> Text,
        duration -> Float8,
        screenshot -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    banned_users,
    hashtags,
    playlists,
    posts,
    users,
    videos
);
