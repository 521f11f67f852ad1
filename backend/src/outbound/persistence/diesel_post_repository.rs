//! PostgreSQL-backed `PostRepository`.
//!
//! [`PostsQuery`] clauses become one boxed `WHERE` predicate shared by the
//! page read and the count, so both always agree on the matching set.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::expression::BoxableExpression;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Array, BigInt, Bool, Nullable, Text};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::feed::{FeedSort, PostsQuery, PostsSelection};
use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{HashtagCount, Post, PostId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{HashtagCountRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

type PostPredicate = Box<dyn BoxableExpression<posts::table, Pg, SqlType = Bool>>;

/// Diesel implementation of [`PostRepository`].
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PostRepositoryError {
    map_pool_error(error, PostRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_diesel_error(error, PostRepositoryError::query, PostRepositoryError::connection)
}

fn lowercase(tags: &[String]) -> Vec<String> {
    tags.iter().map(|tag| tag.to_lowercase()).collect()
}

/// True when any element of the post's `hashtags` equals one of `tags`,
/// ignoring case.
fn has_any_tag(tags: &[String]) -> PostPredicate {
    Box::new(
        sql::<Bool>("EXISTS (SELECT 1 FROM unnest(posts.hashtags) AS tag WHERE lower(tag) = ANY(")
            .bind::<Array<Text>, _>(lowercase(tags))
            .sql("))"),
    )
}

fn predicate(query: &PostsQuery) -> PostPredicate {
    let mut clause: PostPredicate = Box::new(posts::moment.eq(query.moment));
    if let Some(tags) = &query.include_hashtags {
        clause = Box::new(clause.and(has_any_tag(tags)));
    }
    if let Some(tags) = &query.exclude_hashtags {
        clause = Box::new(clause.and(diesel::dsl::not(has_any_tag(tags))));
    }
    if let Some(ids) = &query.exclude_ids {
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        clause = Box::new(clause.and(posts::id.ne_all(ids)));
    }
    if let Some(posters) = &query.banned_posters {
        clause = Box::new(clause.and(posts::poster_public_key.ne_all(posters.clone())));
    }
    if let Some(tokens) = &query.search_tokens {
        let search = sql::<Bool>("to_tsvector('simple', posts.body) @@ to_tsquery('simple', ")
            .bind::<Text, _>(tokens.join(" | "))
            .sql(")");
        clause = Box::new(clause.and(search));
    }
    clause
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn find(
        &self,
        query: &PostsQuery,
        selection: PostsSelection,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let base = posts::table
            .filter(predicate(query))
            .select(PostRow::as_select())
            .into_boxed();
        let ordered = match selection.sort {
            FeedSort::Latest => base.order(posts::created_at.desc()),
            FeedSort::MostLiked => base.order((posts::like_count.desc(), posts::created_at.desc())),
            FeedSort::MostCommented => {
                base.order((posts::comment_count.desc(), posts::created_at.desc()))
            }
        };
        let rows: Vec<PostRow> = ordered
            .offset(to_i64(selection.skip))
            .limit(i64::from(selection.limit))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn count(&self, query: &PostsQuery) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = posts::table
            .filter(predicate(query))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(total))
    }

    async fn count_all(&self) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = posts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(total))
    }

    async fn exists_by_hash(&self, post_hash: &str) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::select(diesel::dsl::exists(
            posts::table.filter(posts::post_hash.eq(post_hash)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_error)
    }

    async fn insert_if_absent(&self, post: &Post) -> Result<bool, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let inserted = diesel::insert_into(posts::table)
            .values(PostRow::from(post))
            .on_conflict(posts::post_hash)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(inserted > 0)
    }

    async fn delete_oldest(&self, count: u64) -> Result<u64, PostRepositoryError> {
        if count == 0 {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let doomed: Vec<Uuid> = posts::table
            .select(posts::id)
            .order((posts::created_at.asc(), posts::id.asc()))
            .limit(to_i64(count))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let deleted = diesel::delete(posts::table.filter(posts::id.eq_any(doomed)))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }

    async fn find_by_ids(&self, ids: &[PostId]) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<PostRow> = posts::table
            .filter(posts::id.eq_any(ids))
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn hashtag_counts(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<HashtagCount>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<HashtagCountRow> = diesel::sql_query(
            "SELECT tag AS hashtag, COUNT(*) AS count \
             FROM posts, unnest(posts.hashtags) AS tag \
             GROUP BY tag ORDER BY count DESC, tag ASC LIMIT $1",
        )
        .bind::<Nullable<BigInt>, _>(limit.map(i64::from))
        .load(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| HashtagCount {
                hashtag: row.hashtag,
                count: row.count,
            })
            .collect())
    }
}
