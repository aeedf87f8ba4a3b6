use crate::normalizer::PostNormalizer;
use crate::traits::{ContentSource, Query};
use crate::types::{FeedError, Page, Post, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Incrementally aggregates pages of posts from a content source.
///
/// The feed is seeded once with an initial page, then grown append-only by
/// `load_next`. Two states: HAS_MORE while a cursor is held, EXHAUSTED once
/// the source returns no next cursor. Every failure is all-or-nothing: on any
/// error the post list, cursor and state are exactly as before the call.
pub struct FeedAggregator {
    id: Uuid,
    source: Arc<dyn ContentSource>,
    query: Query,
    page_size: u32,
    normalizer: PostNormalizer,
    in_flight: AtomicBool,
    state: Mutex<FeedState>,
}

struct FeedState {
    seeded: bool,
    posts: Vec<Post>,
    seen_uids: HashSet<String>,
    cursor: Option<String>,
}

/// Releases the in-flight claim when dropped, so a caller abandoning a fetch
/// mid-await (timeout, dropped future) cannot strand the feed in a state
/// where every later call reports `FetchInProgress`.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl FeedAggregator {
    pub fn new(source: Arc<dyn ContentSource>, query: Query, page_size: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            query,
            page_size,
            normalizer: PostNormalizer::new(),
            in_flight: AtomicBool::new(false),
            state: Mutex::new(FeedState {
                seeded: false,
                posts: Vec::new(),
                seen_uids: HashSet::new(),
                cursor: None,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // Claim the single in-flight fetch slot, failing fast when another call
    // holds it. The returned guard releases the slot on drop, including when
    // the owning future is cancelled at an await point.
    fn claim_in_flight(&self) -> Result<InFlightGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FeedError::FetchInProgress);
        }
        Ok(InFlightGuard {
            flag: &self.in_flight,
        })
    }

    /// Seed the feed with a page fetched ahead of time. Fails with
    /// `AlreadySeeded` on a second call; a normalization failure leaves the
    /// feed unseeded so the call may be retried with fixed data.
    pub async fn seed(&self, page: Page) -> Result<Vec<Post>> {
        let _guard = self.claim_in_flight()?;

        let mut state = self.state.lock().await;
        if state.seeded {
            return Err(FeedError::AlreadySeeded);
        }

        let normalized = self.normalizer.normalize_page(&page)?;

        state.seeded = true;
        state.cursor = page.next_cursor.clone();
        let appended = Self::append_posts(&mut state, normalized, self.id);

        info!(
            "Feed {} seeded with {} posts (has_more: {})",
            self.id,
            appended.len(),
            state.cursor.is_some()
        );
        Ok(appended)
    }

    /// Fetch the first page from the source and seed with it. A fetch or
    /// normalization failure leaves the feed unseeded and retriable.
    pub async fn seed_from_source(&self) -> Result<Vec<Post>> {
        let _guard = self.claim_in_flight()?;

        {
            let state = self.state.lock().await;
            if state.seeded {
                return Err(FeedError::AlreadySeeded);
            }
        }

        debug!("Feed {}: fetching seed page from {}", self.id, self.source.source_name());
        let page = self
            .source
            .fetch_page(&self.query, None, self.page_size)
            .await?;

        let mut state = self.state.lock().await;
        let normalized = self.normalizer.normalize_page(&page)?;

        state.seeded = true;
        state.cursor = page.next_cursor.clone();
        let appended = Self::append_posts(&mut state, normalized, self.id);

        info!(
            "Feed {} seeded with {} posts (has_more: {})",
            self.id,
            appended.len(),
            state.cursor.is_some()
        );
        Ok(appended)
    }

    /// Fetch, normalize and append the next page, returning only the newly
    /// appended posts so callers can render incrementally.
    ///
    /// Fails with `NotSeeded` before seeding, `AlreadyExhausted` once the
    /// cursor is gone, and `FetchInProgress` while another call holds the
    /// in-flight claim. At most one fetch is in flight per feed; the claim is
    /// taken atomically and released by a drop guard, so a concurrent caller
    /// fails fast instead of queueing and a cancelled caller releases it.
    pub async fn load_next(&self) -> Result<Vec<Post>> {
        let _guard = self.claim_in_flight()?;

        let cursor = {
            let state = self.state.lock().await;
            if !state.seeded {
                return Err(FeedError::NotSeeded);
            }
            match state.cursor.clone() {
                None => return Err(FeedError::AlreadyExhausted),
                Some(cursor) => cursor,
            }
        };

        debug!("Feed {}: fetching next page", self.id);
        let fetched = self
            .source
            .fetch_page(&self.query, Some(&cursor), self.page_size)
            .await;

        let mut state = self.state.lock().await;
        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                warn!("Feed {}: page fetch failed: {}", self.id, e);
                return Err(e);
            }
        };

        // Normalize the whole page before touching the feed, so a bad
        // document never leaves a partially applied page behind.
        let normalized = self.normalizer.normalize_page(&page)?;

        state.cursor = page.next_cursor.clone();
        let appended = Self::append_posts(&mut state, normalized, self.id);

        info!(
            "Feed {}: appended {} posts ({} total, has_more: {})",
            self.id,
            appended.len(),
            state.posts.len(),
            state.cursor.is_some()
        );
        Ok(appended)
    }

    /// Read-only snapshot of the aggregated posts, in fetch order.
    pub async fn posts(&self) -> Vec<Post> {
        self.state.lock().await.posts.clone()
    }

    /// Whether the source holds further pages ("load more" is offered).
    pub async fn has_more(&self) -> bool {
        self.state.lock().await.cursor.is_some()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.posts.is_empty()
    }

    // Append in fetch order, skipping uids already present. The source is
    // expected never to re-emit an item across pages, but concurrent edits
    // upstream can shift page boundaries; a repeat is dropped rather than
    // shown twice.
    fn append_posts(state: &mut FeedState, normalized: Vec<Post>, feed_id: Uuid) -> Vec<Post> {
        let mut appended = Vec::with_capacity(normalized.len());
        for post in normalized {
            if state.seen_uids.contains(&post.uid) {
                warn!("Feed {}: skipping duplicate post uid {}", feed_id, post.uid);
                continue;
            }
            state.seen_uids.insert(post.uid.clone());
            state.posts.push(post.clone());
            appended.push(post);
        }
        appended
    }
}
