// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Deal listing, tag joining, home-airport sorting, and the like flow.

use crate::db::RestStore;
use crate::error::{AppError, Result};
use crate::models::{Deal, DealTag, DealWithTags};

/// Fetch the full deal set for a user: deals plus tags, joined by deal
/// id, flagged and sorted by the user's home-airport city.
///
/// Every call re-fetches everything; there is no cache across requests.
pub async fn list_for_user(db: &RestStore, user_id: &str, city_override: Option<&str>) -> Result<Vec<DealWithTags>> {
    let filter_city = match city_override {
        Some(city) => Some(city.to_string()),
        None => db
            .get_profile(user_id)
            .await?
            .and_then(|p| p.home_city().map(|c| c.to_string())),
    };

    let deals = db.list_deals().await?;
    let tags = db.list_deal_tags().await?;

    let mut joined = attach_tags(deals, &tags, filter_city.as_deref());
    sort_deals(&mut joined);
    Ok(joined)
}

/// Fetch one deal with its tags. `None` means the id does not exist.
pub async fn get(db: &RestStore, deal_id: &str) -> Result<Option<DealWithTags>> {
    let Some(deal) = db.get_deal(deal_id).await? else {
        return Ok(None);
    };

    let tags = db.list_deal_tags().await?;
    let deal_tags = tags
        .iter()
        .filter(|t| t.deal_id == deal.id)
        .map(|t| t.tag.clone())
        .collect();

    Ok(Some(DealWithTags {
        deal,
        tags: deal_tags,
        from_home_airport: false,
    }))
}

/// Bump the likes counter and return the authoritative post-increment
/// value. Failure of the RPC propagates so the caller can roll back its
/// optimistic count.
pub async fn like(db: &RestStore, deal_id: &str) -> Result<i64> {
    db.increment_deal_likes(deal_id).await?;
    db.get_deal_likes(deal_id).await
}

/// Join tags onto deals by id and flag deals departing from the given
/// city (case-insensitive substring on the departure description).
pub fn attach_tags(deals: Vec<Deal>, tags: &[DealTag], filter_city: Option<&str>) -> Vec<DealWithTags> {
    let city_lower = filter_city.map(|c| c.to_lowercase());

    deals
        .into_iter()
        .map(|deal| {
            let deal_tags = tags
                .iter()
                .filter(|t| t.deal_id == deal.id)
                .map(|t| t.tag.clone())
                .collect();

            let from_home_airport = city_lower
                .as_deref()
                .map(|city| !city.is_empty() && deal.departure.to_lowercase().contains(city))
                .unwrap_or(false);

            DealWithTags {
                deal,
                tags: deal_tags,
                from_home_airport,
            }
        })
        .collect()
}

/// Sort deals for the listing: home-airport matches first, ties broken by
/// `created_at` descending. The sort is stable, so re-sorting an already
/// sorted list is a no-op.
pub fn sort_deals(deals: &mut [DealWithTags]) {
    deals.sort_by(|a, b| {
        b.from_home_airport
            .cmp(&a.from_home_airport)
            .then_with(|| b.deal.created_at.cmp(&a.deal.created_at))
    });
}

/// Optimistic like counter for a single deal.
///
/// The displayed count bumps immediately on `begin`, then either settles
/// on the authoritative value from the store (`commit`) or reverts
/// (`rollback`) if the increment RPC failed.
#[derive(Debug, Clone)]
pub struct LikeCounter {
    count: i64,
    in_flight: bool,
}

impl LikeCounter {
    pub fn new(initial: i64) -> Self {
        Self {
            count: initial,
            in_flight: false,
        }
    }

    /// Currently displayed count.
    pub fn current(&self) -> i64 {
        self.count
    }

    /// Optimistically bump the count before the RPC resolves. Returns
    /// false if an increment is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.count += 1;
        self.in_flight = true;
        true
    }

    /// Settle on the authoritative count fetched after the RPC.
    pub fn commit(&mut self, authoritative: i64) {
        self.count = authoritative;
        self.in_flight = false;
    }

    /// Revert the optimistic bump after an RPC failure.
    pub fn rollback(&mut self) {
        if self.in_flight {
            self.count -= 1;
            self.in_flight = false;
        }
    }
}
