use crate::config::ModelConfig;
use crate::error::{FactorecError, IdKind, Result};
use crate::models::*;
use tracing::warn;

pub fn validate_user_id(user_id: UserId, capacity: &ModelConfig) -> Result<()> {
    if user_id >= capacity.max_users {
        return Err(FactorecError::out_of_range(
            IdKind::User,
            user_id,
            capacity.max_users,
        ));
    }
    Ok(())
}

pub fn validate_item_id(item_id: ItemId, capacity: &ModelConfig) -> Result<()> {
    if item_id >= capacity.max_items {
        return Err(FactorecError::out_of_range(
            IdKind::Item,
            item_id,
            capacity.max_items,
        ));
    }
    Ok(())
}

pub fn validate_rating(rating: &Rating, capacity: &ModelConfig) -> Result<()> {
    validate_user_id(rating.user_id, capacity)?;
    validate_item_id(rating.item_id, capacity)
}

/// Checks every id against capacity. Rating values outside 1..=5 are
/// accepted but reported once per batch.
pub fn validate_ratings(ratings: &[Rating], capacity: &ModelConfig) -> Result<()> {
    let mut out_of_scale = 0usize;

    for rating in ratings {
        validate_rating(rating, capacity)?;
        if !(1..=5).contains(&rating.rating) {
            out_of_scale += 1;
        }
    }

    if out_of_scale > 0 {
        warn!(
            "{} of {} ratings fall outside the 1..=5 scale",
            out_of_scale,
            ratings.len()
        );
    }

    Ok(())
}

pub fn ensure_non_empty<T>(items: &[T], what: &str) -> Result<()> {
    if items.is_empty() {
        return Err(FactorecError::invalid_input(format!("empty {}", what)));
    }
    Ok(())
}
