use crate::config::ModelConfig;
use crate::error::{FactorecError, Result};
use crate::models::*;
use crate::utils::shrunk_mean;
use tracing::info;

/// Computes shrinkage-smoothed item means, then user offsets from those means.
///
/// Items (users) with no ratings get the global mean (global mean offset).
pub fn compute_baselines(
    store: &RatingStore,
    capacity: &ModelConfig,
    shrinkage: f32,
) -> Result<Baseline> {
    if store.is_empty() {
        return Err(FactorecError::invalid_input("empty training set"));
    }

    let (global_mean, items) = compute_item_biases(store, capacity.max_items, shrinkage);
    let (global_offset_mean, users) =
        compute_user_biases(store, &items, capacity.max_users, shrinkage);

    info!(
        "Baseline computed: global mean {:.4}, global offset mean {:.4}",
        global_mean, global_offset_mean
    );

    Ok(Baseline {
        global_mean,
        global_offset_mean,
        items,
        users,
    })
}

fn compute_item_biases(
    store: &RatingStore,
    max_items: usize,
    shrinkage: f32,
) -> (f32, Vec<ItemBias>) {
    let mut items = vec![ItemBias::default(); max_items];
    let mut global_rating_sum = 0i64;

    for rating in store.iter() {
        let value = i64::from(rating.rating);
        global_rating_sum += value;

        let bias = &mut items[rating.item_id];
        bias.total_rating_sum += value;
        bias.total_count += 1;
    }

    let global_mean = global_rating_sum as f32 / store.len() as f32;

    for bias in items.iter_mut() {
        bias.mean = shrunk_mean(
            global_mean,
            shrinkage,
            bias.total_rating_sum as f32,
            bias.total_count,
        );
    }

    (global_mean, items)
}

fn compute_user_biases(
    store: &RatingStore,
    items: &[ItemBias],
    max_users: usize,
    shrinkage: f32,
) -> (f32, Vec<UserBias>) {
    let mut users = vec![UserBias::default(); max_users];
    let mut global_offset_sum = 0.0f32;

    for rating in store.iter() {
        let offset = rating.rating as f32 - items[rating.item_id].mean;
        global_offset_sum += offset;

        let bias = &mut users[rating.user_id];
        bias.total_offset_sum += offset;
        bias.total_count += 1;
    }

    let global_offset_mean = global_offset_sum / store.len() as f32;

    for bias in users.iter_mut() {
        bias.mean = shrunk_mean(
            global_offset_mean,
            shrinkage,
            bias.total_offset_sum,
            bias.total_count,
        );
    }

    (global_offset_mean, users)
}
