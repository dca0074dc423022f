use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::Result;
use crate::utils::validation::validate_ratings;

pub type UserId = usize;
pub type ItemId = usize;

/// One observed `(user, item, rating)` triple as read from a rating source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: i32,
    pub timestamp: i64,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, rating: i32, timestamp: i64) -> Self {
        Self {
            user_id,
            item_id,
            rating,
            timestamp,
        }
    }
}

/// A training rating plus the cached prediction of every factor trained so far.
///
/// `running_sum` is `0.0` until the first factor is folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub rating: Rating,
    running_sum: f32,
}

impl RatingRecord {
    fn new(rating: Rating) -> Self {
        Self {
            rating,
            running_sum: 0.0,
        }
    }

    pub fn running_sum(&self) -> f32 {
        self.running_sum
    }

    pub(crate) fn set_running_sum(&mut self, value: f32) {
        self.running_sum = value;
    }
}

/// Training ratings in load order. Every id is checked against the capacity
/// bounds on construction, so the core can index the dense tables directly.
#[derive(Debug, Clone)]
pub struct RatingStore {
    records: Vec<RatingRecord>,
}

impl RatingStore {
    pub fn new(ratings: Vec<Rating>, capacity: &ModelConfig) -> Result<Self> {
        validate_ratings(&ratings, capacity)?;

        Ok(Self {
            records: ratings.into_iter().map(RatingRecord::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    /// Marks every record as having no factor folded in.
    pub(crate) fn reset_running_sums(&mut self) {
        for record in self.records.iter_mut() {
            record.set_running_sum(0.0);
        }
    }

    pub(crate) fn records_mut(&mut self) -> &mut [RatingRecord] {
        &mut self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rating> {
        self.records.iter().map(|record| &record.rating)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBias {
    pub total_rating_sum: i64,
    pub total_count: usize,
    pub mean: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserBias {
    pub total_offset_sum: f32,
    pub total_count: usize,
    pub mean: f32,
}

/// Shrinkage-smoothed item means and user offsets, one slot per id up to capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub global_mean: f32,
    pub global_offset_mean: f32,
    pub items: Vec<ItemBias>,
    pub users: Vec<UserBias>,
}

impl Baseline {
    pub fn item_mean(&self, item_id: ItemId) -> f32 {
        self.items[item_id].mean
    }

    pub fn user_mean(&self, user_id: UserId) -> f32 {
        self.users[user_id].mean
    }

    /// Unclamped `item_mean + user_mean`, the seed of every prediction.
    pub fn seed(&self, item_id: ItemId, user_id: UserId) -> f32 {
        self.item_mean(item_id) + self.user_mean(user_id)
    }
}

/// Dense `factor x item` and `factor x user` embedding tables.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorMatrices {
    pub item_factors: DMatrix<f32>,
    pub user_factors: DMatrix<f32>,
}

impl FactorMatrices {
    pub fn num_factors(&self) -> usize {
        self.item_factors.nrows()
    }

    pub fn item_embedding(&self, factor: usize, item_id: ItemId) -> f32 {
        self.item_factors[(factor, item_id)]
    }

    pub fn user_embedding(&self, factor: usize, user_id: UserId) -> f32 {
        self.user_factors[(factor, user_id)]
    }

    pub fn product(&self, factor: usize, item_id: ItemId, user_id: UserId) -> f32 {
        self.item_embedding(factor, item_id) * self.user_embedding(factor, user_id)
    }
}

/// Bias tables and factor matrices produced by a completed training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub capacity: ModelConfig,
    pub baseline: Baseline,
    pub factors: FactorMatrices,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSummary {
    pub factor: usize,
    pub sweeps: usize,
    pub final_rmse: f32,
    /// Training RMSE after every sweep, in order.
    pub rmse_trace: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub factors: Vec<FactorSummary>,
}

impl TrainingReport {
    pub fn total_sweeps(&self) -> usize {
        self.factors.iter().map(|summary| summary.sweeps).sum()
    }

    pub fn final_rmse(&self) -> Option<f32> {
        self.factors.last().map(|summary| summary.final_rmse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub count: usize,
    pub rmse: f32,
    pub mae: f32,
}
