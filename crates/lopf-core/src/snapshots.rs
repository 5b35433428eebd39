//! Ordered snapshots and their weightings.
//!
//! A weighting is the duration a snapshot stands for, in hours. Multiplying a
//! power series by it yields energy; raising a per-hour retention factor to
//! it yields the retention over the snapshot.

use crate::error::{LopfError, LopfResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshots {
    labels: Vec<String>,
    weightings: Vec<f64>,
}

impl Snapshots {
    /// Snapshots with unit weighting.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let weightings = vec![1.0; labels.len()];
        Self { labels, weightings }
    }

    /// `count` hourly snapshots labelled `t0`, `t1`, …
    pub fn hourly(count: usize) -> Self {
        Self::new((0..count).map(|t| format!("t{t}")))
    }

    pub fn with_weightings(mut self, weightings: Vec<f64>) -> LopfResult<Self> {
        if weightings.len() != self.labels.len() {
            return Err(LopfError::shape(
                "snapshot weightings",
                self.labels.len(),
                weightings.len(),
            ));
        }
        self.weightings = weightings;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn weightings(&self) -> &[f64] {
        &self.weightings
    }

    /// Fail with a shape error unless `len` matches the snapshot count.
    pub fn ensure_len(&self, what: &str, len: usize) -> LopfResult<()> {
        if len == self.len() {
            Ok(())
        } else {
            Err(LopfError::shape(what, self.len(), len))
        }
    }

    /// Convert a per-snapshot rate into energy.
    pub fn to_energy(&self, what: &str, power: &[f64]) -> LopfResult<Vec<f64>> {
        self.ensure_len(what, power.len())?;
        Ok(power
            .iter()
            .zip(&self.weightings)
            .map(|(p, w)| p * w)
            .collect())
    }

    /// Retention over each snapshot for an hourly standing loss.
    pub fn standing_factors(&self, standing_loss: f64) -> Vec<f64> {
        self.weightings
            .iter()
            .map(|w| (1.0 - standing_loss).powf(*w))
            .collect()
    }

    /// Repeat a static attribute across the snapshot axis.
    pub fn broadcast(&self, value: f64) -> Vec<f64> {
        vec![value; self.len()]
    }
}
