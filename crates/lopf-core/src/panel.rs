//! Time panels: one row per snapshot, one column per entity.
//!
//! A panel wraps a polars [`DataFrame`] whose column names are entity ids.
//! Solvers export integer columns for commitment status and float columns
//! for everything else; reads always cast to `Float64`, and nulls come back
//! as NaN so downstream statistics skip them.

use crate::error::{LopfError, LopfResult};
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct TimePanel {
    frame: DataFrame,
}

impl TimePanel {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Build a panel from `(entity, values)` columns of equal length.
    pub fn from_columns<I, S>(columns: I) -> LopfResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: AsRef<str>,
    {
        let series: Vec<Series> = columns
            .into_iter()
            .map(|(entity, values)| Series::new(entity.as_ref(), values))
            .collect();
        Ok(Self {
            frame: DataFrame::new(series)?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of snapshots covered; zero for a panel without columns.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.width() == 0
    }

    pub fn entities(&self) -> Vec<&str> {
        self.frame.get_column_names()
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.frame.get_column_names().contains(&entity)
    }

    /// Values of one entity's column, or `None` if the panel lacks it.
    pub fn values(&self, entity: &str) -> LopfResult<Option<Vec<f64>>> {
        if !self.contains(entity) {
            return Ok(None);
        }
        let column = self.frame.column(entity)?.cast(&DataType::Float64)?;
        let values = column
            .f64()?
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect();
        Ok(Some(values))
    }

    /// The entity's column if present, otherwise `default` repeated `len` times.
    pub fn dense_or(&self, entity: &str, default: f64, len: usize) -> LopfResult<Vec<f64>> {
        match self.values(entity)? {
            Some(values) if values.len() == len => Ok(values),
            Some(values) => Err(LopfError::shape(entity, len, values.len())),
            None => Ok(vec![default; len]),
        }
    }
}

/// Time-varying fields of one component kind, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct PanelSet {
    panels: BTreeMap<String, TimePanel>,
}

impl PanelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&TimePanel> {
        self.panels.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.panels.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, panel: TimePanel) -> Option<TimePanel> {
        self.panels.insert(field.into(), panel)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(String::as_str)
    }

    /// Optional panel lookup that also treats column-less panels as absent.
    pub fn non_empty(&self, field: &str) -> Option<&TimePanel> {
        self.get(field).filter(|panel| !panel.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_roundtrips_columns() {
        let panel =
            TimePanel::from_columns([("gen_a", vec![1.0, 2.0]), ("gen_b", vec![3.0, 4.0])])
                .unwrap();
        assert_eq!(panel.height(), 2);
        assert_eq!(panel.entities(), ["gen_a", "gen_b"]);
        assert_eq!(panel.values("gen_b").unwrap(), Some(vec![3.0, 4.0]));
        assert_eq!(panel.values("gen_c").unwrap(), None);
    }

    #[test]
    fn test_unequal_columns_are_rejected() {
        let result = TimePanel::from_columns([("a", vec![1.0, 2.0]), ("b", vec![1.0])]);
        assert!(matches!(result, Err(LopfError::Panel(_))));
    }

    #[test]
    fn test_integer_columns_are_cast() {
        let frame = DataFrame::new(vec![Series::new("unit", vec![0i32, 1, 1])]).unwrap();
        let panel = TimePanel::new(frame);
        assert_eq!(panel.values("unit").unwrap(), Some(vec![0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_nulls_read_as_nan() {
        let frame = DataFrame::new(vec![Series::new("unit", vec![Some(1.0), None])]).unwrap();
        let values = TimePanel::new(frame).values("unit").unwrap().unwrap();
        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
    }

    #[test]
    fn test_dense_or_broadcasts_static_value() {
        let panel = TimePanel::from_columns([("wind", vec![0.5, 0.7])]).unwrap();
        assert_eq!(panel.dense_or("wind", 1.0, 2).unwrap(), vec![0.5, 0.7]);
        assert_eq!(panel.dense_or("coal", 1.0, 2).unwrap(), vec![1.0, 1.0]);
        assert!(panel.dense_or("wind", 1.0, 3).is_err());
    }

    #[test]
    fn test_panel_set_lookup() {
        let mut set = PanelSet::new();
        set.insert("p", TimePanel::from_columns([("g", vec![1.0])]).unwrap());
        set.insert("status", TimePanel::default());
        assert!(set.non_empty("p").is_some());
        assert!(set.contains("status"));
        assert!(set.non_empty("status").is_none());
        assert_eq!(set.fields().collect::<Vec<_>>(), ["p", "status"]);
    }
}
