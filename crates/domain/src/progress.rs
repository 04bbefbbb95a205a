//! Weekly progress series for charts.
//!
//! Sets are bucketed by the Monday of the week in which their workout ended. Two layouts exist:
//!
//!  - The estimated one-rep max series shows only weeks containing data. The most recent
//!    weeks are kept up to a fixed length and the series is padded with empty entries at the
//!    oldest end.
//!  - The volume series covers a calendar window of consecutive weeks ending with the current
//!    week. Weeks without data are zero and the values are accumulated over the window.
//!
//! Only labels are thinned out to keep the axis readable, values are always complete.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{ExerciseID, WorkoutSet};

pub const ONE_REP_MAX_SERIES_LENGTH: usize = 9;
pub const ONE_REP_MAX_LABEL_STRIDE: usize = 5;

#[allow(async_fn_in_trait)]
pub trait ProgressService {
    /// Never fails. If the sets cannot be read, an empty series of the expected length is
    /// returned.
    async fn get_weekly_progress(
        &self,
        exercise_id: ExerciseID,
        metric: Metric,
        weeks: u32,
        settings: &ChartSettings,
    ) -> ChartSeries;
}

#[derive(Debug, Display, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    #[strum(serialize = "estimated1RM")]
    EstimatedOneRepMax,
    #[strum(serialize = "volume")]
    Volume,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ChartSettings {
    /// Upper bound for the number of non-empty labels of a calendar series.
    pub max_labels: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self { max_labels: 8 }
    }
}

/// Parallel value and label series ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub values: Vec<f32>,
    pub labels: Vec<String>,
    pub title: String,
}

impl ChartSeries {
    #[must_use]
    pub fn empty(len: usize, title: String) -> Self {
        Self {
            values: vec![0.0; len],
            labels: vec![String::new(); len],
            title,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Length of the series produced for a metric, independent of the available data.
#[must_use]
pub fn series_length(metric: Metric, weeks: u32) -> usize {
    match metric {
        Metric::EstimatedOneRepMax => ONE_REP_MAX_SERIES_LENGTH,
        Metric::Volume => weeks as usize,
    }
}

#[must_use]
pub fn weekly_series(
    title: &str,
    sets: &[WorkoutSet],
    metric: Metric,
    weeks: u32,
    today: NaiveDate,
    settings: &ChartSettings,
) -> ChartSeries {
    match metric {
        Metric::EstimatedOneRepMax => one_rep_max_series(title, sets),
        Metric::Volume => volume_series(title, sets, weeks, today, settings),
    }
}

fn one_rep_max_series(title: &str, sets: &[WorkoutSet]) -> ChartSeries {
    let mut weekly: BTreeMap<NaiveDate, f32> = BTreeMap::new();
    for set in sets {
        let estimate = set.estimated_one_rep_max();
        weekly
            .entry(set.week())
            .and_modify(|max| *max = max.max(estimate))
            .or_insert(estimate);
    }

    let mut recent = weekly
        .into_iter()
        .rev()
        .take(ONE_REP_MAX_SERIES_LENGTH)
        .collect::<Vec<_>>();
    recent.reverse();

    let mut series = ChartSeries::empty(ONE_REP_MAX_SERIES_LENGTH - recent.len(), title.into());
    for (monday, value) in recent {
        series.values.push(value);
        series.labels.push(week_label(monday));
    }
    decimate_labels(&mut series.labels, ONE_REP_MAX_LABEL_STRIDE);

    series
}

fn volume_series(
    title: &str,
    sets: &[WorkoutSet],
    weeks: u32,
    today: NaiveDate,
    settings: &ChartSettings,
) -> ChartSeries {
    let mondays = week_range(today, weeks);
    let mut weekly: BTreeMap<NaiveDate, f32> = mondays.iter().map(|m| (*m, 0.0)).collect();

    let mut outside = 0;
    for set in sets {
        match weekly.get_mut(&set.week()) {
            Some(total) => *total += set.volume(),
            None => outside += 1,
        }
    }
    if outside > 0 {
        debug!("{outside} sets outside of the {weeks} week window of \"{title}\"");
    }

    let values = weekly
        .values()
        .scan(0.0, |cumulative, volume| {
            *cumulative += volume;
            Some(*cumulative)
        })
        .collect::<Vec<_>>();
    let mut labels = mondays.iter().map(|m| week_label(*m)).collect::<Vec<_>>();
    let stride = label_stride(labels.len(), settings.max_labels);
    decimate_labels(&mut labels, stride);

    ChartSeries {
        values,
        labels,
        title: title.into(),
    }
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(
        date.weekday().num_days_from_monday(),
    )))
    .unwrap_or(date)
}

/// Mondays of the `weeks` weeks ending with the week containing `today`, oldest first.
#[must_use]
pub fn week_range(today: NaiveDate, weeks: u32) -> Vec<NaiveDate> {
    let current = week_start(today);
    (0..u64::from(weeks))
        .rev()
        .filter_map(|i| current.checked_sub_days(Days::new(7 * i)))
        .collect()
}

/// Month abbreviation, with the year for weeks starting in January.
#[must_use]
pub fn week_label(monday: NaiveDate) -> String {
    if monday.month() == 1 {
        monday.format("%b %Y").to_string()
    } else {
        monday.format("%b").to_string()
    }
}

#[must_use]
pub fn label_stride(len: usize, max_labels: usize) -> usize {
    len.div_ceil(max_labels.max(1)).max(1)
}

/// Blank every label whose index is not a multiple of `stride`.
pub fn decimate_labels(labels: &mut [String], stride: usize) {
    if stride <= 1 {
        return;
    }
    for (i, label) in labels.iter_mut().enumerate() {
        if i % stride != 0 {
            label.clear();
        }
    }
}
