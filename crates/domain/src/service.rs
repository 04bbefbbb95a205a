use chrono::{Local, NaiveDate};
use futures_util::future::join_all;
use log::{debug, error, info, warn};

use crate::{
    ChartSeries, ChartSettings, ClassificationError, ClassificationReport, ClassificationSummary,
    Exercise, ExerciseID, ExerciseRepository, ExerciseService, Metric, ProgressService, ReadError,
    Settings, SettingsRepository, SettingsService, UpdateError, WarmupCriteria, WarmupService,
    WorkoutSetRepository, classify_sets, series_length, weekly_series,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        log_on_error!(
            self.repository.read_exercise(id),
            ReadError,
            "get",
            "exercise"
        )
    }
}

impl<R: ExerciseRepository + WorkoutSetRepository> ProgressService for Service<R> {
    async fn get_weekly_progress(
        &self,
        exercise_id: ExerciseID,
        metric: Metric,
        weeks: u32,
        settings: &ChartSettings,
    ) -> ChartSeries {
        self.get_weekly_progress_on(
            exercise_id,
            metric,
            weeks,
            settings,
            Local::now().date_naive(),
        )
        .await
    }
}

impl<R: ExerciseRepository + WorkoutSetRepository> Service<R> {
    /// Weekly progress as seen on `today`, which determines the current week.
    pub async fn get_weekly_progress_on(
        &self,
        exercise_id: ExerciseID,
        metric: Metric,
        weeks: u32,
        settings: &ChartSettings,
        today: NaiveDate,
    ) -> ChartSeries {
        let title = self
            .get_exercise(exercise_id)
            .await
            .map(|exercise| exercise.name.to_string())
            .unwrap_or_default();

        match log_on_error!(
            self.repository.read_sets(exercise_id),
            ReadError,
            "get",
            "sets"
        ) {
            Ok(sets) => weekly_series(&title, &sets, metric, weeks, today, settings),
            Err(_) => {
                warn!("showing empty {metric} chart for \"{title}\"");
                ChartSeries::empty(series_length(metric, weeks), title)
            }
        }
    }
}

impl<R: ExerciseRepository + WorkoutSetRepository> WarmupService for Service<R> {
    async fn classify_exercise(
        &self,
        exercise_id: ExerciseID,
        criteria: &WarmupCriteria,
    ) -> Result<ClassificationSummary, ClassificationError> {
        let sets = log_on_error!(
            self.repository.read_sets(exercise_id),
            ReadError,
            "read",
            "sets"
        )?;

        let classifications = classify_sets(&sets, criteria);

        log_on_error!(
            self.repository
                .write_warmup_flags(exercise_id, &classifications),
            UpdateError,
            "write",
            "warmup flags"
        )?;

        let summary = ClassificationSummary::new(exercise_id, &classifications);
        info!(
            "classified {} of {} sets of exercise {exercise_id} as warmup",
            summary.warmup_sets, summary.sets
        );
        Ok(summary)
    }

    async fn classify_all_exercises(
        &self,
        criteria: &WarmupCriteria,
    ) -> Result<ClassificationReport, ReadError> {
        let exercises = self.get_exercises().await?;

        let results = join_all(exercises.iter().map(|exercise| async move {
            (
                exercise.id,
                self.classify_exercise(exercise.id, criteria).await,
            )
        }))
        .await;

        Ok(ClassificationReport { results })
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<Settings, ReadError> {
        log_on_error!(
            self.repository.read_settings(),
            ReadError,
            "get",
            "settings"
        )
    }

    async fn set_settings(&self, settings: Settings) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_settings(&settings),
            UpdateError,
            "set",
            "settings"
        )
    }
}
