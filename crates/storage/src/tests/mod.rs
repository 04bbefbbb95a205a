use assert_approx_eq::assert_approx_eq;
use ironlog_domain::{
    ClassificationReport, ExerciseService, Metric, Service, SettingsService, WarmupService,
};
use pretty_assertions::assert_eq;
use rusqlite::params;


fn summaries(report: &ClassificationReport) -> Vec<(String, usize, usize)> {
    let mut summaries = report
        .succeeded()
        .map(|summary| {
            (
                summary.exercise_id.to_string(),
                summary.sets,
                summary.warmup_sets,
            )
        })
        .collect::<Vec<_>>();
    summaries.sort_unstable();
    summaries
}

#[tokio::test]
async fn test_classify_all_exercises() {
    let (db, ids) = data::training_log();
    let service = Service::new(db);
    let settings = service.get_settings().await.unwrap();

    let report = service
        .classify_all_exercises(&settings.warmup)
        .await
        .unwrap();

    assert_eq!(report.failed().count(), 0);
    let mut expected = vec![
        (ids.squat.to_string(), 4, 1),
        (ids.bench_press.to_string(), 0, 0),
    ];
    expected.sort_unstable();
    assert_eq!(summaries(&report), expected);
}

#[tokio::test]
async fn test_classify_all_exercises_is_idempotent() {
    let (db, _) = data::training_log();
    let service = Service::new(db);
    let settings = service.get_settings().await.unwrap();

    let first = service
        .classify_all_exercises(&settings.warmup)
        .await
        .unwrap();
    let second = service
        .classify_all_exercises(&settings.warmup)
        .await
        .unwrap();

    assert_eq!(summaries(&second), summaries(&first));
}

#[tokio::test]
async fn test_get_weekly_progress() {
    let (db, ids) = data::training_log();
    let service = Service::new(db);
    let settings = service.get_settings().await.unwrap();

    let volume = service
        .get_weekly_progress_on(ids.squat, Metric::Volume, 4, &settings.chart, *data::TODAY)
        .await;

    assert_eq!(volume.title, data::SQUAT);
    assert_eq!(volume.len(), 4);
    for (value, expected) in volume.values.iter().zip([0.0, 0.0, 0.0, 1912.5]) {
        assert_approx_eq!(*value, expected, 0.01);
    }

    let one_rep_max = service
        .get_weekly_progress_on(
            ids.squat,
            Metric::EstimatedOneRepMax,
            4,
            &settings.chart,
            *data::TODAY,
        )
        .await;

    assert_eq!(one_rep_max.len(), 9);
    assert_approx_eq!(one_rep_max.values[8], 119.566, 0.01);
    assert!(one_rep_max.values[..8].iter().all(|value| *value == 0.0));
}

#[tokio::test]
async fn test_get_exercises() {
    let (db, ids) = data::training_log();
    let service = Service::new(db);

    assert_eq!(
        service
            .get_exercises()
            .await
            .unwrap()
            .iter()
            .map(|exercise| exercise.id)
            .collect::<Vec<_>>(),
        vec![ids.bench_press, ids.squat]
    );
}

#[tokio::test]
async fn test_imported_set_with_text_values() {
    let (db, ids) = data::training_log();
    let workout = db.create_workout(*data::WORKOUT_END).unwrap();
    db.connection()
        .unwrap()
        .execute(
            "INSERT INTO sets (exercise_id, workout_id, reps, weight) VALUES (?1, ?2, 'abc', '')",
            params![ids.squat.to_string(), workout.to_string()],
        )
        .unwrap();
    let service = Service::new(db);
    let settings = service.get_settings().await.unwrap();

    let volume = service
        .get_weekly_progress_on(ids.squat, Metric::Volume, 4, &settings.chart, *data::TODAY)
        .await;

    assert_approx_eq!(volume.values[3], 1912.5, 0.01);

    let report = service
        .classify_all_exercises(&settings.warmup)
        .await
        .unwrap();

    assert_eq!(report.failed().count(), 0);
    assert!(
        report
            .succeeded()
            .any(|summary| summary.exercise_id == ids.squat && summary.sets == 5)
    );
}
