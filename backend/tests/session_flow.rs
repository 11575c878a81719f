use std::sync::Arc;

use fluid_check_backend::storage::csv::connection::safe_directory_name;
use fluid_check_backend::storage::{FluidLogRepository, FluidLogStorage, UserPreferences};
use fluid_check_backend::{CoreConfig, HydrationSession, OfflineCoach, SessionServices};
use shared::{AchievementState, FluidType, GoalSuggestionSource, LogDrinkRequest, UserRecord};
use tempfile::TempDir;

fn config_in(temp_dir: &TempDir) -> CoreConfig {
    CoreConfig::load_from(None, Some(temp_dir.path().join("data"))).unwrap()
}

fn drink(fluid_type: FluidType, time: &str, amount_ml: u32) -> LogDrinkRequest {
    LogDrinkRequest {
        fluid_type,
        time: time.to_string(),
        amount_ml,
    }
}

#[tokio::test]
async fn test_day_of_drinks_survives_sign_out() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);

    let services = SessionServices::with_file_storage(&config, Arc::new(OfflineCoach)).unwrap();
    let mut session = HydrationSession::start("Ana Lima", services).await.unwrap();

    session
        .complete_setup(
            &UserRecord {
                weight: "64".to_string(),
                sex: "Female".to_string(),
                ..Default::default()
            },
            Some(2000),
        )
        .await
        .unwrap();

    session.log_drink(drink(FluidType::Water, "08:00 AM", 500)).await.unwrap();
    session.log_drink(drink(FluidType::Coffee, "07:15 AM", 250)).await.unwrap();
    let reached = session
        .log_drink(drink(FluidType::CoconutWater, "12:30 PM", 1250))
        .await
        .unwrap();
    assert!(reached.achievement_notice);
    assert!(session.acknowledge_achievement());
    session.end();

    let data_dir = temp_dir
        .path()
        .join("data")
        .join(safe_directory_name("Ana Lima"));
    assert!(data_dir.join("fluid_logs.csv").exists());
    assert!(data_dir.join("preferences.yaml").exists());

    let services = SessionServices::with_file_storage(&config, Arc::new(OfflineCoach)).unwrap();
    let session = HydrationSession::start("Ana Lima", services).await.unwrap();
    let snapshot = session.snapshot();

    assert!(session.is_setup_complete().await.unwrap());
    assert_eq!(session.profile().await.unwrap().weight, "64");
    assert_eq!(snapshot.goal_ml, 2000);
    assert_eq!(snapshot.total_ml, 2000);
    assert_eq!(snapshot.achievement, AchievementState::AchievedPendingNotice);

    let history: Vec<FluidType> = session.log_history().iter().map(|e| e.fluid_type).collect();
    assert_eq!(
        history,
        vec![FluidType::CoconutWater, FluidType::Coffee, FluidType::Water]
    );
}

#[tokio::test]
async fn test_offline_coach_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    let services = SessionServices::with_file_storage(&config, Arc::new(OfflineCoach)).unwrap();
    let mut session = HydrationSession::start("ben", services.clone()).await.unwrap();
    session.update_daily_goal(2600).await.unwrap();

    let suggestion = session.estimate_daily_goal(&UserRecord::default()).await;
    assert_eq!(suggestion.source, GoalSuggestionSource::Default);
    assert_eq!(suggestion.goal_ml, 3000);
    assert_eq!(services.preferences.daily_goal("ben").await.unwrap(), 2600);

    assert_eq!(
        session.hydration_tip("sweet drinks", "one coffee a day").await,
        "Could not get recommendation"
    );
}

#[tokio::test]
async fn test_deleting_everything_leaves_an_empty_log() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    let services = SessionServices::with_file_storage(&config, Arc::new(OfflineCoach)).unwrap();
    let mut session = HydrationSession::start("cara", services).await.unwrap();

    let logged = session.log_drink(drink(FluidType::Soup, "07:00 PM", 350)).await.unwrap();
    let id = logged.entry.unwrap().id;
    let deleted = session.delete_log(id).await.unwrap();
    assert!(deleted.applied);

    let connection = fluid_check_backend::storage::CsvConnection::new(&config.data_directory).unwrap();
    let repository = FluidLogRepository::new(connection.clone());
    assert!(repository.load_logs("cara").await.unwrap().is_empty());

    let preferences = UserPreferences::new(Arc::new(
        fluid_check_backend::storage::YamlPreferencesStore::new(connection),
    ));
    assert_eq!(preferences.daily_goal("cara").await.unwrap(), 3000);
}

#[tokio::test]
async fn test_similar_usernames_keep_separate_data() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(&temp_dir);
    let start = |username: &'static str| {
        let services = SessionServices::with_file_storage(&config, Arc::new(OfflineCoach)).unwrap();
        HydrationSession::start(username, services)
    };

    let mut upper = start("Ana").await.unwrap();
    upper.log_drink(drink(FluidType::Water, "08:00 AM", 800)).await.unwrap();
    upper.update_daily_goal(1234).await.unwrap();
    let mut li = start("李").await.unwrap();
    li.log_drink(drink(FluidType::Tea, "09:00 AM", 400)).await.unwrap();

    let lower = start("ana").await.unwrap();
    assert_eq!(lower.snapshot().total_ml, 0);
    assert_eq!(lower.snapshot().goal_ml, 3000);

    let wang = start("王").await.unwrap();
    assert_eq!(wang.snapshot().total_ml, 0);

    let upper_again = start("Ana").await.unwrap();
    assert_eq!(upper_again.snapshot().total_ml, 800);
    assert_eq!(upper_again.snapshot().goal_ml, 1234);
}
