//! Integration tests for activity seeding.

use activities::models::Enrollment;
use activities::repositories::{ActivityRepository, EnrollmentRepository};
use activities::seeds::{SEED_ACTIVITIES, SeedOutcome, seed_activities};
use activities::services::ActivityService;
use anyhow::Result;
use sea_orm::{EntityTrait, PaginatorTrait};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{FileDb, insert_activity, setup_test_db};

#[tokio::test]
async fn test_seed_populates_empty_store() -> Result<()> {
    let db = setup_test_db().await?;

    let outcome = seed_activities(&db).await?;

    assert_eq!(
        outcome,
        SeedOutcome::Seeded {
            activities: 9,
            enrollments: 18
        }
    );

    let stored = ActivityRepository::new(&db).list_all().await?;
    let names: Vec<_> = stored.iter().map(|a| a.name.as_str()).collect();
    let expected: Vec<_> = SEED_ACTIVITIES.iter().map(|s| s.name).collect();
    assert_eq!(names, expected);

    let debate = stored.iter().find(|a| a.name == "Debate Team").unwrap();
    let roster: Vec<_> = EnrollmentRepository::new(&db)
        .list_for_activity(debate.id)
        .await?
        .into_iter()
        .map(|e| e.email)
        .collect();
    assert_eq!(
        roster,
        vec!["charlotte@mergington.edu", "henry@mergington.edu"]
    );
    Ok(())
}

#[tokio::test]
async fn test_seed_twice_is_idempotent() -> Result<()> {
    let db = setup_test_db().await?;

    seed_activities(&db).await?;
    let service = ActivityService::new(db.clone());
    service.signup("Gym Class", "zoe@mergington.edu").await?;
    let before = service.list_activities().await?;

    assert_eq!(seed_activities(&db).await?, SeedOutcome::AlreadySeeded);
    assert_eq!(service.list_activities().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_seed_skips_store_with_any_activity() -> Result<()> {
    let db = setup_test_db().await?;
    insert_activity(&db, "Chess Club", 4).await?;

    assert_eq!(seed_activities(&db).await?, SeedOutcome::AlreadySeeded);
    assert_eq!(ActivityRepository::new(&db).count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_seed_survives_reopened_file_store() -> Result<()> {
    let file_db = FileDb::new()?;

    {
        let db = file_db.connect(1).await?;
        assert!(matches!(
            seed_activities(&db).await?,
            SeedOutcome::Seeded { .. }
        ));
        ActivityService::new(db.clone())
            .signup("Drama Club", "zoe@mergington.edu")
            .await?;
        db.close().await?;
    }

    let db = file_db.connect(1).await?;
    assert_eq!(seed_activities(&db).await?, SeedOutcome::AlreadySeeded);

    let listing = ActivityService::new(db).list_activities().await?;
    assert_eq!(listing.len(), 9);
    assert_eq!(
        listing["Drama Club"].participants,
        vec![
            "ella@mergington.edu",
            "scarlett@mergington.edu",
            "zoe@mergington.edu"
        ]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_seeders_seed_exactly_once() -> Result<()> {
    for _ in 0..10 {
        let file_db = FileDb::new()?;
        let db = file_db.connect(4).await?;

        let mut handles = Vec::new();
        for _ in 0..3 {
            let db = db.clone();
            handles.push(tokio::spawn(async move { seed_activities(&db).await }));
        }

        let mut seeded = 0;
        let mut skipped = 0;
        for handle in handles {
            match handle.await?? {
                SeedOutcome::Seeded { .. } => seeded += 1,
                SeedOutcome::AlreadySeeded => skipped += 1,
            }
        }

        assert_eq!(seeded, 1);
        assert_eq!(skipped, 2);
        assert_eq!(ActivityRepository::new(&db).count().await?, 9);
        assert_eq!(Enrollment::find().count(&db).await?, 18);
    }
    Ok(())
}
