//! Activity seeding functionality
//!
//! Seeds the activity and enrollment tables with the activities offered at
//! Mergington High School. Seeding only happens against an empty store.

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::error::RepositoryError;
use crate::repositories::{ActivityRepository, EnrollmentRepository, NewActivity};

/// A built-in activity together with its initial roster
#[derive(Debug, Clone, Copy)]
pub struct SeedActivity {
    pub name: &'static str,
    pub description: &'static str,
    pub schedule: &'static str,
    pub max_participants: i32,
    pub participants: &'static [&'static str],
}

/// Activities inserted into an empty store, in id order
pub const SEED_ACTIVITIES: &[SeedActivity] = &[
    SeedActivity {
        name: "Chess Club",
        description: "Learn strategies and compete in chess tournaments",
        schedule: "Fridays, 3:30 PM - 5:00 PM",
        max_participants: 12,
        participants: &["michael@mergington.edu", "daniel@mergington.edu"],
    },
    SeedActivity {
        name: "Programming Class",
        description: "Learn programming fundamentals and build software projects",
        schedule: "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        max_participants: 20,
        participants: &["emma@mergington.edu", "sophia@mergington.edu"],
    },
    SeedActivity {
        name: "Gym Class",
        description: "Physical education and sports activities",
        schedule: "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        max_participants: 30,
        participants: &["john@mergington.edu", "olivia@mergington.edu"],
    },
    SeedActivity {
        name: "Soccer Team",
        description: "Join the school soccer team and compete in matches",
        schedule: "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
        max_participants: 22,
        participants: &["liam@mergington.edu", "noah@mergington.edu"],
    },
    SeedActivity {
        name: "Basketball Team",
        description: "Practice and play basketball with the school team",
        schedule: "Wednesdays and Fridays, 3:30 PM - 5:00 PM",
        max_participants: 15,
        participants: &["ava@mergington.edu", "mia@mergington.edu"],
    },
    SeedActivity {
        name: "Art Club",
        description: "Explore your creativity through painting and drawing",
        schedule: "Thursdays, 3:30 PM - 5:00 PM",
        max_participants: 15,
        participants: &["amelia@mergington.edu", "harper@mergington.edu"],
    },
    SeedActivity {
        name: "Drama Club",
        description: "Act, direct, and produce plays and performances",
        schedule: "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
        max_participants: 20,
        participants: &["ella@mergington.edu", "scarlett@mergington.edu"],
    },
    SeedActivity {
        name: "Math Club",
        description: "Solve challenging problems and participate in math competitions",
        schedule: "Tuesdays, 3:30 PM - 4:30 PM",
        max_participants: 10,
        participants: &["james@mergington.edu", "benjamin@mergington.edu"],
    },
    SeedActivity {
        name: "Debate Team",
        description: "Develop public speaking and argumentation skills",
        schedule: "Fridays, 4:00 PM - 5:30 PM",
        max_participants: 12,
        participants: &["charlotte@mergington.edu", "henry@mergington.edu"],
    },
];

/// Result of a seeding attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held activities; nothing was written
    AlreadySeeded,
    /// The built-in data was inserted
    Seeded { activities: usize, enrollments: usize },
}

/// Seeds the store with [`SEED_ACTIVITIES`] when it holds no activities.
///
/// The check and all inserts share one transaction that holds the write lock
/// from its first statement, so concurrent seeders run one after another and
/// every later one finds the store populated. A unique activity name left by
/// a writer outside this function also ends in [`SeedOutcome::AlreadySeeded`].
pub async fn seed_activities(db: &DatabaseConnection) -> Result<SeedOutcome, RepositoryError> {
    let txn = db.begin().await.map_err(RepositoryError::database_error)?;

    let repo = ActivityRepository::new(&txn);
    repo.lock_for_write().await?;

    let existing = repo.count().await?;
    if existing > 0 {
        log::info!("Store already holds {} activities, skipping seed", existing);
        return Ok(SeedOutcome::AlreadySeeded);
    }

    match insert_seed_data(&txn).await {
        Ok((activities, enrollments)) => {
            txn.commit()
                .await
                .map_err(RepositoryError::database_error)?;
            log::info!(
                "Seeded {} activities with {} enrollments",
                activities,
                enrollments
            );
            Ok(SeedOutcome::Seeded {
                activities,
                enrollments,
            })
        }
        Err(RepositoryError::UniqueViolation(source)) => {
            log::info!("Store was seeded concurrently, skipping seed: {}", source);
            Ok(SeedOutcome::AlreadySeeded)
        }
        Err(err) => Err(err),
    }
}

async fn insert_seed_data<C: sea_orm::ConnectionTrait>(
    txn: &C,
) -> Result<(usize, usize), RepositoryError> {
    let activities = ActivityRepository::new(txn);
    let roster = EnrollmentRepository::new(txn);
    let mut enrollments = 0;

    for seed in SEED_ACTIVITIES {
        log::info!("Creating activity: {}", seed.name);
        let activity = activities
            .insert(NewActivity {
                name: seed.name,
                description: seed.description,
                schedule: seed.schedule,
                max_participants: seed.max_participants,
            })
            .await?;

        for email in seed.participants {
            roster.insert(activity.id, email).await?;
            enrollments += 1;
        }
    }

    Ok((SEED_ACTIVITIES.len(), enrollments))
}
