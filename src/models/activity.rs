//! Activity entity model
//!
//! This module contains the SeaORM entity model for the activity table,
//! the catalog of extracurricular offerings and their capacity.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// Activity entity representing a named extracurricular offering
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    /// Surrogate identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Human-readable name, unique across all activities
    #[sea_orm(unique)]
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Free-text meeting schedule, e.g. "Fridays, 3:30 PM - 5:00 PM"
    pub schedule: String,

    /// Maximum number of enrolled students
    pub max_participants: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollment,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
