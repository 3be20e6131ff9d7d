//! Enrollment entity model
//!
//! This module contains the SeaORM entity model for the enrollment table,
//! which links student emails to activities.

use super::activity::Entity as Activity;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// Enrollment entity representing one student on one activity roster
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollment")]
pub struct Model {
    /// Surrogate identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Activity this enrollment belongs to
    pub activity_id: i32,

    /// Student identifier; matched as a plain string
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Activity",
        from = "Column::ActivityId",
        to = "super::activity::Column::Id",
        on_delete = "Cascade"
    )]
    Activity,
}

impl Related<Activity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
