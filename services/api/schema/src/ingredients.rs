use sea_orm::entity::prelude::*;

/// Ingredient catalogue entry, unique on `(name, measurement_unit)`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dosages::Entity")]
    Dosages,
}

impl Related<super::dosages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dosages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
