use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dosages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dosages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dosages::RecipeId).integer().not_null())
                    .col(ColumnDef::new(Dosages::IngredientId).integer().not_null())
                    .col(ColumnDef::new(Dosages::Amount).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Dosages::Table, Dosages::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Dosages::Table, Dosages::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Dosages::Table)
                    .col(Dosages::RecipeId)
                    .col(Dosages::IngredientId)
                    .name("uq_dosages_recipe_ingredient")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dosages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Dosages {
    Table,
    Id,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
}
