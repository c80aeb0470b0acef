use sea_orm_migration::prelude::*;

/// Creates `favorites` and `shopping_carts`, which share one layout.
#[derive(DeriveMigrationName)]
pub struct Migration;

fn list_table(table: ListTable) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(ListColumn::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(ListColumn::UserId).integer().not_null())
        .col(ColumnDef::new(ListColumn::RecipeId).integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(table, ListColumn::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(table, ListColumn::RecipeId)
                .to(Recipes::Table, Recipes::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, index) in [
            (ListTable::Favorites, "uq_favorites_user_recipe"),
            (ListTable::ShoppingCarts, "uq_shopping_carts_user_recipe"),
        ] {
            manager.create_table(list_table(table)).await?;
            manager
                .create_index(
                    Index::create()
                        .table(table)
                        .col(ListColumn::UserId)
                        .col(ListColumn::RecipeId)
                        .name(index)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListTable::ShoppingCarts).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ListTable::Favorites).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum ListTable {
    Favorites,
    ShoppingCarts,
}

#[derive(Iden)]
enum ListColumn {
    Id,
    UserId,
    RecipeId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}
