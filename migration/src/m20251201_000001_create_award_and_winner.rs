use sea_orm_migration::prelude::*;

/// 奖项表
#[derive(DeriveIden)]
enum Award {
    Table,
    Id,
    Award,
    Num,
    CreatedAt,
    UpdatedAt,
}

/// 得奖者表
#[derive(DeriveIden)]
enum Winner {
    Table,
    Id,
    AwardId,
    Award,
    EmpId,
    EmpCname,
    EmpEname,
    EmpFactory,
    WonAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// winner.award_id 只是弱引用，不建外键：删除奖项不影响已有得奖记录。
/// emp_id 唯一索引是"一人一奖"在存储层的兜底。
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Award::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Award::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Award::Award).string_len(255).not_null())
                    .col(ColumnDef::new(Award::Num).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Award::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Award::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Winner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Winner::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Winner::AwardId).string_len(32).not_null())
                    .col(ColumnDef::new(Winner::Award).string_len(255).not_null())
                    .col(ColumnDef::new(Winner::EmpId).string_len(64).not_null())
                    .col(ColumnDef::new(Winner::EmpCname).string_len(255).null())
                    .col(ColumnDef::new(Winner::EmpEname).string_len(255).null())
                    .col(ColumnDef::new(Winner::EmpFactory).string_len(255).null())
                    .col(
                        ColumnDef::new(Winner::WonAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winner_emp_id_unique")
                    .table(Winner::Table)
                    .col(Winner::EmpId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按奖项查询 / 批量删除
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winner_award_id")
                    .table(Winner::Table)
                    .col(Winner::AwardId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Winner::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Award::Table).to_owned())
            .await?;

        Ok(())
    }
}
