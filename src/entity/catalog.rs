use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "catalog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: String,
    pub game_name: String,
    pub genre: String,
    pub price: i64,
    pub description: String,
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::games_in_order::Entity")]
    GamesInOrder,
}

impl Related<super::games_in_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamesInOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
