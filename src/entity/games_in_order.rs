use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games_in_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub rental_order_id: Uuid,
    pub game_id: String,
    pub units_ordered: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rental_orders::Entity",
        from = "Column::RentalOrderId",
        to = "super::rental_orders::Column::Id"
    )]
    RentalOrders,
    #[sea_orm(
        belongs_to = "super::catalog::Entity",
        from = "Column::GameId",
        to = "super::catalog::Column::GameId"
    )]
    Catalog,
}

impl Related<super::rental_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalOrders.def()
    }
}

impl Related<super::catalog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Catalog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
