use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rental_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub login: String,
    pub no_of_games: i32,
    pub total_price: i64,
    pub order_timestamp: DateTimeWithTimeZone,
    pub due_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Login",
        to = "super::users::Column::Login"
    )]
    Users,
    #[sea_orm(has_many = "super::games_in_order::Entity")]
    GamesInOrder,
    #[sea_orm(has_one = "super::tracking_info::Entity")]
    TrackingInfo,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::games_in_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GamesInOrder.def()
    }
}

impl Related<super::tracking_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
