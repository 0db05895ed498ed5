use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tracking_info")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub rental_order_id: Uuid,
    pub status: String,
    pub current_location: String,
    pub courier_name: String,
    pub last_update_date: DateTimeWithTimeZone,
    pub additional_comments: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rental_orders::Entity",
        from = "Column::RentalOrderId",
        to = "super::rental_orders::Column::Id"
    )]
    RentalOrders,
}

impl Related<super::rental_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
