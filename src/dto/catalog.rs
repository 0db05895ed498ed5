use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Catalog browse filters: everything, one genre, or games under a price
/// ceiling sorted by price.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub genre: Option<String>,
    pub under_price: Option<i64>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    pub game_id: String,
    pub game_name: String,
    pub genre: String,
    pub price: i64,
    pub description: String,
    pub image_url: String,
}

/// Full-row edit keyed by `game_id`; every field is rewritten.
#[derive(Debug, Deserialize)]
pub struct UpdateGameRequest {
    pub game_name: String,
    pub genre: String,
    pub price: i64,
    pub description: String,
    pub image_url: String,
}
