use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
    pub phone_number: String,
    pub fav_games: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}
