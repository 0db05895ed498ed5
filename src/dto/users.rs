use crate::models::Role;

/// Self-service profile edits available to every role.
#[derive(Debug, Clone)]
pub enum ProfileUpdate {
    Password(String),
    PhoneNumber(String),
    FavGames(String),
}

/// Manager edits applied to an arbitrary account.
#[derive(Debug, Clone)]
pub enum UserUpdate {
    Login(String),
    Role(Role),
    OverdueGames(i32),
    Password(String),
    FavGames(String),
    PhoneNumber(String),
}
