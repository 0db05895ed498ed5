pub mod input;
pub mod render;

use std::io::{BufRead, Write};

use uuid::Uuid;

use crate::{
    dto::{
        auth::{LoginRequest, RegisterRequest},
        catalog::{CatalogQuery, NewGameRequest, SortOrder, UpdateGameRequest},
        orders::{OrderDetails, PlaceOrderRequest},
        tracking::TrackingUpdate,
        users::{ProfileUpdate, UserUpdate},
    },
    error::{AppError, AppResult},
    models::Role,
    services::{
        admin_service, auth_service, catalog_service, order_service, profile_service,
        role_service, tracking_service,
    },
    session::{Session, ensure_manager},
    state::AppState,
};

use input::{parse_price_cents, prompt_line, read_choice};
use render::{format_cents, print_table};

pub fn greeting<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "\n*******************************************************\n\
         *              Game Rental Store                      *\n\
         *******************************************************\n"
    )
}

/// Top-level loop: the anonymous menu. Register keeps the state anonymous;
/// a successful login drops into the authenticated menu; exit or EOF ends
/// the session.
pub async fn run<R, W>(state: &AppState, input: &mut R, out: &mut W) -> AppResult<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(out, "MAIN MENU")?;
        writeln!(out, "---------")?;
        writeln!(out, "1. Create user")?;
        writeln!(out, "2. Log in")?;
        writeln!(out, "9. < EXIT")?;

        let choice = match read_choice(input, out)? {
            Some(choice) => choice,
            None => break,
        };
        match choice {
            1 => {
                if let Err(err) = create_user(state, input, out).await {
                    report(out, &err)?;
                }
            }
            2 => match log_in(state, input, out).await {
                Ok(Some(mut session)) => {
                    writeln!(out, "Welcome {} {}", session.role, session.login)?;
                    user_menu(state, input, out, &mut session).await?;
                }
                Ok(None) => {}
                Err(err) => report(out, &err)?,
            },
            9 => break,
            _ => writeln!(out, "Unrecognized choice!")?,
        }
    }
    Ok(())
}

/// The authenticated menu. Gated entries are only listed for roles that may
/// use them; the services re-check the gate regardless.
async fn user_menu<R, W>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &mut Session,
) -> AppResult<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(out, "MAIN MENU")?;
        writeln!(out, "---------")?;
        writeln!(out, "1. View Profile")?;
        writeln!(out, "2. Update Profile")?;
        writeln!(out, "3. View Catalog")?;
        writeln!(out, "4. Place Rental Order")?;
        writeln!(out, "5. View Full Rental Order History")?;
        writeln!(out, "6. View Past 5 Rental Orders")?;
        writeln!(out, "7. View Rental Order Information")?;
        writeln!(out, "8. View Tracking Information")?;
        if session.role.is_staff() {
            writeln!(out, "9. Update Tracking Information")?;
            if session.role == Role::Manager {
                writeln!(out, "10. Update Catalog")?;
                writeln!(out, "11. Update User")?;
            }
        }
        writeln!(out, ".........................")?;
        writeln!(out, "20. Log out")?;

        let choice = match read_choice(input, out)? {
            Some(choice) => choice,
            None => break,
        };
        let result = match choice {
            1 => view_profile(state, out, session).await,
            2 => update_profile(state, input, out, session).await,
            3 => view_catalog(state, input, out).await,
            4 => place_order(state, input, out, session).await,
            5 => view_all_orders(state, out, session).await,
            6 => view_recent_orders(state, out, session).await,
            7 => view_order_info(state, input, out, session).await,
            8 => view_tracking_info(state, input, out, session).await,
            9 => update_tracking_info(state, input, out, session).await,
            10 => update_catalog(state, input, out, session).await,
            11 => update_user(state, input, out, session).await,
            20 => break,
            _ => {
                writeln!(out, "Unrecognized choice!")?;
                Ok(())
            }
        };
        if let Err(err) = result {
            report(out, &err)?;
        }
    }
    Ok(())
}

/// Every action reports its failure here and the menu redraws; nothing a
/// single action does can take the session down.
fn report<W: Write>(out: &mut W, err: &AppError) -> std::io::Result<()> {
    if matches!(
        err,
        AppError::Db(_) | AppError::Orm(_) | AppError::Internal(_) | AppError::Corrupt(_)
    ) {
        tracing::error!(error = ?err, "menu action failed");
    }
    writeln!(out, "{}", err.user_message())
}

async fn create_user<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
) -> AppResult<()> {
    let Some(login) = prompt_line(input, out, "\tEnter login: ")? else {
        return Ok(());
    };
    let Some(password) = prompt_line(input, out, "\tEnter password: ")? else {
        return Ok(());
    };
    let Some(phone_number) = prompt_line(input, out, "\tEnter phone number: ")? else {
        return Ok(());
    };
    let Some(fav_games) = prompt_line(input, out, "\tFavorite games (blank for none): ")? else {
        return Ok(());
    };

    let profile = auth_service::register_user(
        state,
        RegisterRequest {
            login,
            password,
            phone_number,
            fav_games,
        },
    )
    .await?;
    writeln!(out, "User {} created.", profile.login)?;
    Ok(())
}

async fn log_in<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
) -> AppResult<Option<Session>> {
    let Some(login) = prompt_line(input, out, "\tEnter login: ")? else {
        return Ok(None);
    };
    let Some(password) = prompt_line(input, out, "\tEnter password: ")? else {
        return Ok(None);
    };

    let user = auth_service::login_user(state, LoginRequest { login, password }).await?;
    let user = match user {
        Some(user) => user,
        None => {
            writeln!(out, "Invalid login or password.")?;
            return Ok(None);
        }
    };

    let role = role_service::resolve_role(state, &user.login).await?;
    Ok(Some(Session::new(user.login, role)))
}

async fn view_profile<W: Write>(
    state: &AppState,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    let profile = profile_service::view_profile(state, &session.login).await?;
    print_table(out, std::slice::from_ref(&profile))?;
    Ok(())
}

async fn update_profile<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    writeln!(out, "1. Change password")?;
    writeln!(out, "2. Change phone number")?;
    writeln!(out, "3. Change favorite games")?;
    let Some(choice) = read_choice(input, out)? else {
        return Ok(());
    };

    let update = match choice {
        1 => {
            let Some(password) = prompt_line(input, out, "New password: ")? else {
                return Ok(());
            };
            let Some(confirm) = prompt_line(input, out, "Repeat new password: ")? else {
                return Ok(());
            };
            if password != confirm {
                return Err(AppError::Validation("passwords do not match".into()));
            }
            ProfileUpdate::Password(password)
        }
        2 => {
            let Some(phone) = prompt_line(input, out, "New phone number: ")? else {
                return Ok(());
            };
            ProfileUpdate::PhoneNumber(phone)
        }
        3 => {
            let Some(games) = prompt_line(input, out, "New favorite games: ")? else {
                return Ok(());
            };
            ProfileUpdate::FavGames(games)
        }
        _ => {
            writeln!(out, "Unrecognized choice!")?;
            return Ok(());
        }
    };

    profile_service::update_profile(state, session, update).await?;
    writeln!(out, "Profile updated.")?;
    Ok(())
}

async fn view_catalog<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
) -> AppResult<()> {
    writeln!(out, "1. Print whole catalog")?;
    writeln!(out, "2. Search catalog by genre")?;
    writeln!(out, "3. Search catalog under a price")?;
    let Some(choice) = read_choice(input, out)? else {
        return Ok(());
    };

    let query = match choice {
        1 => CatalogQuery::default(),
        2 => {
            let Some(genre) = prompt_line(input, out, "Which genre are you looking for: ")? else {
                return Ok(());
            };
            CatalogQuery {
                genre: Some(genre),
                ..CatalogQuery::default()
            }
        }
        3 => {
            let Some(price) = prompt_line(input, out, "Search games under this price: ")? else {
                return Ok(());
            };
            let under_price = parse_price_cents(&price)
                .ok_or_else(|| AppError::Validation("not a valid price".into()))?;
            let Some(order) = prompt_line(input, out, "1. ascending  2. descending: ")? else {
                return Ok(());
            };
            let sort_order = match order.as_str() {
                "1" => SortOrder::Asc,
                "2" => SortOrder::Desc,
                _ => return Err(AppError::Validation("choose 1 or 2".into())),
            };
            CatalogQuery {
                genre: None,
                under_price: Some(under_price),
                sort_order: Some(sort_order),
            }
        }
        _ => {
            writeln!(out, "Unrecognized choice!")?;
            return Ok(());
        }
    };

    let games = catalog_service::list_games(state, query).await?;
    if print_table(out, &games)? == 0 {
        writeln!(out, "No games found.")?;
    }
    Ok(())
}

async fn place_order<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    let Some(game_id) = prompt_line(input, out, "Game ID: ")? else {
        return Ok(());
    };
    let Some(quantity) = prompt_line(input, out, "How many: ")? else {
        return Ok(());
    };
    let quantity: i32 = quantity
        .parse()
        .map_err(|_| AppError::Validation("quantity must be an integer".into()))?;

    let game = catalog_service::get_game(state, &game_id).await?;
    let total = game
        .price
        .checked_mul(i64::from(quantity.max(0)))
        .ok_or_else(|| AppError::Validation("total price is out of range".into()))?;
    writeln!(out, "Price: {}", format_cents(game.price))?;
    writeln!(out, "Total price is {}", format_cents(total))?;

    let details =
        order_service::place_order(state, session, PlaceOrderRequest { game_id, quantity }).await?;
    print_order_details(out, &details)?;
    writeln!(out, "Order placed.")?;
    Ok(())
}

async fn view_all_orders<W: Write>(
    state: &AppState,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    let orders = order_service::list_orders(state, session).await?;
    if print_table(out, &orders)? == 0 {
        writeln!(out, "No rental history found for {}.", session.login)?;
    }
    Ok(())
}

async fn view_recent_orders<W: Write>(
    state: &AppState,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    let orders = order_service::recent_orders(state, session).await?;
    if print_table(out, &orders)? == 0 {
        writeln!(out, "No recent orders found for {}.", session.login)?;
    }
    Ok(())
}

async fn view_order_info<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    let Some(order_id) = prompt_line(input, out, "Enter rental order ID: ")? else {
        return Ok(());
    };
    let order_id = parse_uuid(&order_id)?;
    let details = order_service::order_details(state, session, order_id).await?;
    print_order_details(out, &details)?;
    Ok(())
}

async fn view_tracking_info<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    let Some(tracking_id) = prompt_line(input, out, "Enter tracking ID: ")? else {
        return Ok(());
    };
    let tracking_id = parse_uuid(&tracking_id)?;
    let tracking = tracking_service::view_tracking(state, session, tracking_id).await?;
    print_table(out, std::slice::from_ref(&tracking))?;
    Ok(())
}

async fn update_tracking_info<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    writeln!(out, "1. Update status")?;
    writeln!(out, "2. Update current location")?;
    writeln!(out, "3. Update courier name")?;
    writeln!(out, "4. Update additional comments")?;
    let Some(choice) = read_choice(input, out)? else {
        return Ok(());
    };
    if !(1..=4).contains(&choice) {
        writeln!(out, "Unrecognized choice!")?;
        return Ok(());
    }

    let Some(tracking_id) = prompt_line(input, out, "Enter tracking ID: ")? else {
        return Ok(());
    };
    let tracking_id = parse_uuid(&tracking_id)?;
    let Some(value) = prompt_line(input, out, "New value: ")? else {
        return Ok(());
    };

    let update = match choice {
        1 => TrackingUpdate::Status(value),
        2 => TrackingUpdate::CurrentLocation(value),
        3 => TrackingUpdate::CourierName(value),
        _ => TrackingUpdate::AdditionalComments(value),
    };
    let tracking = tracking_service::update_tracking(state, session, tracking_id, update).await?;
    print_table(out, std::slice::from_ref(&tracking))?;
    writeln!(out, "Tracking information updated.")?;
    Ok(())
}

async fn update_catalog<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &Session,
) -> AppResult<()> {
    // Deny before walking through the field prompts; the service re-checks.
    ensure_manager(session)?;

    writeln!(out, "1. Add new game")?;
    writeln!(out, "2. Change info of a game")?;
    writeln!(out, "3. Remove game from catalog")?;
    let Some(choice) = read_choice(input, out)? else {
        return Ok(());
    };

    match choice {
        1 => {
            let Some(game_id) = prompt_line(input, out, "Enter game ID: ")? else {
                return Ok(());
            };
            let Some(fields) = read_game_fields(input, out)? else {
                return Ok(());
            };
            let game = catalog_service::add_game(
                state,
                session,
                NewGameRequest {
                    game_id,
                    game_name: fields.game_name,
                    genre: fields.genre,
                    price: fields.price,
                    description: fields.description,
                    image_url: fields.image_url,
                },
            )
            .await?;
            print_table(out, std::slice::from_ref(&game))?;
            writeln!(out, "Game added.")?;
        }
        2 => {
            let Some(game_id) = prompt_line(input, out, "Enter game ID to update: ")? else {
                return Ok(());
            };
            let Some(fields) = read_game_fields(input, out)? else {
                return Ok(());
            };
            let game = catalog_service::update_game(state, session, &game_id, fields).await?;
            print_table(out, std::slice::from_ref(&game))?;
            writeln!(out, "Game updated.")?;
        }
        3 => {
            let Some(game_id) = prompt_line(input, out, "Enter game ID to remove: ")? else {
                return Ok(());
            };
            catalog_service::remove_game(state, session, &game_id).await?;
            writeln!(out, "Game removed.")?;
        }
        _ => writeln!(out, "Unrecognized choice!")?,
    }
    Ok(())
}

fn read_game_fields<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> AppResult<Option<UpdateGameRequest>> {
    let Some(game_name) = prompt_line(input, out, "Enter game name: ")? else {
        return Ok(None);
    };
    let Some(genre) = prompt_line(input, out, "Enter genre: ")? else {
        return Ok(None);
    };
    let Some(price) = prompt_line(input, out, "Enter price: ")? else {
        return Ok(None);
    };
    let price =
        parse_price_cents(&price).ok_or_else(|| AppError::Validation("not a valid price".into()))?;
    let Some(description) = prompt_line(input, out, "Enter description: ")? else {
        return Ok(None);
    };
    let Some(image_url) = prompt_line(input, out, "Enter image URL: ")? else {
        return Ok(None);
    };

    Ok(Some(UpdateGameRequest {
        game_name,
        genre,
        price,
        description,
        image_url,
    }))
}

async fn update_user<R: BufRead, W: Write>(
    state: &AppState,
    input: &mut R,
    out: &mut W,
    session: &mut Session,
) -> AppResult<()> {
    ensure_manager(session)?;

    writeln!(out, "1. Change a user's login")?;
    writeln!(out, "2. Change a user's role")?;
    writeln!(out, "3. Change a user's overdue game count")?;
    writeln!(out, "4. Change a user's password")?;
    writeln!(out, "5. Change a user's favorite games")?;
    writeln!(out, "6. Change a user's phone number")?;
    let Some(choice) = read_choice(input, out)? else {
        return Ok(());
    };
    if !(1..=6).contains(&choice) {
        writeln!(out, "Unrecognized choice!")?;
        return Ok(());
    }

    let Some(target) = prompt_line(input, out, "Which user do you want to change: ")? else {
        return Ok(());
    };

    let update = match choice {
        1 => {
            let Some(new_login) = prompt_line(input, out, "To what login: ")? else {
                return Ok(());
            };
            UserUpdate::Login(new_login)
        }
        2 => {
            let Some(role) =
                prompt_line(input, out, "To what role (customer, employee, manager): ")?
            else {
                return Ok(());
            };
            let role = Role::parse(&role)
                .ok_or_else(|| AppError::Validation("unknown role name".into()))?;
            UserUpdate::Role(role)
        }
        3 => {
            let Some(count) = prompt_line(input, out, "To what number of overdue games: ")? else {
                return Ok(());
            };
            let count: i32 = count
                .parse()
                .map_err(|_| AppError::Validation("overdue count must be an integer".into()))?;
            UserUpdate::OverdueGames(count)
        }
        4 => {
            let Some(password) = prompt_line(input, out, "New password: ")? else {
                return Ok(());
            };
            let Some(confirm) = prompt_line(input, out, "Repeat new password: ")? else {
                return Ok(());
            };
            if password != confirm {
                return Err(AppError::Validation("passwords do not match".into()));
            }
            UserUpdate::Password(password)
        }
        5 => {
            let Some(games) = prompt_line(input, out, "New favorite games: ")? else {
                return Ok(());
            };
            UserUpdate::FavGames(games)
        }
        _ => {
            let Some(phone) = prompt_line(input, out, "New phone number: ")? else {
                return Ok(());
            };
            UserUpdate::PhoneNumber(phone)
        }
    };

    let renamed_to = match &update {
        UserUpdate::Login(new_login) => Some(new_login.clone()),
        _ => None,
    };
    let self_edit = target == session.login;

    admin_service::update_user(state, session, &target, update).await?;
    writeln!(out, "User updated.")?;

    // An edit to the active account takes effect immediately: the session
    // identity follows a rename and the menu gating follows a role change.
    if self_edit {
        if let Some(new_login) = renamed_to {
            session.login = new_login;
        }
        session.role = role_service::resolve_role(state, &session.login).await?;
    }
    Ok(())
}

fn print_order_details<W: Write>(out: &mut W, details: &OrderDetails) -> std::io::Result<()> {
    print_table(out, std::slice::from_ref(&details.order))?;
    print_table(out, std::slice::from_ref(&details.tracking))?;
    print_table(out, &details.lines)?;
    print_table(out, &details.games)?;
    Ok(())
}

fn parse_uuid(text: &str) -> AppResult<Uuid> {
    Uuid::parse_str(text).map_err(|_| AppError::Validation("not a valid id".into()))
}
