use chrono::Duration;
use game_rental_cli::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        catalog::{CatalogQuery, NewGameRequest},
        orders::PlaceOrderRequest,
        tracking::TrackingUpdate,
        users::UserUpdate,
    },
    error::AppError,
    menu,
    models::Role,
    services::{
        admin_service, auth_service, catalog_service, order_service, role_service,
        tracking_service,
    },
    session::Session,
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};

// Full session flow: registration, login, role resolution, order placement,
// role gating, and manager user administration, all against a real Postgres.
#[tokio::test]
async fn register_order_and_admin_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let manager = seed_manager(&state).await?;

    // Registration creates the user row plus the customer membership row.
    let profile = auth_service::register_user(
        &state,
        RegisterRequest {
            login: "alice".into(),
            password: "pw1".into(),
            phone_number: "555-1111".into(),
            fav_games: "chess".into(),
        },
    )
    .await?;
    assert_eq!(profile.role, "customer");
    assert_eq!(profile.num_overdue_games, 0);

    // A taken login is a distinct conflict, not a silent failure.
    let dup = auth_service::register_user(
        &state,
        RegisterRequest {
            login: "alice".into(),
            password: "other".into(),
            phone_number: String::new(),
            fav_games: String::new(),
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    // Login round-trips; wrong password and unknown login are None, never Err.
    let user = auth_service::login_user(
        &state,
        LoginRequest {
            login: "alice".into(),
            password: "pw1".into(),
        },
    )
    .await?
    .expect("fresh registration must log in");
    assert_eq!(user.login, "alice");

    let wrong = auth_service::login_user(
        &state,
        LoginRequest {
            login: "alice".into(),
            password: "nope".into(),
        },
    )
    .await?;
    assert!(wrong.is_none());
    let unknown = auth_service::login_user(
        &state,
        LoginRequest {
            login: "ghost".into(),
            password: "pw1".into(),
        },
    )
    .await?;
    assert!(unknown.is_none());

    assert_eq!(role_service::resolve_role(&state, "alice").await?, Role::Customer);
    let alice = Session::new("alice", Role::Customer);

    // Manager stocks the catalog.
    let game = catalog_service::add_game(
        &state,
        &manager,
        NewGameRequest {
            game_id: "G1".into(),
            game_name: "Chess Master".into(),
            genre: "strategy".into(),
            price: 999,
            description: "classic".into(),
            image_url: String::new(),
        },
    )
    .await?;
    assert_eq!(game.price, 999);

    // A customer may not touch the catalog, and a denied call changes nothing.
    let denied = catalog_service::add_game(
        &state,
        &alice,
        NewGameRequest {
            game_id: "G2".into(),
            game_name: "Smuggled".into(),
            genre: "none".into(),
            price: 1,
            description: String::new(),
            image_url: String::new(),
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::PermissionDenied)));
    assert!(matches!(
        catalog_service::get_game(&state, "G2").await,
        Err(AppError::NotFound)
    ));

    // Order placement: one order, one tracking row, one line, consistent math.
    let details = order_service::place_order(
        &state,
        &alice,
        PlaceOrderRequest {
            game_id: "G1".into(),
            quantity: 2,
        },
    )
    .await?;
    assert_eq!(details.order.total_price, 1998);
    assert_eq!(details.order.no_of_games, 2);
    assert_eq!(details.tracking.status, "ordered");
    assert_eq!(details.tracking.current_location, "shop");
    assert_eq!(details.lines.len(), 1);
    assert_eq!(details.lines[0].units_ordered, 2);
    assert_eq!(
        details.order.due_date - details.order.order_timestamp,
        Duration::days(14)
    );

    // Bad quantities and unknown games fail before anything is written.
    assert!(matches!(
        order_service::place_order(
            &state,
            &alice,
            PlaceOrderRequest {
                game_id: "G1".into(),
                quantity: 0,
            },
        )
        .await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        order_service::place_order(
            &state,
            &alice,
            PlaceOrderRequest {
                game_id: "NOPE".into(),
                quantity: 1,
            },
        )
        .await,
        Err(AppError::NotFound)
    ));

    // History is session-owned and newest first.
    let history = order_service::list_orders(&state, &alice).await?;
    assert_eq!(history.len(), 1);
    let fetched = order_service::order_details(&state, &alice, details.order.id).await?;
    assert_eq!(fetched.games[0].game_id, "G1");

    // Another user's order id reads as not found.
    let stranger = Session::new("stranger", Role::Customer);
    assert!(matches!(
        order_service::order_details(&state, &stranger, details.order.id).await,
        Err(AppError::NotFound)
    ));

    // Tracking: the owner can view; a customer cannot update; staff can.
    let tracking =
        tracking_service::view_tracking(&state, &alice, details.tracking.id).await?;
    assert_eq!(tracking.rental_order_id, details.order.id);

    assert!(matches!(
        tracking_service::update_tracking(
            &state,
            &alice,
            details.tracking.id,
            TrackingUpdate::Status("stolen".into()),
        )
        .await,
        Err(AppError::PermissionDenied)
    ));
    let unchanged = tracking_service::view_tracking(&state, &alice, details.tracking.id).await?;
    assert_eq!(unchanged.status, "ordered");

    let updated = tracking_service::update_tracking(
        &state,
        &manager,
        details.tracking.id,
        TrackingUpdate::Status("shipped".into()),
    )
    .await?;
    assert_eq!(updated.status, "shipped");
    assert!(updated.last_update_date >= tracking.last_update_date);

    // Manager moves bob from customer to employee: the membership row flips
    // with the role column.
    auth_service::register_user(
        &state,
        RegisterRequest {
            login: "bob".into(),
            password: "pw2".into(),
            phone_number: String::new(),
            fav_games: String::new(),
        },
    )
    .await?;
    assert_eq!(role_service::resolve_role(&state, "bob").await?, Role::Customer);

    admin_service::update_user(&state, &manager, "bob", UserUpdate::Role(Role::Employee)).await?;
    assert_eq!(role_service::resolve_role(&state, "bob").await?, Role::Employee);
    assert_eq!(membership_count(&state, "customers", "bob").await?, 0);
    assert_eq!(membership_count(&state, "workers", "bob").await?, 1);

    // A customer may not administer users.
    assert!(matches!(
        admin_service::update_user(&state, &alice, "bob", UserUpdate::OverdueGames(3)).await,
        Err(AppError::PermissionDenied)
    ));

    // Login rename cascades: membership and order history follow the new name.
    admin_service::update_user(&state, &manager, "alice", UserUpdate::Login("alicia".into()))
        .await?;
    assert!(matches!(
        role_service::resolve_role(&state, "alice").await,
        Err(AppError::NotFound)
    ));
    assert_eq!(role_service::resolve_role(&state, "alicia").await?, Role::Customer);
    let alicia = Session::new("alicia", Role::Customer);
    let history = order_service::list_orders(&state, &alicia).await?;
    assert_eq!(history.len(), 1);

    // Catalog browse filters.
    let strategy = catalog_service::list_games(
        &state,
        CatalogQuery {
            genre: Some("strategy".into()),
            ..CatalogQuery::default()
        },
    )
    .await?;
    assert!(strategy.iter().any(|g| g.game_id == "G1"));
    let cheap = catalog_service::list_games(
        &state,
        CatalogQuery {
            under_price: Some(500),
            ..CatalogQuery::default()
        },
    )
    .await?;
    assert!(cheap.is_empty());

    // Membership corruption is reported, not guessed around: a user row with
    // no membership row, then one listed in both tables.
    sqlx::query(
        r#"
        INSERT INTO users (login, password_hash, phone_number, role, fav_games, num_overdue_games)
        VALUES ('limbo', 'x', '', 'customer', '', 0)
        "#,
    )
    .execute(&state.pool)
    .await?;
    assert!(matches!(
        role_service::resolve_role(&state, "limbo").await,
        Err(AppError::Corrupt(_))
    ));
    sqlx::query("INSERT INTO customers (login) VALUES ('limbo')")
        .execute(&state.pool)
        .await?;
    sqlx::query("INSERT INTO workers (login) VALUES ('limbo')")
        .execute(&state.pool)
        .await?;
    assert!(matches!(
        role_service::resolve_role(&state, "limbo").await,
        Err(AppError::Corrupt(_))
    ));

    // A zero-priced game is listable but not rentable.
    catalog_service::add_game(
        &state,
        &manager,
        NewGameRequest {
            game_id: "FREE".into(),
            game_name: "Freebie".into(),
            genre: "demo".into(),
            price: 0,
            description: String::new(),
            image_url: String::new(),
        },
    )
    .await?;
    assert!(matches!(
        order_service::place_order(
            &state,
            &alicia,
            PlaceOrderRequest {
                game_id: "FREE".into(),
                quantity: 1,
            },
        )
        .await,
        Err(AppError::Validation(_))
    ));

    // A total that would overflow is rejected instead of wrapping.
    catalog_service::add_game(
        &state,
        &manager,
        NewGameRequest {
            game_id: "BIG".into(),
            game_name: "Priceless".into(),
            genre: "demo".into(),
            price: i64::MAX,
            description: String::new(),
            image_url: String::new(),
        },
    )
    .await?;
    assert!(matches!(
        order_service::place_order(
            &state,
            &alicia,
            PlaceOrderRequest {
                game_id: "BIG".into(),
                quantity: 2,
            },
        )
        .await,
        Err(AppError::Validation(_))
    ));

    // An employee picking a manager-only menu entry is denied at dispatch,
    // before any field prompt appears.
    let script = "2\nbob\npw2\n10\n20\n9\n";
    let mut input = script.as_bytes();
    let mut out = Vec::new();
    menu::run(&state, &mut input, &mut out).await?;
    let rendered = String::from_utf8(out)?;
    assert!(rendered.contains("You do not have permission for that."));
    assert!(!rendered.contains("Enter game ID"));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE games_in_order, tracking_info, rental_orders, customers, workers, audit_logs, catalog, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn seed_manager(state: &AppState) -> anyhow::Result<Session> {
    let hash = auth_service::hash_password("boss123").map_err(|e| anyhow::anyhow!(e.to_string()))?;
    sqlx::query(
        r#"
        INSERT INTO users (login, password_hash, phone_number, role, fav_games, num_overdue_games)
        VALUES ('boss', $1, '', 'manager', '', 0)
        "#,
    )
    .bind(hash)
    .execute(&state.pool)
    .await?;
    sqlx::query("INSERT INTO workers (login) VALUES ('boss')")
        .execute(&state.pool)
        .await?;

    Ok(Session::new("boss", Role::Manager))
}

async fn membership_count(state: &AppState, table: &str, login: &str) -> anyhow::Result<i64> {
    let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE login = $1"))
        .bind(login)
        .fetch_one(&state.pool)
        .await?;
    Ok(count.0)
}
