use game_rental_cli::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    models::Role,
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    ensure_user(&pool, "manager", "manager123", Role::Manager).await?;
    ensure_user(&pool, "clerk", "clerk123", Role::Employee).await?;
    ensure_user(&pool, "alice", "alice123", Role::Customer).await?;
    seed_catalog(&pool).await?;

    println!("Seed completed.");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    login: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<()> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO users (login, password_hash, phone_number, role, fav_games, num_overdue_games)
        VALUES ($1, $2, '', $3, '', 0)
        ON CONFLICT (login) DO UPDATE SET role = EXCLUDED.role
        "#,
    )
    .bind(login)
    .bind(password_hash)
    .bind(role.as_str())
    .execute(pool)
    .await?;

    // Keep the membership table in step with the role column.
    sqlx::query("DELETE FROM customers WHERE login = $1")
        .bind(login)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM workers WHERE login = $1")
        .bind(login)
        .execute(pool)
        .await?;
    let membership = if role == Role::Customer {
        "INSERT INTO customers (login) VALUES ($1)"
    } else {
        "INSERT INTO workers (login) VALUES ($1)"
    };
    sqlx::query(membership).bind(login).execute(pool).await?;

    println!("Ensured user {login} (role={role})");
    Ok(())
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let games = vec![
        ("G1", "Chess Master", "strategy", 999, "Classic chess with a modern engine"),
        ("G2", "Dungeon Sprint", "roguelike", 2499, "Procedural dungeons, permadeath"),
        ("G3", "Kart Frenzy", "racing", 1950, "Split-screen kart racing"),
        ("G4", "Farm Days", "simulation", 1499, "Slow-paced farming sim"),
    ];

    for (game_id, name, genre, price, desc) in games {
        sqlx::query(
            r#"
            INSERT INTO catalog (game_id, game_name, genre, price, description, image_url)
            VALUES ($1, $2, $3, $4, $5, '')
            ON CONFLICT (game_id) DO NOTHING
            "#,
        )
        .bind(game_id)
        .bind(name)
        .bind(genre)
        .bind(price as i64)
        .bind(desc)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
