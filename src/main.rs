use std::io::{self, Write};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_rental_cli::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    menu,
    state::AppState,
};

// One interactive session per process; a current-thread runtime is all the
// single blocking stdin loop needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,game_rental_cli=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = AppConfig::from_args(std::env::args().skip(1))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    write!(out, "Connecting to database...")?;
    out.flush()?;
    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    writeln!(out, "Done")?;

    let state = AppState { pool, orm };

    menu::greeting(&mut out)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    menu::run(&state, &mut input, &mut out).await?;

    write!(out, "Disconnecting from database...")?;
    state.orm.close().await?;
    state.pool.close().await;
    writeln!(out, "Done\n\nBye!")?;
    Ok(())
}
