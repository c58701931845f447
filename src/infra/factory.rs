use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::{AppState, Repositories};
use crate::infra::repositories::{
    postgres_tenant_repo::PostgresTenantRepo, postgres_user_repo::PostgresUserRepo,
    postgres_invite_code_repo::PostgresInviteCodeRepo,
    postgres_opportunity_repo::PostgresOpportunityRepo, postgres_goal_repo::PostgresGoalRepo,
    postgres_comment_repo::PostgresCommentRepo,
    sqlite_tenant_repo::SqliteTenantRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_invite_code_repo::SqliteInviteCodeRepo,
    sqlite_opportunity_repo::SqliteOpportunityRepo, sqlite_goal_repo::SqliteGoalRepo,
    sqlite_comment_repo::SqliteCommentRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_repositories(pool)
    };

    AppState::new(config.clone(), repos).expect("Failed to build application state")
}

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        invite_repo: Arc::new(SqliteInviteCodeRepo::new(pool.clone())),
        opportunity_repo: Arc::new(SqliteOpportunityRepo::new(pool.clone())),
        goal_repo: Arc::new(SqliteGoalRepo::new(pool.clone())),
        comment_repo: Arc::new(SqliteCommentRepo::new(pool)),
    }
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        tenant_repo: Arc::new(PostgresTenantRepo::new(pool.clone())),
        user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
        invite_repo: Arc::new(PostgresInviteCodeRepo::new(pool.clone())),
        opportunity_repo: Arc::new(PostgresOpportunityRepo::new(pool.clone())),
        goal_repo: Arc::new(PostgresGoalRepo::new(pool.clone())),
        comment_repo: Arc::new(PostgresCommentRepo::new(pool)),
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
