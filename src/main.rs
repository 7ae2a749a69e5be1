use std::{process, sync::Arc};

use blogsite::{
    application::{
        clock::{Clock, SystemClock},
        comments::CommentService,
        dashboard::HomeDashboardService,
        error::AppError,
        read_stats::{ReadStatsService, StatsConfig},
    },
    cache::{CacheConfig, CacheStore, CachedDataProvider, DisabledCacheStore, MemoryCacheStore},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Dashboard(args) => run_dashboard(settings, args).await,
    }
}

struct ApplicationContext {
    repositories: Arc<PostgresRepositories>,
    dashboard: Arc<HomeDashboardService>,
    comments: Arc<CommentService>,
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> ApplicationContext {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache_config = CacheConfig::from(&settings.cache);

    let store: Arc<dyn CacheStore> = if cache_config.enabled {
        Arc::new(MemoryCacheStore::new(&cache_config, clock.clone()))
    } else {
        info!(
            target = "blogsite::bootstrap",
            "dataset cache disabled; every dashboard request recomputes"
        );
        Arc::new(DisabledCacheStore)
    };

    let stats = ReadStatsService::new(
        repositories.clone(),
        repositories.clone(),
        clock,
        StatsConfig::from(&settings.stats),
    );
    let provider = CachedDataProvider::from_config(store, &cache_config);
    let dashboard = Arc::new(HomeDashboardService::new(stats, provider));
    let comments = Arc::new(CommentService::new(
        repositories.clone(),
        repositories.clone(),
    ));

    ApplicationContext {
        repositories,
        dashboard,
        comments,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings);

    let state = HttpState {
        dashboard: app.dashboard,
        comments: app.comments,
        db: app.repositories,
        home_model: settings.stats.blog_model.clone(),
    };

    serve_http(&settings, state).await
}

async fn run_dashboard(
    settings: config::Settings,
    args: config::DashboardArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings);
    let model = args
        .model
        .unwrap_or_else(|| settings.stats.blog_model.clone());

    let dashboard = app.dashboard.assemble(&model).await?;
    let rendered = serde_json::to_string_pretty(&dashboard)
        .map_err(|err| AppError::unexpected(format!("failed to encode dashboard: {err}")))?;
    println!("{rendered}");

    Ok(())
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "blogsite::bootstrap",
        addr = %settings.server.addr,
        "http listener bound"
    );

    let shutdown = Arc::new(Notify::new());
    let server_shutdown = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move { server_shutdown.notified().await })
            .await
    });

    let result = tokio::select! {
        joined = &mut server => joined,
        _ = shutdown_signal() => {
            info!(target = "blogsite::bootstrap", "shutdown signal received; draining connections");
            shutdown.notify_one();
            match tokio::time::timeout(settings.server.graceful_shutdown, &mut server).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(
                        target = "blogsite::bootstrap",
                        timeout_secs = settings.server.graceful_shutdown.as_secs(),
                        "graceful shutdown timed out; aborting open connections"
                    );
                    server.abort();
                    return Ok(());
                }
            }
        }
    };

    result
        .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = "blogsite::bootstrap",
            error = %err,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
}
