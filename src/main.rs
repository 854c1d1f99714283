mod config;

use api::{Cors, Handler, QuizService};
use db::{Database, NoTls};
use hyper::{body::Incoming, server::conn::http1, service::service_fn, Request};
use hyper_util::{rt::TokioIo, server::graceful::GracefulShutdown};
use std::{
    convert::Infallible,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::{net::TcpListener, runtime::Runtime};

/// Grace period for in-flight requests after a shutdown signal.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = config::Config::from_env()?;

    let runtime = Runtime::new()?;
    runtime.block_on(run(config))
}

async fn run(config: config::Config) -> anyhow::Result<()> {
    // Initialize the database connection
    let pg: db::Config = config.database_url.parse()?;
    let (client, conn) = pg.connect(NoTls).await?;
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            log::error!("database connection closed: {err}");
        }
    });

    let db = Database::from(client);
    db.init_schema().await.map_err(|err| anyhow::anyhow!("cannot initialize schema: {err}"))?;
    log::info!("connected to the database");

    let cors = Cors::parse(&config.allowed_origins);
    let handler = Handler::new(QuizService::from(db), cors).with_body_limit(config.body_limit);
    let handler = Arc::new(handler);

    let addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, config.port).into();
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on {addr}");

    let graceful = GracefulShutdown::new();
    let mut shutdown = core::pin::pin!(tokio::signal::ctrl_c());
    loop {
        let (stream, peer) = tokio::select! {
            res = listener.accept() => match res {
                Ok(accepted) => accepted,
                Err(err) => {
                    log::warn!("failed to accept connection: {err}");
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };

        let handler = Arc::clone(&handler);
        let service = service_fn(move |req: Request<Incoming>| {
            let handler = Arc::clone(&handler);
            async move { Ok::<_, Infallible>(handler.respond(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        let conn = graceful.watch(conn);
        tokio::spawn(async move {
            if let Err(err) = conn.await {
                log::debug!("connection from {peer} ended with error: {err}");
            }
        });
    }

    log::info!("shutting down");
    tokio::select! {
        _ = graceful.shutdown() => log::info!("all connections closed"),
        _ = tokio::time::sleep(SHUTDOWN_TIMEOUT) => log::warn!("timed out waiting for connections to close"),
    }
    Ok(())
}
