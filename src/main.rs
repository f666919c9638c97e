use jsonrpc_dispatch::{
    build_app, config::Config, domain, jsonrpc::MethodRegistry, logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let mut builder = MethodRegistry::builder();
    domain::greeting::register(&mut builder)?;
    let registry = builder.build();
    info!(methods = ?registry.names(), "json-rpc methods registered");

    let bind_socket = config.bind_socket()?;
    let state = AppState::new(
        registry,
        config.dispatch_options(),
        config.content_type.clone(),
    );
    let app = build_app(state, &config.rpc_path);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        rpc_path = %config.rpc_path,
        debug = config.debug,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
