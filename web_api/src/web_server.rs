//! web_server.rs

use std::fs;
use std::io::{self, BufReader};
use std::sync::Arc;

use actix_web::http::{Method, StatusCode};
use actix_web::middleware::{DefaultHeaders, ErrorHandlers, Logger};
use actix_web::{web, App, HttpServer};
use common_lib::clock::{Clock, SystemClock};

use crate::api::{internal_error_envelope, ApiError};
use crate::configuration::{get_yaml_configuration, Settings, TlsSettings};
use crate::market_status::get_market_status;
use crate::utils::*;

pub struct WebServer {}
impl WebServer {
    pub async fn run() -> io::Result<()> {
        let settings = get_yaml_configuration().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        tracing::debug!("[run] settings: {:?}", &settings);

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        WebServer::web_server(settings, clock).await
    }

    async fn web_server(settings: Settings, clock: Arc<dyn Clock>) -> io::Result<()> {
        let address = settings.address();
        let workers = settings.workers.max(1);
        let tls = settings.tls.clone();

        // state
        let clock_data = web::Data::from(clock);
        let settings_data = web::Data::new(settings);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(clock_data.clone())
                .app_data(settings_data.clone())
                .wrap(error_envelopes())
                .wrap(cors_headers())
                .wrap(Logger::default())
                .configure(mount)
        })
        .workers(workers);

        let server = match tls {
            Some(tls) => {
                tracing::info!("[web_server] starting HTTPS server at https://{}:{}", &address.0, &address.1);
                server.bind_rustls(address, load_rustls_config(&tls)?)?
            }
            None => {
                tracing::info!("[web_server] starting HTTP server at http://{}:{}", &address.0, &address.1);
                server.bind(address)?
            }
        };

        server.run().await
    }
}

/// headers the browser client needs on every response
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// 500s leave as `{ success: false, error }` without the underlying detail
pub fn error_envelopes<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, internal_error_envelope)
}

/// every route, served both at the root and under /api
pub fn mount(cfg: &mut web::ServiceConfig) {
    routes(cfg);
    cfg.service(web::scope("/api").configure(routes))
        .default_service(web::to(not_found));
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| ApiError::InvalidArgument(err.to_string()).into()))
        .service(
            web::resource("/ping")
                .route(web::get().to(get_ping))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/health")
                .route(web::get().to(get_health))
                .route(web::method(Method::OPTIONS).to(preflight))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/market/status")
                .route(web::get().to(get_market_status))
                .route(web::method(Method::OPTIONS).to(preflight))
                .default_service(web::to(method_not_allowed)),
        );
}

fn load_rustls_config(tls: &TlsSettings) -> io::Result<rustls::ServerConfig> {
    let certs = load_certs(&tls.cert_path)?;
    let privkey = load_private_key(&tls.key_path)?;

    rustls::ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(certs, privkey)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("bad certificates/private key: {}", e)))
}

fn load_private_key(filename: &str) -> io::Result<rustls::PrivateKey> {
    let keyfile = fs::File::open(filename)?;
    let mut reader = BufReader::new(keyfile);

    while let Some(item) = rustls_pemfile::read_one(&mut reader)? {
        match item {
            rustls_pemfile::Item::RSAKey(key) => return Ok(rustls::PrivateKey(key)),
            rustls_pemfile::Item::PKCS8Key(key) => return Ok(rustls::PrivateKey(key)),
            rustls_pemfile::Item::ECKey(key) => return Ok(rustls::PrivateKey(key)),
            _ => {}
        }
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("no keys found in {:?} (encrypted keys not supported)", filename),
    ))
}

fn load_certs(filename: &str) -> io::Result<Vec<rustls::Certificate>> {
    let certfile = fs::File::open(filename)?;
    let mut reader = BufReader::new(certfile);
    let certs: Vec<rustls::Certificate> = rustls_pemfile::certs(&mut reader)?
        .into_iter()
        .map(rustls::Certificate)
        .collect();
    if certs.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, format!("no certificates found in {:?}", filename)));
    }
    Ok(certs)
}
