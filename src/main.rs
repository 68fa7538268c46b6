use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, middleware, post, put, App, HttpResponse, HttpServer, Responder};
use kube::client::Client;
use prometheus::{Encoder, TextEncoder};
use tokio::sync::mpsc;

use cluster_registrar::manifest::ClusterFields;
use cluster_registrar::registrar::{self, RegistrarSignal};
use cluster_registrar::settings::Settings;
use cluster_registrar::state::State;
use cluster_registrar::telemetry;

#[get("/metrics")]
async fn metrics(c: Data<State>) -> impl Responder {
    let metrics = c.metrics();
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    encoder.encode(&metrics, &mut buffer).unwrap();
    HttpResponse::Ok().body(buffer)
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json("healthy")
}

#[get("/")]
async fn index(c: Data<State>) -> impl Responder {
    let d = c.diagnostics().await;
    HttpResponse::Ok().json(&d)
}

#[get("/clusters/status")]
async fn add_edit_status(c: Data<State>) -> impl Responder {
    HttpResponse::Ok().json(c.add_edit_status().await)
}

#[post("/clusters")]
async fn add_cluster(c: Data<State>, fields: Json<ClusterFields>) -> impl Responder {
    submit(&c, RegistrarSignal::AddClusterRequested(fields.into_inner()))
}

#[put("/clusters/{name}")]
async fn update_cluster(
    c: Data<State>,
    name: Path<String>,
    fields: Json<ClusterFields>,
) -> impl Responder {
    let mut fields = fields.into_inner();
    fields.name = name.into_inner();
    submit(&c, RegistrarSignal::UpdateClusterRequested(fields))
}

#[post("/clusters/{name}/watch")]
async fn watch_cluster(c: Data<State>, name: Path<String>) -> impl Responder {
    submit(
        &c,
        RegistrarSignal::WatchClusterAddEditStatusRequested {
            cluster_name: name.into_inner(),
        },
    )
}

#[delete("/clusters/watch")]
async fn cancel_watch(c: Data<State>) -> impl Responder {
    submit(&c, RegistrarSignal::CancelWatchClusterAddEditStatusRequested)
}

fn submit(state: &State, signal: RegistrarSignal) -> HttpResponse {
    match state.submit(signal) {
        Ok(()) => HttpResponse::Accepted().finish(),
        Err(_) => HttpResponse::ServiceUnavailable().finish(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init().await;

    let settings = Settings::from_env();
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let state = State::new(signal_tx);

    let client = Client::try_default().await?;
    let dispatcher = registrar::run(state.to_context(client), settings, signal_rx, event_tx);
    let store = state.apply_events(event_rx);

    // Start web server
    let app_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(app_state.clone()))
            .wrap(middleware::Logger::default().exclude("/health"))
            .service(index)
            .service(health)
            .service(metrics)
            .service(add_edit_status)
            .service(add_cluster)
            .service(update_cluster)
            .service(watch_cluster)
            .service(cancel_watch)
    })
    .bind("0.0.0.0:8443")?
    .shutdown_timeout(5)
    .run();

    tokio::join!(dispatcher, store, server).2?;
    Ok(())
}
