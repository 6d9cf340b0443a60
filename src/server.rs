use std::time::Duration;

use chrono::Utc;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::rapidoc::{make_rapidoc, GeneralConfig, HideShowConfig, RapiDocConfig};
use rocket_okapi::settings::UrlObject;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

use crate::config::AppConfig;
use crate::repositories::Repositories;
use crate::routes::{admin_route, flight_route, ticket_route, user_route};
use crate::services::admin_service::AdminService;
use crate::services::flight_service::FlightService;
use crate::services::ticket_service::TicketService;
use crate::services::user_service::UserService;
use crate::utils::jwt::JwtKeys;

/// Every service the routes need, built over one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub flights: FlightService,
    pub tickets: TicketService,
    pub admin: AdminService,
    pub keys: JwtKeys,
}

impl Services {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        let keys = JwtKeys::new(config.jwt_secret.clone(), config.token_ttl_hours);
        let users = UserService::new(repos.clone(), keys.clone(), config.bcrypt_cost);
        Services {
            flights: FlightService::new(repos.clone()),
            tickets: TicketService::new(repos.clone(), config),
            admin: AdminService::new(repos, users.clone()),
            users,
            keys,
        }
    }
}

fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/openapi.json".to_string(),
        deep_linking: true,
        ..Default::default()
    }
}

fn rapidoc() -> RapiDocConfig {
    RapiDocConfig {
        general: GeneralConfig {
            spec_urls: vec![UrlObject::new("Booking API", "../api/openapi.json")],
            ..Default::default()
        },
        hide_show: HideShowConfig {
            allow_spec_url_load: false,
            allow_spec_file_load: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn build_rocket(services: Services, sweep_interval_secs: u64) -> Rocket<Build> {
    let rocket = rocket::build()
        .manage(services.keys)
        .manage(services.users)
        .manage(services.flights)
        .manage(services.tickets)
        .manage(services.admin)
        .mount(
            "/api",
            openapi_get_routes![
                user_route::register,
                user_route::login,
                user_route::account,
                user_route::update_account,
                flight_route::list_flights,
                flight_route::search_flights,
                flight_route::get_flight,
                flight_route::airline_flights,
                flight_route::add_airline_flight,
                flight_route::update_airline_flight,
                flight_route::cancel_airline_flight,
                flight_route::complete_airline_flight,
                ticket_route::purchase,
                ticket_route::confirm_payment,
                ticket_route::list_tickets,
                ticket_route::get_ticket,
                ticket_route::edit_ticket,
                ticket_route::cancel_ticket,
                ticket_route::check_in,
                admin_route::overview,
                admin_route::add_flight,
                admin_route::update_flight,
                admin_route::cancel_flight,
                admin_route::delete_flight,
                admin_route::update_airline,
                admin_route::update_airport,
                admin_route::update_customer,
                admin_route::add_ticket,
                admin_route::update_ticket,
                admin_route::delete_ticket,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .mount("/rapidoc", make_rapidoc(&rapidoc()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }));

    // 0 turns the sweep off
    if sweep_interval_secs == 0 {
        return rocket;
    }
    rocket.attach(pending_ticket_sweep(Duration::from_secs(sweep_interval_secs)))
}

// Periodically cancels PENDING tickets nobody paid for
fn pending_ticket_sweep(period: Duration) -> AdHoc {
    AdHoc::on_liftoff("Pending ticket sweep", move |rocket| {
        Box::pin(async move {
            let tickets = match rocket.state::<TicketService>() {
                Some(tickets) => tickets.clone(),
                None => return,
            };
            let shutdown = rocket.shutdown();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if let Err(e) = tickets.expire_pending(Utc::now()).await {
                                tracing::warn!(error = %e, "pending ticket sweep failed");
                            }
                        }
                        _ = shutdown.clone() => break,
                    }
                }
                tracing::debug!("pending ticket sweep stopped");
            });
        })
    })
}
