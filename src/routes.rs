use crate::{
    api::{account, dashboard, employee, leave_request},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter config
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/employee-login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::employee_login)),
            )
            .service(web::resource("/logout").route(web::post().to(handlers::logout))),
    );

    // Session-gated routes; the role checks live in the handlers.
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/accounts")
                    .service(web::resource("").route(web::get().to(account::list_accounts)))
                    // /accounts/{id}: POST provisions or reactivates, DELETE deactivates
                    .service(
                        web::resource("/{id}")
                            .route(web::post().to(account::provision_account))
                            .route(web::delete().to(account::remove_account)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::add_leave)),
                    )
                    // /leaves/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(leave_request::get_leave)),
                    )
                    // /leaves/{id}/decision
                    .service(
                        web::resource("/{id}/decision")
                            .route(web::put().to(leave_request::decide_leave)),
                    ),
            )
            .service(web::resource("/dashboard").route(web::get().to(dashboard::admin_dashboard)))
            .service(
                web::scope("/me")
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::my_profile))
                            .route(web::put().to(employee::update_my_phone)),
                    )
                    .service(
                        web::resource("/password").route(web::put().to(account::change_password)),
                    )
                    .service(
                        web::resource("/leaves")
                            .route(web::get().to(leave_request::list_my_leaves))
                            .route(web::post().to(leave_request::submit_leave)),
                    )
                    .service(
                        web::resource("/dashboard")
                            .route(web::get().to(dashboard::employee_dashboard)),
                    ),
            ),
    );
}
