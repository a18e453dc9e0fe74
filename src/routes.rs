use crate::{
    api::{attendance, overtime},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Per-IP rate limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    protected: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
    check_in: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            protected: Arc::new(build_limiter(config.rate_protected_per_min)?),
            check_in: Arc::new(build_limiter(config.rate_check_in_per_min)?),
        })
    }
}

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / requests_per_min as u64;
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("invalid rate limit configuration")?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: Limiters) {
    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(limiters.protected) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance/check-in, /attendance/check-out
                    .service(
                        web::resource("/check-in")
                            .wrap(limiters.check_in.clone())
                            .route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out")
                            .wrap(limiters.check_in)
                            .route(web::post().to(attendance::check_out)),
                    )
                    .service(web::resource("/current").route(web::get().to(attendance::current)))
                    .service(web::resource("/daily").route(web::get().to(attendance::daily)))
                    .service(web::resource("/summary").route(web::get().to(attendance::summary)))
                    .service(
                        web::resource("/adjustments")
                            .route(web::post().to(attendance::add_adjustment)),
                    )
                    // /attendance/{entry_id}
                    .service(
                        web::resource("/{entry_id}")
                            .route(web::patch().to(attendance::correct_entry)),
                    ),
            )
            .service(
                web::scope("/overtime")
                    // /overtime
                    .service(
                        web::resource("")
                            .route(web::get().to(overtime::overtime_list))
                            .route(web::post().to(overtime::create_overtime)),
                    )
                    // /overtime/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(overtime::approve_overtime)),
                    )
                    // /overtime/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(overtime::reject_overtime)),
                    ),
            ),
    );
}
