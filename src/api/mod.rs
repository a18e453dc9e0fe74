pub mod attendance;
pub mod overtime;

#[cfg(test)]
pub mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::body::MessageBody;
    use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
    use actix_web::{App, Error, test::TestRequest, web::Data};
    use chrono::NaiveDate;

    use crate::auth::jwt::testing::{SECRET, token_for};
    use crate::config::Config;
    use crate::routes::{self, Limiters};
    use crate::state::AppState;
    use crate::store::memory::MemoryStore;
    use crate::timekeeping::clock::FixedClock;

    pub fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    pub fn bearer(user_id: u64, role: u8, employee_id: Option<u64>) -> String {
        format!("Bearer {}", token_for(user_id, role, employee_id))
    }

    /// Full route table over an in-memory store and a settable clock.
    pub struct TestApp {
        pub clock: Arc<FixedClock>,
        state: AppState,
        config: Config,
    }

    impl TestApp {
        pub fn new(date: NaiveDate, hour: u32, minute: u32) -> Self {
            let store = Arc::new(MemoryStore::new());
            let clock = Arc::new(FixedClock::at(date, hour, minute));
            let state = AppState::new(store, clock.clone(), Duration::from_secs(60));
            Self {
                clock,
                state,
                config: Config::for_tests(SECRET),
            }
        }

        /// The returned app owns clones of the state, so it does not borrow
        /// `self`.
        pub fn build(
            &self,
        ) -> App<
            impl ServiceFactory<
                ServiceRequest,
                Config = (),
                Response = ServiceResponse<impl MessageBody + use<>>,
                Error = Error,
                InitError = (),
            > + use<>,
        > {
            let config = self.config.clone();
            let limiters = Limiters::from_config(&config).unwrap();
            App::new()
                .app_data(Data::new(self.state.clone()))
                .app_data(Data::new(config.clone()))
                .configure(move |cfg| routes::configure(cfg, &config, limiters))
        }

        /// Governor keys on the peer address, so every request needs one.
        pub fn request(&self, req: TestRequest, token: &str) -> TestRequest {
            req.peer_addr("127.0.0.1:12345".parse().unwrap())
                .insert_header(("Authorization", token))
        }
    }
}
