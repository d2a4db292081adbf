use actix_web::web;

use crate::handlers::{contact, content, home::home, system};

mod json_error;

pub use json_error::JsonError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .service(content::list_projects)
            .service(content::list_skills)
            .service(contact::submit_contact)
            .service(system::health_check)
    );

    cfg.configure(json_error::config_routes);
}
