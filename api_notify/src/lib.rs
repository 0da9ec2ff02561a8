use actix_web::web;

pub mod routes {
    pub mod email;
}

pub mod services {
    pub mod email;
    pub mod email_client;
    pub mod templates;
}

pub mod dtos {
    pub mod email;
}

pub use services::email_client::EmailClient;

pub fn mount_notify(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::email::post_send_notification_email)
        .service(routes::email::options_send_notification_email);
}
