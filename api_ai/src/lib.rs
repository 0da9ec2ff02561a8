use actix_web::web;

pub mod routes {
    pub mod chat;
}

pub mod services {
    pub mod chat;
    pub mod gateway_client;
}

pub mod dtos {
    pub mod chat;
}

pub use services::gateway_client::GatewayClient;

pub fn mount_ai(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::chat::post_ai_chat)
        .service(routes::chat::options_ai_chat);
}
