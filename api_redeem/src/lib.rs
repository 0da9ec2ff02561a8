use actix_web::web;

pub mod routes {
    pub mod redemption;
}

pub mod services {
    pub mod redemption;
}

pub mod dtos {
    pub mod redemption;
}

pub fn mount_redeem(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::redemption::post_redeem_credits)
        .service(routes::redemption::options_redeem_credits);
}
