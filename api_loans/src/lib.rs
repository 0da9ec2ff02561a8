use actix_web::web;

pub mod policy;

pub mod routes {
    pub mod eligibility;
}

pub mod services {
    pub mod eligibility;
}

pub mod dtos {
    pub mod eligibility;
}

pub use policy::{BusinessType, LoanPolicy};

pub fn mount_loans(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::eligibility::post_calculate_eligibility)
        .service(routes::eligibility::options_calculate_eligibility);
}
