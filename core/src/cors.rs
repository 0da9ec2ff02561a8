use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};

/// `*` allows any origin, anything else is taken as the single allowed origin.
pub fn middleware(origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
        .max_age(3600);

    if origin == "*" {
        cors.allow_any_origin().send_wildcard()
    } else {
        cors.allowed_origin(origin)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, http::header, test, web};

    #[actix_web::test]
    async fn any_origin_gets_a_preflight_answer() {
        let app = test::init_service(
            App::new()
                .wrap(super::middleware("*"))
                .route("/ai-chat", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/ai-chat")
            .insert_header((header::ORIGIN, "https://dashboard.example.in"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization, content-type"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[actix_web::test]
    async fn simple_requests_carry_cors_headers() {
        let app = test::init_service(
            App::new()
                .wrap(super::middleware("*"))
                .route("/ai-chat", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ai-chat")
            .insert_header((header::ORIGIN, "https://dashboard.example.in"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
