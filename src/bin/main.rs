#[cfg(not(target_arch = "wasm32"))]
mod native {
    extern crate uniq_blog;

    use actix_web::{web, App, HttpServer, HttpRequest, HttpResponse};
    use log::{error, info};

    use uniq_blog::config;
    use uniq_blog::content::{ContentClient, ReqwestTransport};

    type Client = ContentClient<ReqwestTransport>;

    mod adapter {
        use actix_web::HttpRequest;
        use spin_sdk::http::{Request, Method};

        pub fn actix_to_spin_request(
            req: &HttpRequest,
            body: actix_web::web::Bytes,
        ) -> anyhow::Result<Request> {
            let method = match req.method().as_str() {
                "GET" => Method::Get,
                "POST" => Method::Post,
                "PUT" => Method::Put,
                "DELETE" => Method::Delete,
                "HEAD" => Method::Head,
                "OPTIONS" => Method::Options,
                "PATCH" => Method::Patch,
                other => anyhow::bail!("unsupported method {}", other),
            };

            let uri = req.uri().to_string();

            let mut builder = Request::builder();
            builder.method(method).uri(&uri);
            for (name, value) in req.headers() {
                if let Ok(val_str) = value.to_str() {
                    builder.header(name.as_str(), val_str);
                }
            }

            Ok(builder.body(body.to_vec()).build())
        }

        pub fn spin_to_actix_response(spin_resp: spin_sdk::http::Response) -> actix_web::HttpResponse {
            let status = *spin_resp.status();

            let mut response = actix_web::HttpResponse::build(
                actix_web::http::StatusCode::from_u16(status)
                    .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
            );

            // Content-Type, Cache-Control and the viewed-trail cookie must survive the hop.
            for (name, value) in spin_resp.headers() {
                if let Some(val_str) = value.as_str() {
                    response.append_header((name.to_string(), val_str.to_string()));
                }
            }

            response.body(spin_resp.body().to_vec())
        }
    }

    pub async fn run() -> std::io::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let addr = config::bind_addr();
        let client = web::Data::new(Client::from_env(ReqwestTransport::new()));
        info!("Server listening on http://{}", addr);

        HttpServer::new(move || {
            App::new()
                .app_data(client.clone())
                .default_service(web::route().to(handle_all))
        })
        .bind(addr)?
        .run()
        .await
    }

    async fn handle_all(client: web::Data<Client>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
        let spin_req = match adapter::actix_to_spin_request(&req, body) {
            Ok(r) => r,
            Err(e) => {
                error!("rejecting {} {}: {}", req.method(), req.path(), e);
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({"error": "Invalid request"}));
            }
        };

        let resp = uniq_blog::handlers::dispatch(client.get_ref(), spin_req).await;
        adapter::spin_to_actix_response(resp)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    native::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
