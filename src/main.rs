use std::env;

use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use boutique_orders::auth::AuthConfig;
use boutique_orders::db::establish_connection_pool;
use boutique_orders::notify::LogNotifier;
use boutique_orders::repository::DieselRepository;
use boutique_orders::routes::coupons::{
    add_coupon, check_coupon, delete_coupon, edit_coupon, list_coupons,
};
use boutique_orders::routes::custom_requests::{
    advance_custom_request, cancel_custom_request, convert_custom_request, create_custom_request,
    get_custom_request, list_custom_requests, send_quote,
};
use boutique_orders::routes::orders::{
    advance_order_status, cancel_order, create_order, get_order, list_orders, track_order,
};
use boutique_orders::routes::payments::{
    mark_fully_paid, record_payment, record_refund, reject_payment, verify_payment,
};
use boutique_orders::routes::returns::{
    approve_return, create_return, list_returns, reject_return,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret = match secret {
        Ok(secret) => secret,
        Err(_) => {
            log::error!("SECRET_KEY environment variable not set");
            std::process::exit(1);
        }
    };

    let auth_config = AuthConfig { secret };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);
    let notifier = LogNotifier;

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(list_orders)
            .service(get_order)
            .service(track_order)
            .service(create_order)
            .service(advance_order_status)
            .service(cancel_order)
            .service(record_payment)
            .service(mark_fully_paid)
            .service(record_refund)
            .service(verify_payment)
            .service(reject_payment)
            .service(list_coupons)
            .service(check_coupon)
            .service(add_coupon)
            .service(edit_coupon)
            .service(delete_coupon)
            .service(list_returns)
            .service(create_return)
            .service(approve_return)
            .service(reject_return)
            .service(list_custom_requests)
            .service(get_custom_request)
            .service(create_custom_request)
            .service(send_quote)
            .service(cancel_custom_request)
            .service(advance_custom_request)
            .service(convert_custom_request)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .app_data(web::Data::new(notifier.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
