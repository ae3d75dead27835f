#[actix_web::main]
async fn main() -> std::io::Result<()> {
    asset_catalog_server::run().await
}
