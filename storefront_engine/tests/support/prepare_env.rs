use log::*;
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite};
use storefront_engine::{
    db_types::{NewProduct, Product},
    CatalogApi,
    SqliteDatabase,
};

/// Creates a fresh throwaway SQLite database, runs the migrations, and hands back a connected backend.
pub async fn prepare_test_env() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    let url = random_db_url();
    create_database(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 16).await.expect("Error creating connection to database");
    migrate!("./migrations").run(db.pool()).await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
    db
}

pub fn random_db_url() -> String {
    let path = std::env::temp_dir().join(format!("storefront_test_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

pub async fn seed_product(db: &SqliteDatabase, name: &str, price: &str, stock: i64) -> Product {
    let price = price.parse().expect("invalid price literal in test");
    let api = CatalogApi::new(db.clone());
    api.add_product(NewProduct::new(name, price, stock)).await.expect("Error seeding product")
}
