use venue_backend::{
    api::router::create_router,
    config::Config,
    domain::models::event::{Event, NewEventParams, Sector, VenueTable},
    domain::models::package::Package,
    domain::ports::{EventRepository, PackageRepository},
    domain::services::availability::AvailabilityChecker,
    domain::services::guest_directory::GuestDirectory,
    domain::services::ticketing::TicketingEngine,
    infra::repositories::{
        sqlite_event_repo::SqliteEventRepo,
        sqlite_guest_repo::SqliteGuestRepo,
        sqlite_package_repo::SqlitePackageRepo,
        sqlite_request_repo::SqliteRequestRepo,
        sqlite_ticket_repo::SqliteTicketRepo,
    },
    infra::storage::fs_voucher_storage::FsVoucherStorage,
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub voucher_dir: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        let voucher_dir = format!("test_vouchers_{}", Uuid::new_v4());

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            voucher_dir: voucher_dir.clone(),
        };

        let guest_repo = Arc::new(SqliteGuestRepo::new(pool.clone()));
        let request_repo = Arc::new(SqliteRequestRepo::new(pool.clone()));
        let ticket_repo = Arc::new(SqliteTicketRepo::new(pool.clone()));
        let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
        let package_repo = Arc::new(SqlitePackageRepo::new(pool.clone()));

        let guest_directory = Arc::new(GuestDirectory::new(guest_repo.clone()));
        let availability = Arc::new(AvailabilityChecker::new(request_repo.clone(), event_repo.clone()));
        let ticketing = Arc::new(TicketingEngine::new(
            ticket_repo.clone(),
            guest_repo.clone(),
            guest_directory.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            guest_repo,
            request_repo,
            ticket_repo,
            event_repo,
            package_repo,
            voucher_storage: Arc::new(FsVoucherStorage::new(voucher_dir.clone())),
            guest_directory,
            availability,
            ticketing,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            voucher_dir,
            state,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("X-User-Id", "manager-1")
            .header("X-User-Role", "MANAGER");

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> axum::response::Response {
        self.send("POST", uri, Some(body)).await
    }

    #[allow(dead_code)]
    pub async fn put(&self, uri: &str, body: Value) -> axum::response::Response {
        self.send("PUT", uri, Some(body)).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_dir_all(&self.voucher_dir);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub struct Venue {
    pub event_id: String,
    pub sector_id: String,
    pub table1_id: String,
    pub table2_id: String,
    pub package_id: String,
}

/// Seeds a sector with two tables, one package (4 people included) and one
/// upcoming event eligible for both tables.
pub async fn seed_venue(app: &TestApp, requires_guest_list: bool, free_qr_count: i64) -> Venue {
    let sector = app
        .state
        .event_repo
        .create_sector(&Sector::new("Main Floor".into(), requires_guest_list))
        .await
        .unwrap();

    let table1 = app
        .state
        .event_repo
        .create_table(&VenueTable::new(sector.id.clone(), "T1".into(), 8, "BOOTH".into()))
        .await
        .unwrap();
    let table2 = app
        .state
        .event_repo
        .create_table(&VenueTable::new(sector.id.clone(), "T2".into(), 8, "BOOTH".into()))
        .await
        .unwrap();

    let package = app
        .state
        .package_repo
        .create(&Package::new("Standard".into(), 4, 20000, 3000))
        .await
        .unwrap();

    let event = app
        .state
        .event_repo
        .create(&Event::new(NewEventParams {
            name: "Saturday Night".into(),
            event_date: (Utc::now() + Duration::days(7)).date_naive(),
            visible_from: Utc::now(),
            visible_until: Utc::now() + Duration::days(7),
            free_invitation_qr_count: free_qr_count,
            payment_qr_ref: Some("payment-qr.png".into()),
        }))
        .await
        .unwrap();

    app.state.event_repo.add_event_table(&event.id, &table1.id).await.unwrap();
    app.state.event_repo.add_event_table(&event.id, &table2.id).await.unwrap();

    Venue {
        event_id: event.id,
        sector_id: sector.id,
        table1_id: table1.id,
        table2_id: table2.id,
        package_id: package.id,
    }
}

#[allow(dead_code)]
pub fn request_payload(venue: &Venue, table_id: &str, document: &str) -> Value {
    serde_json::json!({
        "event_id": venue.event_id,
        "table_id": table_id,
        "package_id": venue.package_id,
        "client": {
            "name": "Carlos Mendez",
            "document_number": document,
            "phone": "555-0100"
        },
        "extra_guests": 0,
        "terms_accepted": true
    })
}
