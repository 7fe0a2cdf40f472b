use crate::domain::{models::package::Package, ports::PackageRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePackageRepo {
    pool: SqlitePool,
}

impl SqlitePackageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PackageRepository for SqlitePackageRepo {
    async fn create(&self, package: &Package) -> Result<Package, AppError> {
        sqlx::query_as::<_, Package>(
            "INSERT INTO packages (id, name, included_people, base_price, extra_person_price, is_active)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&package.id).bind(&package.name).bind(package.included_people)
            .bind(package.base_price).bind(package.extra_person_price).bind(package.is_active)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Package>, AppError> {
        sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
