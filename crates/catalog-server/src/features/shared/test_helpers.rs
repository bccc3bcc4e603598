//! Shared test fixtures
//!
//! [`InMemoryCatalog`] is a repository double backing all three repository
//! traits from one store, so product reads can join brand names exactly the
//! way the database procedures do. Mutation calls are counted per entity,
//! which lets tests assert that a failed orchestration never attempted a
//! write.
//!
//! Used by the unit tests in the feature modules and by the integration
//! suite in `tests/`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::db::{
    BrandRepository, ExecutorError, ProductRepository, Record, UserRepository,
};
use crate::features::FeatureState;
use crate::models::Brand;

/// Bcrypt cost for fixture users; the minimum keeps the suite fast.
pub const TEST_HASH_COST: u32 = 4;

/// Signing secret used by [`test_token_service`]
pub const TEST_TOKEN_SECRET: &str = "unit-test-signing-secret";

/// Counts mutation calls so tests can assert that no write was attempted
#[derive(Debug, Default)]
pub struct MutationLog {
    creates: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

impl MutationLog {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.creates() + self.updates() + self.deletes()
    }

    fn record_create(&self) {
        self.creates.fetch_add(1, Ordering::SeqCst);
    }

    fn record_update(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    brand_id: Uuid,
}

#[derive(Debug, Clone)]
struct UserRow {
    username: String,
    first_name: String,
    last_name: String,
    password_hash: String,
}

/// In-memory double for the catalog's repositories
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    brands: Mutex<Vec<Brand>>,
    products: Mutex<Vec<ProductRow>>,
    users: Mutex<Vec<UserRow>>,
    database_down: AtomicBool,
    /// Mutation counters for the brand store
    pub brand_mutations: MutationLog,
    /// Mutation counters for the product store
    pub product_mutations: MutationLog,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a brand row
    pub fn with_brand(self, id: Uuid, name: &str) -> Self {
        lock(&self.brands).push(Brand {
            id,
            name: name.to_string(),
        });
        self
    }

    /// Seed a product row; `brand_id` should reference a seeded brand for
    /// reads to surface it
    pub fn with_product(self, id: Uuid, name: &str, description: &str, brand_id: Uuid) -> Self {
        lock(&self.products).push(ProductRow {
            id,
            name: name.to_string(),
            description: description.to_string(),
            brand_id,
        });
        self
    }

    /// Seed a user with a freshly hashed password
    pub fn with_user(self, username: &str, first_name: &str, last_name: &str, password: &str) -> Self {
        let password_hash = bcrypt::hash(password, TEST_HASH_COST).unwrap_or_default();
        lock(&self.users).push(UserRow {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password_hash,
        });
        self
    }

    /// Make every repository call fail, for exercising the 500 path
    pub fn with_database_down(self) -> Self {
        self.database_down.store(true, Ordering::SeqCst);
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn check_database(&self) -> Result<(), ExecutorError> {
        if self.database_down.load(Ordering::SeqCst) {
            Err(ExecutorError::Database(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }

    fn product_record(&self, row: &ProductRow) -> Option<Record> {
        // Read procedures inner-join the brands table; a product whose
        // brand is gone does not surface.
        let brands = lock(&self.brands);
        let brand = brands.iter().find(|brand| brand.id == row.brand_id)?;
        Some(
            Record::new()
                .with_uuid("id_product", row.id)
                .with_text("name", &row.name)
                .with_text("description", &row.description)
                .with_uuid("id_brand", row.brand_id)
                .with_text("brand_name", &brand.name),
        )
    }
}

fn brand_record(brand: &Brand) -> Record {
    Record::new()
        .with_uuid("id_brand", brand.id)
        .with_text("name", &brand.name)
}

fn user_record(row: &UserRow) -> Record {
    Record::new()
        .with_text("first_name", &row.first_name)
        .with_text("last_name", &row.last_name)
        .with_text("password", &row.password_hash)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl BrandRepository for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<Record>, ExecutorError> {
        self.check_database()?;
        Ok(lock(&self.brands).iter().map(brand_record).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, ExecutorError> {
        self.check_database()?;
        Ok(lock(&self.brands)
            .iter()
            .find(|brand| brand.id == id)
            .map(brand_record))
    }

    async fn create(&self, id: Uuid, name: &str) -> Result<u64, ExecutorError> {
        self.brand_mutations.record_create();
        self.check_database()?;
        lock(&self.brands).push(Brand {
            id,
            name: name.to_string(),
        });
        Ok(1)
    }

    async fn update(&self, id: Uuid, name: &str) -> Result<u64, ExecutorError> {
        self.brand_mutations.record_update();
        self.check_database()?;
        let mut brands = lock(&self.brands);
        match brands.iter_mut().find(|brand| brand.id == id) {
            Some(brand) => {
                brand.name = name.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ExecutorError> {
        self.brand_mutations.record_delete();
        self.check_database()?;
        let mut brands = lock(&self.brands);
        let before = brands.len();
        brands.retain(|brand| brand.id != id);
        Ok((before - brands.len()) as u64)
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn list(&self) -> Result<Vec<Record>, ExecutorError> {
        self.check_database()?;
        let products = lock(&self.products).clone();
        Ok(products
            .iter()
            .filter_map(|row| self.product_record(row))
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, ExecutorError> {
        self.check_database()?;
        let row = lock(&self.products).iter().find(|row| row.id == id).cloned();
        Ok(row.and_then(|row| self.product_record(&row)))
    }

    async fn create(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        brand_id: Uuid,
    ) -> Result<u64, ExecutorError> {
        self.product_mutations.record_create();
        self.check_database()?;
        lock(&self.products).push(ProductRow {
            id,
            name: name.to_string(),
            description: description.to_string(),
            brand_id,
        });
        Ok(1)
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        brand_id: Uuid,
    ) -> Result<u64, ExecutorError> {
        self.product_mutations.record_update();
        self.check_database()?;
        let mut products = lock(&self.products);
        match products.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.name = name.to_string();
                row.description = description.to_string();
                row.brand_id = brand_id;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ExecutorError> {
        self.product_mutations.record_delete();
        self.check_database()?;
        let mut products = lock(&self.products);
        let before = products.len();
        products.retain(|row| row.id != id);
        Ok((before - products.len()) as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryCatalog {
    async fn get_by_username(&self, username: &str) -> Result<Option<Record>, ExecutorError> {
        self.check_database()?;
        Ok(lock(&self.users)
            .iter()
            .find(|row| row.username == username)
            .map(user_record))
    }
}

/// Token service with fixed test parameters
pub fn test_token_service() -> TokenService {
    TokenService::new(TEST_TOKEN_SECRET, "catalog-api", "catalog-clients", 10)
}

/// Feature state wired entirely to the given in-memory catalog
pub fn test_state(catalog: Arc<InMemoryCatalog>) -> FeatureState {
    FeatureState {
        brands: catalog.clone(),
        products: catalog.clone(),
        users: catalog,
        tokens: test_token_service(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_brand_is_readable() {
        let id = Uuid::new_v4();
        let catalog = InMemoryCatalog::new().with_brand(id, "Acme");

        let record = BrandRepository::get_by_id(&catalog, id).await.unwrap().unwrap();

        assert_eq!(record.uuid("id_brand").unwrap(), id);
        assert_eq!(record.text("name").unwrap(), "Acme");
    }

    #[tokio::test]
    async fn test_product_read_joins_brand_name() {
        let brand_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let catalog = InMemoryCatalog::new()
            .with_brand(brand_id, "Acme")
            .with_product(product_id, "Widget", "A widget", brand_id);

        let record = ProductRepository::get_by_id(&catalog, product_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.text("brand_name").unwrap(), "Acme");
    }

    #[tokio::test]
    async fn test_mutations_are_counted() {
        let catalog = InMemoryCatalog::new();
        let id = Uuid::new_v4();

        BrandRepository::create(&catalog, id, "Acme").await.unwrap();
        BrandRepository::update(&catalog, id, "Acme Corp").await.unwrap();
        BrandRepository::delete(&catalog, id).await.unwrap();

        assert_eq!(catalog.brand_mutations.creates(), 1);
        assert_eq!(catalog.brand_mutations.updates(), 1);
        assert_eq!(catalog.brand_mutations.deletes(), 1);
        assert_eq!(catalog.product_mutations.total(), 0);
    }

    #[tokio::test]
    async fn test_database_down_fails_reads() {
        let catalog = InMemoryCatalog::new()
            .with_brand(Uuid::new_v4(), "Acme")
            .with_database_down();

        let result = BrandRepository::list(&catalog).await;

        assert!(matches!(result, Err(ExecutorError::Database(_))));
    }

    #[tokio::test]
    async fn test_seeded_user_password_verifies() {
        let catalog = InMemoryCatalog::new().with_user("ada", "Ada", "Lovelace", "s3cret");

        let record = catalog.get_by_username("ada").await.unwrap().unwrap();
        let hash = record.text("password").unwrap();

        assert!(bcrypt::verify("s3cret", hash).unwrap());
        assert!(!bcrypt::verify("wrong", hash).unwrap());
    }
}
