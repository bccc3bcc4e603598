//! Record-to-model mapping
//!
//! Pure functions turning the executor's raw [`Record`]s into domain models.
//! Repositories return records untouched; the service layer decides which
//! mapper applies. Column names here are the single source of truth for the
//! shapes the catalog procedures return.

use crate::db::record::{Record, RecordError};
use crate::models::{Brand, Product, UserCredential, UserProfile};

/// Map one brand row: `id_brand`, `name`
pub fn brand_from_record(record: &Record) -> Result<Brand, RecordError> {
    Ok(Brand {
        id: record.uuid("id_brand")?,
        name: record.text("name")?.to_string(),
    })
}

/// Map a set of brand rows, failing on the first malformed record
pub fn brands_from_records(records: &[Record]) -> Result<Vec<Brand>, RecordError> {
    records.iter().map(brand_from_record).collect()
}

/// Map one product row: `id_product`, `name`, `description`, `id_brand`,
/// `brand_name`
pub fn product_from_record(record: &Record) -> Result<Product, RecordError> {
    Ok(Product {
        id: record.uuid("id_product")?,
        name: record.text("name")?.to_string(),
        description: record.text("description")?.to_string(),
        brand_id: record.uuid("id_brand")?,
        brand_name: record.text("brand_name")?.to_string(),
    })
}

/// Map a set of product rows, failing on the first malformed record
pub fn products_from_records(records: &[Record]) -> Result<Vec<Product>, RecordError> {
    records.iter().map(product_from_record).collect()
}

/// Map one user row: `first_name`, `last_name`, `password`
///
/// The `password` column holds the bcrypt hash, never plaintext.
pub fn credential_from_record(record: &Record) -> Result<UserCredential, RecordError> {
    Ok(UserCredential {
        profile: UserProfile {
            first_name: record.text("first_name")?.to_string(),
            last_name: record.text("last_name")?.to_string(),
        },
        password_hash: record.text("password")?.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn brand_record(id: Uuid, name: &str) -> Record {
        Record::new().with_uuid("id_brand", id).with_text("name", name)
    }

    #[test]
    fn test_brand_round_trip() {
        let id = Uuid::new_v4();
        let brand = brand_from_record(&brand_record(id, "Acme")).unwrap();

        assert_eq!(brand, Brand {
            id,
            name: "Acme".to_string()
        });
    }

    #[test]
    fn test_brand_missing_column() {
        let record = Record::new().with_text("name", "Acme");

        assert_eq!(
            brand_from_record(&record),
            Err(RecordError::MissingColumn {
                name: "id_brand".to_string()
            })
        );
    }

    #[test]
    fn test_brand_type_mismatch() {
        let record = Record::new()
            .with_text("id_brand", "oops")
            .with_text("name", "Acme");

        assert!(matches!(
            brand_from_record(&record),
            Err(RecordError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_brands_from_records_propagates_failure() {
        let good = brand_record(Uuid::new_v4(), "Acme");
        let bad = Record::new().with_text("name", "No Id");

        assert!(brands_from_records(&[good.clone()]).is_ok());
        assert!(brands_from_records(&[good, bad]).is_err());
    }

    #[test]
    fn test_product_round_trip() {
        let id = Uuid::new_v4();
        let brand_id = Uuid::new_v4();
        let record = Record::new()
            .with_uuid("id_product", id)
            .with_text("name", "Widget")
            .with_text("description", "A sturdy widget")
            .with_uuid("id_brand", brand_id)
            .with_text("brand_name", "Acme");

        let product = product_from_record(&record).unwrap();

        assert_eq!(product, Product {
            id,
            name: "Widget".to_string(),
            description: "A sturdy widget".to_string(),
            brand_id,
            brand_name: "Acme".to_string(),
        });
    }

    #[test]
    fn test_product_missing_brand_name() {
        let record = Record::new()
            .with_uuid("id_product", Uuid::new_v4())
            .with_text("name", "Widget")
            .with_text("description", "A widget")
            .with_uuid("id_brand", Uuid::new_v4());

        assert_eq!(
            product_from_record(&record),
            Err(RecordError::MissingColumn {
                name: "brand_name".to_string()
            })
        );
    }

    #[test]
    fn test_credential_round_trip() {
        let record = Record::new()
            .with_text("first_name", "Ada")
            .with_text("last_name", "Lovelace")
            .with_text("password", "$2b$04$abcdefghijklmnopqrstuv");

        let credential = credential_from_record(&record).unwrap();

        assert_eq!(credential.profile.first_name, "Ada");
        assert_eq!(credential.profile.last_name, "Lovelace");
        assert_eq!(credential.password_hash, "$2b$04$abcdefghijklmnopqrstuv");
    }
}
