//! The static product catalog.
//!
//! Loaded once at startup, either from the JSON file named by
//! `STOREFRONT_CATALOG_PATH` or from the catalog compiled into the binary.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use threadline_core::{Product, ProductId};

/// Catalog bundled with the binary.
const BUNDLED_CATALOG: &str = include_str!("../catalog/products.json");

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("product {0} offers no sizes")]
    NoSizes(ProductId),
    #[error("catalog contains no products")]
    Empty,
}

/// Read-only, ordered list of purchasable products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, validating ids and sizes.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, an id repeats, or a product
    /// offers no sizes.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if product.sizes.is_empty() {
                return Err(CatalogError::NoSizes(product.id.clone()));
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self { products, index })
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled file is itself invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load from `path` if given, otherwise the bundled catalog.
    ///
    /// # Errors
    ///
    /// See [`Catalog::from_path`].
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::bundled()?,
        };
        tracing::info!(
            products = catalog.len(),
            source = %path.map_or_else(|| "bundled".to_string(), |p| p.display().to_string()),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|&i| self.products.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_is_valid() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.is_empty());
        for product in catalog.products() {
            assert_eq!(catalog.get(&product.id), Some(product));
        }
    }

    #[test]
    fn test_from_json_keeps_order() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": "b", "name": "B", "price": {"amount": "10.00"}, "image": "", "sizes": ["M"]},
                {"id": "a", "name": "A", "price": {"amount": "12.00"}, "image": "", "sizes": ["S", "L"]}
            ]"#,
        )
        .unwrap();

        let ids: Vec<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(catalog.get(&ProductId::parse("a").unwrap()).unwrap().name, "A");
        assert!(catalog.get(&ProductId::parse("c").unwrap()).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::from_json(
            r#"[
                {"id": "a", "name": "A", "price": {"amount": "1"}, "image": "", "sizes": ["M"]},
                {"id": "a", "name": "A2", "price": {"amount": "1"}, "image": "", "sizes": ["M"]}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id.as_str() == "a"));
    }

    #[test]
    fn test_product_without_sizes_rejected() {
        let err = Catalog::from_json(
            r#"[{"id": "a", "name": "A", "price": {"amount": "1"}, "image": "", "sizes": []}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::NoSizes(_)));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            Catalog::from_json("[]").unwrap_err(),
            CatalogError::Empty
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{not json").unwrap_err(),
            CatalogError::Parse(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
