use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::{Entity, EntityId};

/// Rejects names with no visible characters
fn validate_product_name(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        return Err(validator::ValidationError::new("blank_product_name"));
    }
    Ok(())
}

/// Product entity - the stored record
///
/// `stock` is never negative once persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub stock: i32,
}

impl Product {
    /// Create an unsaved product; the store assigns its id.
    pub fn new(name: impl Into<String>, stock: i32) -> Self {
        Self {
            id: 0,
            name: name.into(),
            stock,
        }
    }

    /// Overwrite the mutable fields from an update request
    pub fn apply_update(&mut self, update: UpdateProduct) {
        self.name = update.name;
        self.stock = update.stock;
    }
}

impl Entity for Product {
    fn id(&self) -> EntityId {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// Product as returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    /// Store-assigned identifier
    #[schema(example = 100000)]
    pub id: EntityId,
    /// Product name
    #[schema(example = "Widget")]
    pub name: String,
    /// Units currently in stock
    #[schema(example = 12)]
    pub stock: i32,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            stock: product.stock,
        }
    }
}

/// DTO for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200), custom(function = "validate_product_name"))]
    pub name: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
}

impl From<CreateProduct> for Product {
    fn from(input: CreateProduct) -> Self {
        Product::new(input.name, input.stock)
    }
}

/// DTO for replacing a product's name and stock
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200), custom(function = "validate_product_name"))]
    pub name: String,
    #[validate(range(min = 0))]
    pub stock: i32,
}

/// Path parameters of the stock endpoints
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StockChange {
    pub id: EntityId,
    #[validate(range(min = 1, message = "Quantity must be a positive number."))]
    pub quantity: i32,
}

/// Acknowledgement returned by the stock endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockAdjusted {
    #[schema(example = "Stock decremented successfully.")]
    pub message: String,
}

impl StockAdjusted {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_is_unsaved() {
        let product = Product::new("Widget", 12);
        assert_eq!(product.id(), 0);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.stock, 12);
    }

    #[test]
    fn test_apply_update_overwrites_fields() {
        let mut product = Product {
            id: 100000,
            name: "Widget".to_string(),
            stock: 12,
        };
        product.apply_update(UpdateProduct {
            name: "Gadget".to_string(),
            stock: 3,
        });
        assert_eq!(product.id, 100000);
        assert_eq!(product.name, "Gadget");
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn test_create_product_validation() {
        let ok = CreateProduct {
            name: "Widget".to_string(),
            stock: 0,
        };
        assert!(ok.validate().is_ok());

        let empty_name = CreateProduct {
            name: String::new(),
            stock: 1,
        };
        assert!(empty_name.validate().is_err());

        let negative = CreateProduct {
            name: "Widget".to_string(),
            stock: -1,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_blank_names_are_rejected() {
        for name in [" ", "   ", "\t\n"] {
            let create = CreateProduct {
                name: name.to_string(),
                stock: 1,
            };
            let errors = create.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("name"), "{:?}", name);

            let update = UpdateProduct {
                name: name.to_string(),
                stock: 1,
            };
            assert!(update.validate().is_err(), "{:?}", name);
        }

        let padded = CreateProduct {
            name: " Widget ".to_string(),
            stock: 1,
        };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_create_product_stock_defaults_to_zero() {
        let input: CreateProduct = serde_json::from_str(r#"{"name":"Widget"}"#).unwrap();
        assert_eq!(input.stock, 0);
    }

    #[test]
    fn test_stock_change_requires_positive_quantity() {
        assert!(StockChange { id: 1, quantity: 1 }.validate().is_ok());
        assert!(StockChange { id: 1, quantity: 0 }.validate().is_err());
        assert!(StockChange { id: 1, quantity: -4 }.validate().is_err());
    }

    #[test]
    fn test_dto_from_product() {
        let dto = ProductDto::from(Product {
            id: 100001,
            name: "Widget".to_string(),
            stock: 7,
        });
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            serde_json::json!({"id": 100001, "name": "Widget", "stock": 7})
        );
    }
}
