use serde::{Deserialize, Serialize};

/// A product as listed by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub reserved_stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, stock_quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind: String::new(),
            price,
            stock_quantity,
            reserved_stock: 0,
            image_url: None,
        }
    }

    pub fn with_reserved(mut self, reserved_stock: u32) -> Self {
        self.reserved_stock = reserved_stock;
        self
    }

    /// Units that can still be put in a cart. Never negative, even when the
    /// backend reports more reserved than stocked units.
    pub fn available(&self) -> u32 {
        self.stock_quantity.saturating_sub(self.reserved_stock)
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.available() == 0
    }

    /// Full URL of the product image, falling back to the shared default image.
    pub fn image_url(&self, base_url: &str, default_image: &str) -> String {
        match self.image_url.as_deref() {
            Some(image) if !image.is_empty() => format!("{}{}", base_url, image),
            _ => format!("{}{}", base_url, default_image),
        }
    }
}

/// An image attached to a product create/update form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Form payload for creating or editing a product (sent as multipart).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub price: f64,
    pub stock_quantity: u32,
    pub image: Option<ProductImage>,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            kind: product.kind.clone(),
            price: product.price,
            stock_quantity: product.stock_quantity,
            image: None,
        }
    }
}
