use serde_json::{Value, json};

use catalog_core::{Entity, ProductId, ValidationResult};

use crate::price::{PRICE_PRECISION, PRICE_SCALE, Price};
use crate::wire::{FIELD_DESCRIPTION, FIELD_ID, FIELD_NAME, FIELD_PRICE, WireFields};

/// Maximum length of `name`, in characters (`VARCHAR(63)`).
pub const NAME_MAX_LEN: usize = 63;

/// Maximum length of `description`, in characters (`VARCHAR(256)`).
pub const DESCRIPTION_MAX_LEN: usize = 256;

/// Entity: Product.
///
/// A product is *transient* until storage assigns it an id, *persisted*
/// afterwards. Repository calls that can end its life (`delete`) take it by
/// value, so a stale instance cannot be handed back to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: Option<ProductId>,
    name: String,
    description: Option<String>,
    price: Price,
}

impl Product {
    /// Build a transient product (no id).
    pub fn new(name: impl Into<String>, description: Option<String>, price: Price) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            price,
        }
    }

    /// Rehydrate a stored row.
    pub fn with_id(
        id: ProductId,
        name: impl Into<String>,
        description: Option<String>,
        price: Price,
    ) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            description,
            price,
        }
    }

    pub fn id_typed(&self) -> Option<ProductId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_price(&mut self, price: Price) {
        self.price = price;
    }

    /// Copy of this product carrying a storage-assigned id.
    pub fn persisted_as(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Build a transient product from a wire object.
    ///
    /// Only shape, type and sign are checked here. Length limits belong to
    /// the storage schema and are reported when the product is committed.
    pub fn deserialize(data: &Value) -> ValidationResult<Self> {
        let fields = WireFields::parse(data)?;
        Ok(Self {
            id: None,
            name: fields.name,
            description: fields.description,
            price: fields.price,
        })
    }

    /// Overwrite every mutable field from a wire object, keeping the id.
    ///
    /// Leaves `self` untouched when the payload is rejected.
    pub fn apply_wire(&mut self, data: &Value) -> ValidationResult<()> {
        let fields = WireFields::parse(data)?;
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        Ok(())
    }

    /// Wire object: `id` (null while transient), `name`, `description`,
    /// and `price` as a two-decimal string.
    pub fn serialize(&self) -> Value {
        json!({
            FIELD_ID: self.id.map(ProductId::get),
            FIELD_NAME: self.name,
            FIELD_DESCRIPTION: self.description,
            FIELD_PRICE: self.price.to_string(),
        })
    }

    /// Storage schema violations, worded the way Postgres reports them.
    ///
    /// Empty when the row would be accepted by the `products` table.
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();

        if self.name.is_empty() {
            out.push(
                "new row for relation \"products\" violates check constraint \"products_name_not_empty\""
                    .to_string(),
            );
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            out.push(format!("value too long for type character varying({NAME_MAX_LEN})"));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                out.push(format!(
                    "value too long for type character varying({DESCRIPTION_MAX_LEN})"
                ));
            }
        }
        // Postgres text cannot hold NUL at all.
        let has_nul = |s: &str| s.contains('\0');
        if has_nul(&self.name) || self.description.as_deref().is_some_and(has_nul) {
            out.push("invalid byte sequence for encoding \"UTF8\": 0x00".to_string());
        }
        if !self.price.fits_precision() {
            out.push(format!(
                "numeric field overflow: a field with precision {PRICE_PRECISION}, scale {PRICE_SCALE} must round to an absolute value less than 10^{}",
                PRICE_PRECISION - PRICE_SCALE
            ));
        }

        out
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}
