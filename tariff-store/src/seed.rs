use tariff_catalog::{Country, Product};

/// Fixed starting catalog, two products per supported country.
pub struct SeedProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub base_price: f64,
    pub country: Country,
}

pub const SEED_PRODUCTS: [SeedProduct; 6] = [
    SeedProduct { id: "sku-sweden-1", name: "Wool Blanket", base_price: 79.90, country: Country::Sweden },
    SeedProduct { id: "sku-sweden-2", name: "Cast Iron Pan", base_price: 45.00, country: Country::Sweden },
    SeedProduct { id: "sku-germany-1", name: "Espresso Machine", base_price: 349.00, country: Country::Germany },
    SeedProduct { id: "sku-germany-2", name: "Hiking Boots", base_price: 129.50, country: Country::Germany },
    SeedProduct { id: "sku-france-1", name: "Copper Saucepan", base_price: 89.00, country: Country::France },
    SeedProduct { id: "sku-france-2", name: "Linen Shirt", base_price: 59.99, country: Country::France },
];

impl SeedProduct {
    pub fn to_product(&self) -> Product {
        Product {
            id: self.id.to_string(),
            name: self.name.to_string(),
            base_price: self.base_price,
            country: self.country,
            discounts: Vec::new(),
        }
    }
}
