use crate::auth::model::UserSummary;
use crate::bidding::model::Bid;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub original_price: f64,
    pub picture_url: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub seller_id: i64,
}

// 판매자와 입찰 목록이 포함된 상품 조회 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub seller: Option<UserSummary>,
    pub bids: Vec<Bid>,
}

// 상품 생성
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub original_price: f64,
    pub picture_url: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub seller_id: i64,
}

// 상품 수정 (None 필드는 유지)
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub original_price: Option<f64>,
    pub picture_url: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ProductChanges {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(price) = self.original_price {
            product.original_price = price;
        }
        if let Some(url) = self.picture_url {
            product.picture_url = Some(url);
        }
        if let Some(end_date) = self.end_date {
            product.end_date = Some(end_date);
        }
    }
}

/// 요청 바디. sellerId 가 들어와도 무시한다.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub original_price: Option<f64>,
    pub picture_url: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ProductPayload {
    /// 생성 시에는 name, description, originalPrice 필수
    pub fn into_new_product(self, seller_id: i64) -> Result<NewProduct, AppError> {
        let mut details = Vec::new();
        let name = required_text(self.name, "name", &mut details);
        let description = required_text(self.description, "description", &mut details);
        match self.original_price {
            None => details.push("originalPrice is required".to_string()),
            Some(price) => check_price(price, &mut details),
        }

        if !details.is_empty() {
            return Err(AppError::Validation(details));
        }

        Ok(NewProduct {
            name,
            description,
            category: self.category,
            original_price: self.original_price.unwrap_or_default(),
            picture_url: self.picture_url,
            end_date: self.end_date,
            seller_id,
        })
    }

    /// 수정 시에는 들어온 필드만 검증
    pub fn into_changes(self) -> Result<ProductChanges, AppError> {
        let mut details = Vec::new();
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            details.push("name must not be empty".to_string());
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            details.push("description must not be empty".to_string());
        }
        if let Some(price) = self.original_price {
            check_price(price, &mut details);
        }

        if !details.is_empty() {
            return Err(AppError::Validation(details));
        }

        Ok(ProductChanges {
            name: self.name.map(|s| s.trim().to_string()),
            description: self.description.map(|s| s.trim().to_string()),
            category: self.category,
            original_price: self.original_price,
            picture_url: self.picture_url,
            end_date: self.end_date,
        })
    }
}

fn required_text(value: Option<String>, field: &str, details: &mut Vec<String>) -> String {
    match value.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => s,
        _ => {
            details.push(format!("{} is required", field));
            String::new()
        }
    }
}

fn check_price(price: f64, details: &mut Vec<String>) {
    if !price.is_finite() || price <= 0.0 {
        details.push("originalPrice must be a positive number".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ProductPayload {
        ProductPayload {
            name: Some("Lamp".to_string()),
            description: Some("Brass desk lamp".to_string()),
            category: Some("home".to_string()),
            original_price: Some(40.0),
            picture_url: None,
            end_date: None,
        }
    }

    #[test]
    fn new_product_takes_caller_as_seller() {
        let product = payload().into_new_product(42).unwrap();
        assert_eq!(product.seller_id, 42);
        assert_eq!(product.name, "Lamp");
    }

    #[test]
    fn new_product_requires_core_fields() {
        let err = ProductPayload::default().into_new_product(1).unwrap_err();
        match err {
            AppError::Validation(details) => {
                assert_eq!(
                    details,
                    vec![
                        "name is required",
                        "description is required",
                        "originalPrice is required"
                    ]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn price_must_be_positive() {
        let mut p = payload();
        p.original_price = Some(0.0);
        assert!(matches!(p.into_new_product(1), Err(AppError::Validation(_))));

        let changes = ProductPayload {
            original_price: Some(-3.0),
            ..Default::default()
        };
        assert!(matches!(changes.into_changes(), Err(AppError::Validation(_))));
    }

    #[test]
    fn seller_id_in_body_is_ignored() {
        let parsed: ProductPayload = serde_json::from_str(
            r#"{"name":"Lamp","description":"d","originalPrice":10,"sellerId":99}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_new_product(3).unwrap().seller_id, 3);
    }

    #[test]
    fn changes_trim_text_like_creation() {
        let changes = ProductPayload {
            name: Some("  Lamp ".to_string()),
            description: Some(" Brass desk lamp\n".to_string()),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        assert_eq!(changes.name.as_deref(), Some("Lamp"));
        assert_eq!(changes.description.as_deref(), Some("Brass desk lamp"));
    }

    #[test]
    fn changes_only_touch_supplied_fields() {
        let mut product = Product {
            id: 1,
            name: "Lamp".to_string(),
            description: "old".to_string(),
            category: None,
            original_price: 10.0,
            picture_url: None,
            end_date: None,
            seller_id: 1,
        };
        ProductChanges {
            description: Some("new".to_string()),
            original_price: Some(12.5),
            ..Default::default()
        }
        .apply(&mut product);

        assert_eq!(product.name, "Lamp");
        assert_eq!(product.description, "new");
        assert_eq!(product.original_price, 12.5);
    }

    #[test]
    fn view_serializes_camel_case_with_associations() {
        let view = ProductView {
            product: Product {
                id: 1,
                name: "Lamp".to_string(),
                description: "d".to_string(),
                category: None,
                original_price: 10.0,
                picture_url: None,
                end_date: None,
                seller_id: 5,
            },
            seller: None,
            bids: vec![],
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["originalPrice"], 10.0);
        assert_eq!(json["sellerId"], 5);
        assert!(json["bids"].as_array().unwrap().is_empty());
    }
}
