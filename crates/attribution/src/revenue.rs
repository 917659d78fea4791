//! Product-list revenue parsing.
//!
//! A product list is a comma-delimited list of entries, each holding exactly
//! five semicolon-delimited fields: category, name, quantity, price, extras.

use thiserror::Error;

const FIELDS_PER_PRODUCT: usize = 5;
const PRICE_FIELD: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevenueError {
    #[error("product list is empty")]
    Empty,

    #[error("product `{entry}` has {found} fields, expected 5")]
    FieldCount { entry: String, found: usize },

    #[error("product `{entry}` has an unusable price `{price}`")]
    InvalidPrice { entry: String, price: String },
}

/// Total revenue of every product in `product_list`.
///
/// Fails as a whole if any single entry is malformed; no partial sum is
/// ever returned.
pub fn parse_revenue(product_list: &str) -> Result<f64, RevenueError> {
    if product_list.is_empty() {
        return Err(RevenueError::Empty);
    }

    product_list.split(',').try_fold(0.0, |total, entry| {
        let fields: Vec<&str> = entry.split(';').collect();
        if fields.len() != FIELDS_PER_PRODUCT {
            return Err(RevenueError::FieldCount {
                entry: entry.to_string(),
                found: fields.len(),
            });
        }

        let price = fields[PRICE_FIELD].trim();
        match price.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(total + value),
            _ => Err(RevenueError::InvalidPrice {
                entry: entry.to_string(),
                price: price.to_string(),
            }),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sums_every_product() {
        let revenue = parse_revenue(
            "Computers;HP Pavillion;1;1000;200|201,Office Supplies;Red Folders;4;4.00;205|206|207",
        )
        .unwrap();
        assert_eq!(revenue, 1004.0);
    }

    #[test]
    fn test_single_product_with_empty_extras() {
        assert_eq!(parse_revenue("Electronics;Zune - 32GB;1;250;").unwrap(), 250.0);
    }

    #[test]
    fn test_bad_price_fails() {
        let err = parse_revenue("Computers;HP Pavillion;1;BAD_REV;200|201").unwrap_err();
        assert_eq!(
            err,
            RevenueError::InvalidPrice {
                entry: "Computers;HP Pavillion;1;BAD_REV;200|201".into(),
                price: "BAD_REV".into(),
            }
        );
    }

    #[test]
    fn test_wrong_field_count_fails() {
        let err = parse_revenue("Computers;HP Pavillion;1;200").unwrap_err();
        assert!(matches!(err, RevenueError::FieldCount { found: 4, .. }));
    }

    #[test]
    fn test_one_bad_entry_discards_the_whole_list() {
        let err = parse_revenue("Computers;HP Pavillion;1;1000;200,Office Supplies;Red Folders;4.00")
            .unwrap_err();
        assert!(matches!(err, RevenueError::FieldCount { found: 3, .. }));
    }

    #[test]
    fn test_empty_and_missing_prices_fail() {
        assert_eq!(parse_revenue("").unwrap_err(), RevenueError::Empty);
        assert!(matches!(
            parse_revenue("Electronics;Ipod - Nano - 8GB;1;;").unwrap_err(),
            RevenueError::InvalidPrice { .. }
        ));
    }

    #[test]
    fn test_negative_and_non_finite_prices_fail() {
        for price in ["-5", "inf", "NaN"] {
            let list = format!("Electronics;Zune;1;{price};");
            assert!(
                matches!(parse_revenue(&list), Err(RevenueError::InvalidPrice { .. })),
                "price {price} should be rejected"
            );
        }
    }
}
