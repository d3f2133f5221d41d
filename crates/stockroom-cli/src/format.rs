//! Display helpers for terminal output.

use stockroom_core::models::{Product, User};

/// Format a phone number for display
/// Handles various input formats and normalizes to (XXX) XXX-XXXX
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 if digits.starts_with('1') => {
            format!("({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..11])
        }
        _ => phone.to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

pub fn format_user(user: &User) -> String {
    match user.phone {
        Some(ref phone) => format!("{} <{}> {}", user.full_name, user.email, format_phone(phone)),
        None => format!("{} <{}>", user.full_name, user.email),
    }
}

/// One aligned table row per product
pub fn format_product_row(product: &Product) -> String {
    format!(
        "{:<12} {:<32} {:>10} {:>6}  {}",
        truncate_string(&product.id, 12),
        truncate_string(&product.name, 32),
        format_price(product.price),
        product.stock,
        product.category.as_deref().unwrap_or("-"),
    )
}

pub fn format_product_detail(product: &Product) -> String {
    let mut lines = vec![
        format!("{} ({})", product.name, product.id),
        format!("Price:    {}", format_price(product.price)),
        format!(
            "Stock:    {}{}",
            product.stock,
            if product.in_stock() { "" } else { " (out of stock)" }
        ),
    ];
    if let Some(ref category) = product.category {
        lines.push(format!("Category: {}", category));
    }
    if let Some(ref description) = product.description {
        lines.push(format!("About:    {}", description));
    }
    if let Some(updated) = product.updated_at.or(product.created_at) {
        lines.push(format!("Updated:  {}", updated.format("%b %d, %Y")));
    }
    lines.join("\n")
}
