pub mod user;
pub mod product;
pub mod order;
pub mod cart;
pub mod payment;
pub mod delivery;
pub mod notification;

pub use user::*;
pub use product::*;
pub use order::*;
pub use cart::*;
pub use payment::*;
pub use delivery::*;
pub use notification::*;

/// Renders an amount the way the storefront shows prices: `1.234.567 ₫`.
///
/// Amounts are rounded to whole dong; negative amounts keep their sign.
pub fn format_vnd(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{} ₫", grouped)
    } else {
        format!("{} ₫", grouped)
    }
}
