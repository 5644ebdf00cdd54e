//! pt-BR display formatting for gestao
//!
//! Figures are shown the Brazilian way: `.` groups thousands and `,`
//! separates decimals. Money gets an `R$ ` prefix.
//!
//! ```
//! use gestao_formatting::{format_brl, format_integer, parse_money};
//!
//! assert_eq!(format_brl(1234.56), "R$ 1.234,56");
//! assert_eq!(format_integer(1234.0), "1.234");
//! assert_eq!(parse_money("R$ 1.234,56"), Some(1234.56));
//! ```

mod money;
mod number;
mod tone;

pub use money::{coerce_number, format_brl, parse_money};
pub use number::{format_decimal, format_integer};
pub use tone::Tone;
