//! Document-object coercion for arithmetic operands.
//!
//! | operand                          | coerced to                              |
//! |----------------------------------|-----------------------------------------|
//! | one-item array / node collection | the coercion of that item               |
//! | element                          | number if its trimmed text parses,      |
//! |                                  | else the trimmed text, else `0`         |
//! | anything else                    | unchanged                               |

use loka_value::{parse_number, Value};

/// Reduce a document object to a primitive before arithmetic.
pub fn coerce_operand(value: Value) -> Value {
    if let Some(item) = value.single_item() {
        return coerce_operand(item);
    }
    match value {
        Value::Element(element) => {
            let text = element.text_content();
            let text = text.trim();
            if let Some(n) = parse_number(text) {
                Value::number(n)
            } else if text.is_empty() {
                Value::number(0.0)
            } else {
                Value::string(text)
            }
        }
        other => other,
    }
}
