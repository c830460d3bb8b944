//! Placeholder tokens recognised inside message templates.
//!
//! Each token is replaced literally by the renderer. Tokens not listed here
//! are left in the output untouched.

pub const PAIR: &str = "${PAIR}";
pub const DIRECTION: &str = "${DIRECTION}";
pub const POSITION_NUMBER: &str = "${POSITION_NUMBER}";
pub const MESSAGE_NUMBER: &str = "${MESSAGE_NUMBER}";
pub const PROFIT: &str = "${PROFIT}";
pub const NUMBER_OF_BUYS: &str = "${NUMBER_OF_BUYS}";
pub const TYPE: &str = "${TYPE}";
pub const COLOR: &str = "${COLOR}";

/// Every supported placeholder, in declaration order.
pub const ALL: [&str; 8] = [
    PAIR,
    DIRECTION,
    POSITION_NUMBER,
    MESSAGE_NUMBER,
    PROFIT,
    NUMBER_OF_BUYS,
    TYPE,
    COLOR,
];
