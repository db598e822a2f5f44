// src/parse_expr/mod.rs
//
// Expression parsing: precedence climbing in `pratt`, operands in `primary`.

mod pratt;
mod primary;
