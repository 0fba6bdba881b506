//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellError,
    CellView,
    // Error types
    Error,
    Position,
    Result,
    // Main types
    Sheet,
    SheetOptions,
    Size,
    Value,
};
