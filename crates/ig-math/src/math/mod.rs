//! Core math modules.

pub mod beta;
pub mod correlation;
pub mod descriptive;
pub mod normal;
pub mod stable;
