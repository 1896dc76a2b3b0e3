//! InsightGen statistics utilities.

pub mod math;

pub use math::beta::regularized_incomplete_beta;
pub use math::correlation::{pearson, pearson_p_value, MIN_PAIRS};
pub use math::descriptive::*;
pub use math::normal::{normal_quantile, two_sided_z};
pub use math::stable::*;
