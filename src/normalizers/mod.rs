//! Pure functions that turn noisy page strings into canonical field values.
//! Every source calls these; none of them touch the network.

mod date;
mod description;
mod duration;
mod ingredient;
mod servings;

pub use date::{find_date_in_text, format_iso_date, normalize_relative_date, truncate_at_comma};
pub use description::{select_description, LABEL_DENYLIST};
pub use duration::{find_cooking_time, find_cooking_time_in_text, normalize_duration};
pub use ingredient::{has_amount, split_ingredient, MarkupRuns};
pub use servings::{find_servings, find_servings_in_text, normalize_servings};
