pub mod debounce;
pub mod distinct_until_changed;
pub mod filter;
pub mod map;
pub mod merge_map;
pub mod pluck;
pub mod reduce;
pub mod scan;
pub mod switch_map;
pub mod throttle_time;
