pub mod days;
pub mod filter;
pub mod reconcile;
pub mod time;

pub use days::{day_code_to_name, name_to_day_code, WEEK_DAYS};
pub use filter::{filter_records, paginate, total_pages};
pub use reconcile::{reconcile, ReconcileDefaults};
pub use time::{is_valid_time, to_backend_time, to_display_time};
