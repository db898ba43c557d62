pub mod config;
pub mod time;

pub use config::{load_dotenv, Config, DEFAULT_LOOKAHEAD_DAYS};
pub use time::TimeOfDay;
