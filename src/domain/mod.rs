pub mod item;
pub mod settings;
pub mod week;

pub use item::{SavedWisdomItem, WisdomItem, WisdomSource};
pub use settings::{BibleTranslation, WisdomSettings};
pub use week::{day_seed, is_sunday, iso_week_key, local_date, WeekLog};
