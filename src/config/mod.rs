pub mod traits;
pub mod mutation;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use mutation::MutateParams;
pub use traits::ConfigSection;
