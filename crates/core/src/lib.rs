pub mod chain;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod heartbeat;
pub mod leg;
pub mod order;
pub mod traits;

pub use chain::{OptionChainData, OptionContract, OptionRight};
pub use config::{AppConfig, MonitorConfig, StoreConfig};
pub use config_loader::ConfigLoader;
pub use error::{ProviderError, StoreError};
pub use heartbeat::is_stale;
pub use leg::{LegSide, OptionLeg};
pub use order::{OrderSide, OrderStatus, SavedOrder, TimeInForce};
pub use traits::{MutateFn, OrderStore, QuoteProvider, StoreEvent};
