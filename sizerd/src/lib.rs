//! Sizer Daemon Library
//!
//! HTTP front end for the position size calculator.
//!
//! # Architecture
//!
//! ```text
//! Client → API Server → Calculator Session → Engine (pure)
//!                ↓
//!           Price Feed (CoinGecko / stub)
//! ```
//!
//! # Components
//!
//! - **Daemon**: Main runtime orchestrator
//! - **Session**: Current inputs and results, recomputed on every edit
//! - **API**: HTTP endpoints
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use sizerd::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new_live(config);
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod daemon;
pub mod error;
pub mod session;

// Re-exports for convenience
pub use api::{create_router, ApiState};
pub use config::{ApiConfig, CalculatorConfig, Config, Environment, FeedConfig};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult};
pub use session::CalculatorSession;
