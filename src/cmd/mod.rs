//! CLI command implementations.
//!
//! | Module    | Commands handled |
//! |-----------|------------------|
//! | `run`     | `Run`            |
//! | `session` | `Session`        |
//! | `config`  | `Config`         |

pub mod config;
pub mod run;
pub mod session;

pub use config::cmd_config;
pub use run::cmd_run;
pub use session::cmd_session;
