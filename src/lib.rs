pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod query_log;
pub mod retry;
pub mod broker;
pub mod prompt;
pub mod catalog;
pub mod preserve;
pub mod drivers;
pub mod cli;

/*

gptl10n: hand Swift sources and .xcstrings catalogs to a chat model,
one request at a time, with every request and answer kept on disk.

gptl10n/
├── Cargo.toml
├── reference/          # before/after example pair for the rewrite prompt
├── src/
│   ├── lib.rs          # Re-exports and shared aliases
│   ├── error.rs        # Error type
│   ├── config.rs       # BrokerConfig, settings file, API key lookup
│   ├── request.rs      # Request and chat wire types
│   ├── providers/      # Upstream trait, OpenAI client
│   ├── query_log.rs    # Per-attempt audit files
│   ├── retry.rs        # Attempt outcomes and classification
│   ├── broker.rs       # Cooldown + retry loop around one provider
│   ├── prompt/         # Prompt assembly for both tools
│   ├── catalog.rs      # .xcstrings model
│   ├── preserve.rs     # Rewrite sanity check
│   ├── drivers/        # add-localization / translate-localization logic
│   ├── cli.rs          # clap arguments
│   └── bin/            # the two binaries
└── tests/

*/

pub use broker::CompletionBroker;
pub use config::BrokerConfig;
pub use error::Error;
pub use request::Request;

/// What a completion hands back to the caller
pub type CompletionResult = Result<String, crate::error::Error>;

/// Caller-supplied acceptance check, run once per answered attempt.
/// It may borrow caller data for `'a`.
pub type Validator<'a> = dyn Fn(&str) -> bool + Send + Sync + 'a;
