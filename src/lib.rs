//! Pleonastic "it" detection backed by n-gram count stores.
//!
//! The heavy part is [`NgramCompressedCntMap`], a read-only map from 4-token
//! windows (one slot masked) to (it, they) count pairs, decoded from a
//! dictionary-compressed, delta-encoded binary file. The plain-text
//! [`NgramCntMap`] answers the same queries; [`NgramStore`] picks one of the
//! two at load time.

pub mod codec;
pub mod compressed;
pub mod config;
pub mod detector;
pub mod dict;
pub mod error;
pub mod features;
pub mod keys;
pub mod model;
pub mod pattern;
pub mod plain;
pub mod store;
pub mod values;

pub use compressed::NgramCompressedCntMap;
pub use detector::Detector;
pub use error::{LoadError, QueryError};
pub use model::FeatureWeights;
pub use plain::NgramCntMap;
pub use store::{NgramCounts, NgramStore, StoreKind};
pub use values::CountPair;

/// Installs the stderr `tracing` subscriber used by the binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nada_it=info")),
        )
        .init();
}
