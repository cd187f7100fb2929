//! Data containers and preparation.
//!
//! # Overview
//!
//! - [`Dataset`]: sample-major feature matrix paired with [`Targets`]
//! - [`train_test_split`]: deterministic held-out split
//! - [`LabelEncoder`], [`MinMaxScaler`]: the preprocessing a caller usually
//!   runs before training
//!
//! Features are stored as `[n_samples, n_features]`. Categorical columns must
//! already be mapped to numeric codes (see [`LabelEncoder::encode_column`]).

mod dataset;
mod preprocess;
mod split;

pub use dataset::{Dataset, Targets};
pub use preprocess::{LabelEncoder, MinMaxScaler};
pub use split::{split_indices, train_test_split};

pub use ndarray;
