//! Training losses for Knowledge Graph Embeddings.
//!
//! A KGE model scores triples `(h, r, t)`. Training compares the scores of
//! observed triples (positives, `t⁺`) with the scores of corrupted ones
//! (negatives, `t⁻`, usually `eta` per positive) and minimizes a scalar
//! loss built from both.
//!
//! ## Losses
//!
//! | Name | Loss | Reference |
//! |------|------|-----------|
//! | `pairwise` | Σ max(0, γ + f(t⁻) - f(t⁺)) | Bordes et al. 2013 |
//! | `nll` | Σ log(1 + exp(-y f(t))) | Trouillon et al. 2016 |
//! | `nll-adversarial` | NLL with softmax-weighted negatives | |
//! | `absolute_margin` | Σ max(0, γ + f(t⁻)) - f(t⁺) | Hamaguchi et al. 2017 |
//! | `self_adversarial` | -log σ(γ + f(t⁺)) - Σ p log σ(-f(t⁻) - γ) | Sun et al. 2019 |
//!
//! The margin losses and `nll` pair negatives with positives row by row,
//! so when `eta != 1` both batches must have the same length. The
//! adversarial losses instead read the negatives as an `[eta, n]` matrix
//! and weight each column with `softmax(α · f(t⁻))`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use candle_core::{Device, Tensor};
//! use lattix_loss::{Hyperparams, LossRegistry};
//!
//! let registry = LossRegistry::standard();
//! let loss = registry.build("self_adversarial", 2, &Hyperparams::new().with("margin", 3))?;
//!
//! let scores_pos = Tensor::new(&[[0.9f32], [0.1]], &Device::Cpu)?;
//! let scores_neg = Tensor::new(&[[0.2f32], [0.4], [-0.3], [0.0]], &Device::Cpu)?;
//! let value = loss.apply(&scores_pos, &scores_neg)?;
//! value.backward()?;
//! ```
//!
//! Scores are [`candle_core::Tensor`]s; the result is a rank-0 tensor, so
//! gradients flow back into the scoring model.
//!
//! ## References
//!
//! - Bordes et al. (2013). "Translating Embeddings for Modeling
//!   Multi-relational Data." NIPS.
//! - Trouillon et al. (2016). "Complex Embeddings for Simple Link
//!   Prediction." ICML.
//! - Hamaguchi et al. (2017). "Knowledge Transfer for Out-of-Knowledge-Base
//!   Entities." IJCAI.
//! - Sun et al. (2019). "RotatE: Knowledge Graph Embedding by Relational
//!   Rotation in Complex Space." ICLR.

mod error;
mod loss;
mod ops;
mod params;
mod registry;
pub mod variants;

pub use error::{Error, Result};
pub use loss::{Dependency, Loss, LossFunction, LossVariant};
pub use params::{Hyperparams, LossConfig, LossParameters};
pub use registry::{ClassParams, Constructor, LossRegistry, LossRegistryBuilder, LossSpec};
pub use variants::{AbsoluteMarginLoss, NllAdversarialLoss, NllLoss, PairwiseLoss, SelfAdversarialLoss};
