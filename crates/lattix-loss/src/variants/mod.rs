//! Concrete losses.
//!
//! | Name | Type | Hyperparameters | Same-size pos/neg |
//! |------|------|-----------------|-------------------|
//! | `pairwise` | [`PairwiseLoss`] | `margin` = 1 | yes |
//! | `nll` | [`NllLoss`] | none | yes |
//! | `nll-adversarial` | [`NllAdversarialLoss`] | `alpha` = 0.5 | no |
//! | `absolute_margin` | [`AbsoluteMarginLoss`] | `margin` = 1 | yes |
//! | `self_adversarial` | [`SelfAdversarialLoss`] | `margin` = 3, `alpha` = 0.5 | no |

mod absolute_margin;
mod nll;
mod nll_adversarial;
mod pairwise;
mod self_adversarial;

pub use absolute_margin::AbsoluteMarginLoss;
pub use nll::NllLoss;
pub use nll_adversarial::NllAdversarialLoss;
pub use pairwise::PairwiseLoss;
pub use self_adversarial::SelfAdversarialLoss;
