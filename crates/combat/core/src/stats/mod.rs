//! Attribute model.
//!
//! Every unit attribute is stored as a `{base, ratio, kind}` triple and
//! resolved lazily on each read:
//!
//! ```text
//! raw      = base * ratio
//! modifier = fold(passive hooks of attached effects, in attach order)
//! value    = cast(kind, (raw + flat_acc) * ratio_acc)
//! ```
//!
//! Nothing is cached. Effects attach and detach between reads, so the
//! aggregation runs again every time an attribute is requested. The
//! aggregation itself lives on [`crate::state::Arena`] because it needs the
//! whole battle graph to resolve effect sources.

pub mod attribute;
pub mod base;
pub mod modifier;

pub use attribute::{Attribute, NumericKind};
pub use base::{BaseStats, CoreAttribute};
pub use modifier::PassiveModifier;
