//! Rule model
//!
//! Pure data describing how each component and each of its properties maps
//! from the source library to the target library. Rule functions only ever
//! see read-only views ([`Occurrence`], [`RuleContext`], [`PropContext`]).

pub mod component;
pub mod occurrence;
pub mod props;
pub mod table;

pub use component::{candidate, CandidateFn, ComponentMeta, ComponentRule, TodoComments, TodoFn};
pub use occurrence::{Occurrence, RuleContext};
pub use props::{
    Addition, AdditionFn, PropChange, PropContext, PropName, PropTarget, PropUpdate,
    PropertyMapper, PropsMeta, REVIEW_MARKER,
};
pub use table::MappingTable;
