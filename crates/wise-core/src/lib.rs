//! Wise Core - delegated-voting protocol and rules engine
//!
//! This crate lets a blockchain account (the *delegator*) authorize another
//! account (the *voter*) to vote on its behalf, constrained by
//! delegator-defined rules. It provides:
//! - Pipeline: paginated account-history streaming with composable
//!   filter/transform/limit/take stages and early termination
//! - Protocol: versioned decoding of `custom_json` envelopes into typed
//!   commands (`SetRules`, `SendVoteorder`)
//! - Rules: asynchronous validation of vote orders against rulesets
//!   (authors, tags, payout, custom RPC checks)
//! - Store: position-ordered ruleset state with as-of resolution
//!
//! The raw ledger client, transaction signing and broadcast are external
//! collaborators injected through the [`api`] traits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod error;
pub mod ledger;
pub mod pipeline;
pub mod protocol;
pub mod rpc;
pub mod rules;
pub mod store;
pub mod validator;

pub use api::{LedgerApi, RemoteCheckClient, SupplierConfig, MAX_PAGE_SIZE};
pub use client::Wise;
pub use error::{Error, Result};
pub use ledger::{
    ContentItem, CustomJsonOperation, HistoryEntry, OperationPayload, OperationPosition,
    Positioned, RawTransaction,
};
pub use pipeline::{
    Control, DecodeStage, FilterDecision, FilterStage, HistorySupplier, Limiter,
    PositionCutoffFilter, PositionFilterMode, Sink, TakerSink, TransformStage,
};
pub use protocol::{Command, DecodedOperation, Protocol, V2Handler, VersionHandler, VoteOrder};
pub use rpc::{HttpRemoteCheck, HttpRemoteCheckConfig};
pub use rules::{
    AuthorsMode, AuthorsRule, CustomRpcRule, PayoutMode, PayoutRule, Rule, Ruleset, TagsMode,
    TagsRule, ValidationContext,
};
pub use store::RulesetStore;
pub use validator::{Validator, Verdict, MAX_WEIGHT};
