//! # Smart Contracts
//!
//! Contract values, host functions, authorization trees and resource
//! footprints.

pub mod auth;
pub mod footprint;
pub mod host_function;
pub mod scval;

pub use auth::{
    SorobanAddressCredentials, SorobanAuthorizationEntry, SorobanAuthorizedFunction, SorobanAuthorizedInvocation,
    SorobanCredentials,
};
pub use footprint::{LedgerFootprint, SorobanResources, SorobanResourcesExtV0, SorobanTransactionData};
pub use host_function::{
    ContractIdAddressPreimage, ContractIdPreimage, CreateContractArgs, CreateContractArgsV2, HostFunction,
    InvokeContractArgs,
};
pub use scval::{ContractExecutable, ScError, ScMapEntry, ScVal};
