#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
extern crate alloc;

// Shared token plumbing
pub mod errors;
pub mod events;
pub mod math;

// Token collaborators
pub mod tokens;

// Yield farming engine
pub mod farming;
