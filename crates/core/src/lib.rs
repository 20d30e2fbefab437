//! Core library for fizzbuzz
//!
//! This crate implements the **Functional Core** of the fizzbuzz service, following
//! the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The project uses a two-crate architecture to keep the logic apart from its
//! delivery mechanisms:
//!
//! - **`fizzbuzz_core`** (this crate): sequence generation, request fingerprinting,
//!   request validation and the statistics table with its storage
//! - **`fizzbuzz`**: the CLI, the HTTP server and the services gluing them to the core
//!
//! Generation, fingerprinting and validation are pure functions. The only I/O lives
//! in [`stats`], which reads and writes a single JSON file.
//!
//! # Module Organization
//!
//! - [`rule`]: substitution rules (`n` to replacement or `""`)
//! - [`sequence`]: applies ordered rules over `1..=limit`
//! - [`fingerprint`]: request parameters and their order-independent hash
//! - [`validation`]: turns an untyped JSON object into parameters, or field errors
//! - [`stats`]: occurrence counts per parameter set, cached over durable storage
//!
//! # Example Usage
//!
//! ```rust
//! use fizzbuzz_core::rule::MultipleRule;
//! use fizzbuzz_core::sequence::generate;
//!
//! let rules = [MultipleRule::new(3, "fizz"), MultipleRule::new(5, "buzz")];
//! let items = generate(&rules, 15);
//!
//! assert_eq!(items[14], "fizzbuzz");
//! ```

pub mod fingerprint;
pub mod rule;
pub mod sequence;
pub mod stats;
pub mod validation;
